use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    catalog::{CatalogItemId, record_catalog_usage},
    database_id::DatabaseId,
    list::ListId,
    validation::{
        DEFAULT_CATEGORY, DEFAULT_PRICE, DEFAULT_QUANTITY, DEFAULT_UNIT, optional_text,
        text_or_default, validate_name, validate_price, validate_quantity,
    },
};

/// Database identifier for a shopping item.
pub type ItemId = DatabaseId;

/// Something to buy in a shopping list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingItem {
    /// The id for the item.
    pub id: ItemId,
    /// What to buy.
    pub name: String,
    /// How many units to buy, at least one.
    pub quantity: i64,
    /// The unit the quantity is measured in, e.g. "kg".
    pub unit: String,
    /// The category used to group items, e.g. "Dairy & Eggs".
    pub category: String,
    /// The price for one unit.
    pub price: f64,
    /// Whether the item has been bought.
    pub completed: bool,
    /// The list the item belongs to.
    pub list_id: ListId,
    /// When the item was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the item was last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl ShoppingItem {
    /// The cost of the item, i.e., quantity times price.
    pub fn cost(&self) -> f64 {
        self.quantity as f64 * self.price
    }
}

/// The validated fields for creating a shopping item.
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    /// The list to add the item to.
    pub list_id: ListId,
    /// The trimmed, non-empty name.
    pub name: String,
    /// At least one.
    pub quantity: i64,
    /// The unit, "pcs" by default.
    pub unit: String,
    /// The category, "General" by default.
    pub category: String,
    /// A non-negative price, zero by default.
    pub price: f64,
}

impl NewItem {
    /// Validate the fields for a new item and fill in defaults for the
    /// optional fields.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - [Error::EmptyName] if `name` is blank,
    /// - [Error::InvalidQuantity] if `quantity` is less than one,
    /// - [Error::InvalidPrice] if `price` is negative or not finite.
    pub fn build(
        list_id: ListId,
        name: &str,
        quantity: Option<i64>,
        unit: Option<&str>,
        category: Option<&str>,
        price: Option<f64>,
    ) -> Result<Self, Error> {
        Ok(Self {
            list_id,
            name: validate_name(name, "item name")?,
            quantity: validate_quantity(quantity.unwrap_or(DEFAULT_QUANTITY))?,
            unit: text_or_default(unit, DEFAULT_UNIT),
            category: text_or_default(category, DEFAULT_CATEGORY),
            price: validate_price(price.unwrap_or(DEFAULT_PRICE))?,
        })
    }
}

/// The fields of a shopping item to change. Fields set to `None` are left as is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemUpdate {
    /// The new name.
    pub name: Option<String>,
    /// The new quantity.
    pub quantity: Option<i64>,
    /// The new unit.
    pub unit: Option<String>,
    /// The new category.
    pub category: Option<String>,
    /// The new price.
    pub price: Option<f64>,
    /// Mark the item as bought or not bought.
    pub completed: Option<bool>,
}

impl ItemUpdate {
    /// Whether the update would not change anything.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.quantity.is_none()
            && self.unit.is_none()
            && self.category.is_none()
            && self.price.is_none()
            && self.completed.is_none()
    }

    fn validate(&self) -> Result<Self, Error> {
        let update = Self {
            name: self
                .name
                .as_deref()
                .map(|name| validate_name(name, "item name"))
                .transpose()?,
            quantity: self.quantity.map(validate_quantity).transpose()?,
            unit: optional_text(self.unit.as_deref()),
            category: optional_text(self.category.as_deref()),
            price: self.price.map(validate_price).transpose()?,
            completed: self.completed,
        };

        if update.is_empty() {
            Err(Error::EmptyUpdate)
        } else {
            Ok(update)
        }
    }
}

/// The state needed by the shopping item endpoints.
#[derive(Debug, Clone)]
pub struct ItemState {
    /// The database connection for managing items.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ItemState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Create the shopping item table and its indexes.
///
/// Must be called after the shopping list table has been created.
pub fn create_item_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS shopping_item (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            quantity INTEGER NOT NULL DEFAULT 1 CHECK (quantity >= 1),
            unit TEXT NOT NULL DEFAULT 'pcs',
            category TEXT NOT NULL DEFAULT 'General',
            price REAL NOT NULL DEFAULT 0 CHECK (price >= 0),
            completed INTEGER NOT NULL DEFAULT 0,
            list_id INTEGER NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            FOREIGN KEY(list_id) REFERENCES shopping_list(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_shopping_item_list_id ON shopping_item(list_id);",
    )?;

    Ok(())
}

/// Add an item to a shopping list. New items are not completed.
///
/// # Errors
/// Returns [Error::InvalidListId] if `new_item.list_id` does not refer to a list.
pub fn create_item(new_item: &NewItem, connection: &Connection) -> Result<ShoppingItem, Error> {
    let now = OffsetDateTime::now_utc();

    connection
        .execute(
            "INSERT INTO shopping_item
                (name, quantity, unit, category, price, completed, list_id, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6, ?7, ?7)",
            params![
                new_item.name,
                new_item.quantity,
                new_item.unit,
                new_item.category,
                new_item.price,
                new_item.list_id,
                now
            ],
        )
        .map_err(|error| match error {
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            rusqlite::Error::SqliteFailure(error, Some(_)) if error.extended_code == 787 => {
                Error::InvalidListId(new_item.list_id)
            }
            error => error.into(),
        })?;

    let id = connection.last_insert_rowid();
    tracing::debug!(
        "Added item {id} \"{}\" to shopping list {}",
        new_item.name,
        new_item.list_id
    );

    get_item(id, connection)
}

/// Add an item that was picked from the catalog and bump the catalog item's
/// usage count.
///
/// Both writes happen in one transaction, so either both succeed or neither
/// does.
///
/// # Errors
/// Returns:
/// - [Error::InvalidListId] if `new_item.list_id` does not refer to a list,
/// - [Error::NotFound] if there is no catalog item with `catalog_item_id`.
pub fn create_item_from_catalog(
    new_item: &NewItem,
    catalog_item_id: CatalogItemId,
    connection: &Connection,
) -> Result<ShoppingItem, Error> {
    let transaction = connection.unchecked_transaction()?;

    let item = create_item(new_item, &transaction)?;
    record_catalog_usage(catalog_item_id, &transaction)?;

    transaction.commit()?;

    Ok(item)
}

/// Retrieve a single shopping item by ID.
///
/// # Errors
/// Returns [Error::NotFound] if there is no item with `id`.
pub fn get_item(id: ItemId, connection: &Connection) -> Result<ShoppingItem, Error> {
    connection
        .prepare(
            "SELECT id, name, quantity, unit, category, price, completed, list_id,
                created_at, updated_at
            FROM shopping_item WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_row_to_item)
        .map_err(Error::from)
}

/// Retrieve the items in a shopping list ordered by category and then name.
pub fn get_items_in_list(
    list_id: ListId,
    connection: &Connection,
) -> Result<Vec<ShoppingItem>, Error> {
    connection
        .prepare(
            "SELECT id, name, quantity, unit, category, price, completed, list_id,
                created_at, updated_at
            FROM shopping_item
            WHERE list_id = :list_id
            ORDER BY category ASC, name ASC, id ASC",
        )?
        .query_map(&[(":list_id", &list_id)], map_row_to_item)?
        .map(|maybe_item| maybe_item.map_err(Error::from))
        .collect()
}

/// Apply the fields set in `update` to the item `id` and return the result.
///
/// The fields are written with a single `UPDATE` statement.
///
/// # Errors
/// Returns:
/// - [Error::EmptyUpdate] if `update` does not set any fields,
/// - a validation error if any of the set fields are invalid,
/// - [Error::NotFound] if there is no item with `id`.
pub fn update_item(
    id: ItemId,
    update: &ItemUpdate,
    connection: &Connection,
) -> Result<ShoppingItem, Error> {
    let update = update.validate()?;

    let rows_affected = connection.execute(
        "UPDATE shopping_item
        SET \
            name = COALESCE(?1, name), \
            quantity = COALESCE(?2, quantity), \
            unit = COALESCE(?3, unit), \
            category = COALESCE(?4, category), \
            price = COALESCE(?5, price), \
            completed = COALESCE(?6, completed), \
            updated_at = ?7 \
        WHERE id = ?8",
        params![
            update.name,
            update.quantity,
            update.unit,
            update.category,
            update.price,
            update.completed,
            OffsetDateTime::now_utc(),
            id
        ],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    get_item(id, connection)
}

/// Delete a shopping item.
///
/// # Errors
/// Returns [Error::NotFound] if there is no item with `id`.
pub fn delete_item(id: ItemId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM shopping_item WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

fn map_row_to_item(row: &Row) -> Result<ShoppingItem, rusqlite::Error> {
    Ok(ShoppingItem {
        id: row.get(0)?,
        name: row.get(1)?,
        quantity: row.get(2)?,
        unit: row.get(3)?,
        category: row.get(4)?,
        price: row.get(5)?,
        completed: row.get(6)?,
        list_id: row.get(7)?,
        created_at: row.get(8)?,
        updated_at: row.get(9)?,
    })
}
