use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    database_id::DatabaseId,
    validation::{
        DEFAULT_CATEGORY, DEFAULT_PRICE, DEFAULT_QUANTITY, DEFAULT_UNIT, optional_text,
        text_or_default, validate_name, validate_price, validate_quantity,
    },
};

/// Database identifier for a catalog item.
pub type CatalogItemId = DatabaseId;

/// A reusable template for adding an item to a shopping list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// The id for the catalog item.
    pub id: CatalogItemId,
    /// The item name, unique within the catalog ignoring case.
    pub name: String,
    /// The quantity to fill in when the item is picked.
    pub default_quantity: i64,
    /// The unit to fill in when the item is picked.
    pub default_unit: String,
    /// The category to fill in when the item is picked.
    pub category: String,
    /// The price to fill in when the item is picked.
    pub default_price: f64,
    /// How many times the item has been picked, including its creation.
    pub usage_count: i64,
    /// When the catalog item was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the catalog item was last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// The validated fields for creating a catalog item.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCatalogItem {
    /// The trimmed, non-empty name.
    pub name: String,
    /// At least one.
    pub default_quantity: i64,
    /// The unit, "pcs" by default.
    pub default_unit: String,
    /// The category, "General" by default.
    pub category: String,
    /// A non-negative price, zero by default.
    pub default_price: f64,
}

impl NewCatalogItem {
    /// Validate the fields for a new catalog item and fill in defaults for the
    /// optional fields.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - [Error::EmptyName] if `name` is blank,
    /// - [Error::InvalidQuantity] if `default_quantity` is less than one,
    /// - [Error::InvalidPrice] if `default_price` is negative or not finite.
    pub fn build(
        name: &str,
        default_quantity: Option<i64>,
        default_unit: Option<&str>,
        category: Option<&str>,
        default_price: Option<f64>,
    ) -> Result<Self, Error> {
        Ok(Self {
            name: validate_name(name, "catalog item name")?,
            default_quantity: validate_quantity(default_quantity.unwrap_or(DEFAULT_QUANTITY))?,
            default_unit: text_or_default(default_unit, DEFAULT_UNIT),
            category: text_or_default(category, DEFAULT_CATEGORY),
            default_price: validate_price(default_price.unwrap_or(DEFAULT_PRICE))?,
        })
    }
}

/// The fields of a catalog item to change. Fields set to `None` are left as is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItemUpdate {
    /// The new name.
    pub name: Option<String>,
    /// The new default quantity.
    pub default_quantity: Option<i64>,
    /// The new default unit.
    pub default_unit: Option<String>,
    /// The new category.
    pub category: Option<String>,
    /// The new default price.
    pub default_price: Option<f64>,
}

impl CatalogItemUpdate {
    /// Whether the update would not change anything.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.default_quantity.is_none()
            && self.default_unit.is_none()
            && self.category.is_none()
            && self.default_price.is_none()
    }

    fn validate(&self) -> Result<Self, Error> {
        let update = Self {
            name: self
                .name
                .as_deref()
                .map(|name| validate_name(name, "catalog item name"))
                .transpose()?,
            default_quantity: self.default_quantity.map(validate_quantity).transpose()?,
            default_unit: optional_text(self.default_unit.as_deref()),
            category: optional_text(self.category.as_deref()),
            default_price: self.default_price.map(validate_price).transpose()?,
        };

        if update.is_empty() {
            Err(Error::EmptyUpdate)
        } else {
            Ok(update)
        }
    }
}

/// Narrows down the catalog items returned by [get_catalog_items].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogFilter {
    /// Only include items whose name contains this text, ignoring case.
    pub search: Option<String>,
    /// Only include items in exactly this category.
    pub category: Option<String>,
}

/// The state needed by the catalog endpoints.
#[derive(Debug, Clone)]
pub struct CatalogState {
    /// The database connection for managing the catalog.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CatalogState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Create the catalog item table and its indexes.
///
/// `name_key` holds the trimmed, lowercase form of `name` and is what makes
/// names unique ignoring case, including for non-ASCII letters.
pub fn create_catalog_item_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS catalog_item (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            name_key TEXT NOT NULL UNIQUE,
            default_quantity INTEGER NOT NULL DEFAULT 1 CHECK (default_quantity >= 1),
            default_unit TEXT NOT NULL DEFAULT 'pcs',
            category TEXT NOT NULL DEFAULT 'General',
            default_price REAL NOT NULL DEFAULT 0 CHECK (default_price >= 0),
            usage_count INTEGER NOT NULL DEFAULT 1 CHECK (usage_count >= 0),
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_catalog_item_category ON catalog_item(category);",
    )?;

    Ok(())
}

/// Add an item to the catalog with a usage count of one.
///
/// # Errors
/// Returns [Error::DuplicateCatalogName] if the catalog already has an item
/// with the same name, ignoring case.
pub fn create_catalog_item(
    new_item: &NewCatalogItem,
    connection: &Connection,
) -> Result<CatalogItem, Error> {
    let key = name_key(&new_item.name);

    if find_catalog_item_by_key(&key, connection)?.is_some() {
        return Err(Error::DuplicateCatalogName(new_item.name.clone()));
    }

    let now = OffsetDateTime::now_utc();

    connection
        .execute(
            "INSERT INTO catalog_item
                (name, name_key, default_quantity, default_unit, category, default_price,
                usage_count, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?7)",
            params![
                new_item.name,
                key,
                new_item.default_quantity,
                new_item.default_unit,
                new_item.category,
                new_item.default_price,
                now
            ],
        )
        .map_err(|error| map_unique_name_error(error, &new_item.name))?;

    let id = connection.last_insert_rowid();
    tracing::debug!("Added \"{}\" to the catalog with ID {id}", new_item.name);

    get_catalog_item(id, connection)
}

/// Retrieve a single catalog item by ID.
///
/// # Errors
/// Returns [Error::NotFound] if there is no catalog item with `id`.
pub fn get_catalog_item(id: CatalogItemId, connection: &Connection) -> Result<CatalogItem, Error> {
    connection
        .prepare(
            "SELECT id, name, default_quantity, default_unit, category, default_price, usage_count,
                created_at, updated_at
            FROM catalog_item WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_row_to_catalog_item)
        .map_err(Error::from)
}

/// Retrieve the catalog items that match `filter`, most used first and then
/// by name.
pub fn get_catalog_items(
    filter: &CatalogFilter,
    connection: &Connection,
) -> Result<Vec<CatalogItem>, Error> {
    let search = optional_text(filter.search.as_deref()).map(|search| name_key(&search));
    let category = optional_text(filter.category.as_deref());

    connection
        .prepare(
            "SELECT id, name, default_quantity, default_unit, category, default_price, usage_count,
                created_at, updated_at
            FROM catalog_item
            WHERE (?1 IS NULL OR instr(name_key, ?1) > 0)
                AND (?2 IS NULL OR category = ?2)
            ORDER BY usage_count DESC, name ASC",
        )?
        .query_map(params![search, category], map_row_to_catalog_item)?
        .map(|maybe_item| maybe_item.map_err(Error::from))
        .collect()
}

/// Apply the fields set in `update` to the catalog item `id` and return the
/// result.
///
/// # Errors
/// Returns:
/// - [Error::EmptyUpdate] if `update` does not set any fields,
/// - a validation error if any of the set fields are invalid,
/// - [Error::DuplicateCatalogName] if the new name belongs to another item,
/// - [Error::NotFound] if there is no catalog item with `id`.
pub fn update_catalog_item(
    id: CatalogItemId,
    update: &CatalogItemUpdate,
    connection: &Connection,
) -> Result<CatalogItem, Error> {
    let update = update.validate()?;
    let key = update.name.as_deref().map(name_key);

    if let (Some(name), Some(key)) = (&update.name, &key) {
        match find_catalog_item_by_key(key, connection)? {
            Some(existing_id) if existing_id != id => {
                return Err(Error::DuplicateCatalogName(name.clone()));
            }
            _ => {}
        }
    }

    let rows_affected = connection
        .execute(
            "UPDATE catalog_item
            SET \
                name = COALESCE(?1, name), \
                name_key = COALESCE(?2, name_key), \
                default_quantity = COALESCE(?3, default_quantity), \
                default_unit = COALESCE(?4, default_unit), \
                category = COALESCE(?5, category), \
                default_price = COALESCE(?6, default_price), \
                updated_at = ?7 \
            WHERE id = ?8",
            params![
                update.name,
                key,
                update.default_quantity,
                update.default_unit,
                update.category,
                update.default_price,
                OffsetDateTime::now_utc(),
                id
            ],
        )
        .map_err(|error| {
            map_unique_name_error(error, update.name.as_deref().unwrap_or_default())
        })?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    get_catalog_item(id, connection)
}

/// Delete a catalog item.
///
/// # Errors
/// Returns [Error::NotFound] if there is no catalog item with `id`.
pub fn delete_catalog_item(id: CatalogItemId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM catalog_item WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Increment the usage count of a catalog item by one and return the result.
///
/// # Errors
/// Returns [Error::NotFound] if there is no catalog item with `id`.
pub fn record_catalog_usage(
    id: CatalogItemId,
    connection: &Connection,
) -> Result<CatalogItem, Error> {
    let rows_affected = connection.execute(
        "UPDATE catalog_item SET usage_count = usage_count + 1, updated_at = ?1 WHERE id = ?2",
        params![OffsetDateTime::now_utc(), id],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    get_catalog_item(id, connection)
}

/// The form of `name` used to compare catalog item names, i.e., trimmed and
/// lowercase using Unicode case rules.
fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

fn find_catalog_item_by_key(
    key: &str,
    connection: &Connection,
) -> Result<Option<CatalogItemId>, Error> {
    connection
        .query_row(
            "SELECT id FROM catalog_item WHERE name_key = ?1",
            [key],
            |row| row.get(0),
        )
        .optional()
        .map_err(Error::from)
}

fn map_unique_name_error(error: rusqlite::Error, name: &str) -> Error {
    match error {
        // Code 2067 occurs when a UNIQUE constraint failed.
        rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
            if sql_error.extended_code == 2067 && desc.ends_with("catalog_item.name_key") =>
        {
            Error::DuplicateCatalogName(name.to_owned())
        }
        error => error.into(),
    }
}

fn map_row_to_catalog_item(row: &Row) -> Result<CatalogItem, rusqlite::Error> {
    Ok(CatalogItem {
        id: row.get(0)?,
        name: row.get(1)?,
        default_quantity: row.get(2)?,
        default_unit: row.get(3)?,
        category: row.get(4)?,
        default_price: row.get(5)?,
        usage_count: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}
