use std::sync::{Arc, Mutex};

use axum::extract::FromRef;
use rusqlite::{Connection, Row, params};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{AppState, Error, database_id::DatabaseId, validation::validate_name};

/// Database identifier for a shopping list.
pub type ListId = DatabaseId;

/// A named shopping list for the week starting on `week_starting`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShoppingList {
    /// The id for the list.
    pub id: ListId,
    /// The display name, e.g. "Weekly groceries".
    pub name: String,
    /// The first day of the week the list is for.
    pub week_starting: Date,
    /// When the list was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the list was last changed.
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// The validated fields for creating a shopping list.
#[derive(Debug, Clone, PartialEq)]
pub struct NewList {
    name: String,
    week_starting: Date,
}

impl NewList {
    /// Validate the fields for a new list.
    ///
    /// # Errors
    ///
    /// Returns [Error::EmptyName] if `name` is blank.
    pub fn new(name: &str, week_starting: Date) -> Result<Self, Error> {
        Ok(Self {
            name: validate_name(name, "list name")?,
            week_starting,
        })
    }
}

/// The fields of a shopping list to change. Fields set to `None` are left as is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListUpdate {
    /// The new name.
    pub name: Option<String>,
    /// The new week starting date.
    pub week_starting: Option<Date>,
}

impl ListUpdate {
    /// Whether the update would not change anything.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.week_starting.is_none()
    }

    fn validate(&self) -> Result<Self, Error> {
        if self.is_empty() {
            return Err(Error::EmptyUpdate);
        }

        let name = match &self.name {
            Some(name) => Some(validate_name(name, "list name")?),
            None => None,
        };

        Ok(Self {
            name,
            week_starting: self.week_starting,
        })
    }
}

/// The state needed by the shopping list endpoints.
#[derive(Debug, Clone)]
pub struct ListState {
    /// The database connection for managing lists.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Create the shopping list table and its indexes.
pub fn create_list_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS shopping_list (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            week_starting TEXT NOT NULL,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_shopping_list_week_starting
            ON shopping_list(week_starting);",
    )?;

    Ok(())
}

/// Create a shopping list with no items.
pub fn create_list(new_list: &NewList, connection: &Connection) -> Result<ShoppingList, Error> {
    let now = OffsetDateTime::now_utc();

    connection.execute(
        "INSERT INTO shopping_list (name, week_starting, created_at, updated_at)
        VALUES (?1, ?2, ?3, ?3)",
        params![new_list.name, new_list.week_starting, now],
    )?;

    let id = connection.last_insert_rowid();
    tracing::debug!("Created shopping list {id} \"{}\"", new_list.name);

    get_list(id, connection)
}

/// Retrieve a single shopping list by ID, without its items.
///
/// # Errors
/// Returns [Error::NotFound] if there is no list with `id`.
pub fn get_list(id: ListId, connection: &Connection) -> Result<ShoppingList, Error> {
    connection
        .prepare(
            "SELECT id, name, week_starting, created_at, updated_at
            FROM shopping_list WHERE id = :id",
        )?
        .query_row(&[(":id", &id)], map_row_to_list)
        .map_err(Error::from)
}

/// Retrieve all shopping lists, the most recent week first.
pub fn get_all_lists(connection: &Connection) -> Result<Vec<ShoppingList>, Error> {
    connection
        .prepare(
            "SELECT id, name, week_starting, created_at, updated_at
            FROM shopping_list
            ORDER BY week_starting DESC, id DESC",
        )?
        .query_map([], map_row_to_list)?
        .map(|maybe_list| maybe_list.map_err(Error::from))
        .collect()
}

/// Apply the fields set in `update` to the list `id` and return the result.
///
/// # Errors
/// Returns:
/// - [Error::EmptyUpdate] if `update` does not set any fields,
/// - [Error::EmptyName] if the new name is blank,
/// - [Error::NotFound] if there is no list with `id`.
pub fn update_list(
    id: ListId,
    update: &ListUpdate,
    connection: &Connection,
) -> Result<ShoppingList, Error> {
    let update = update.validate()?;

    let rows_affected = connection.execute(
        "UPDATE shopping_list
        SET \
            name = COALESCE(?1, name), \
            week_starting = COALESCE(?2, week_starting), \
            updated_at = ?3 \
        WHERE id = ?4",
        params![update.name, update.week_starting, OffsetDateTime::now_utc(), id],
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    get_list(id, connection)
}

/// Delete a shopping list and all of its items.
///
/// # Errors
/// Returns [Error::NotFound] if there is no list with `id`.
pub fn delete_list(id: ListId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM shopping_list WHERE id = ?1", [id])?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    tracing::debug!("Deleted shopping list {id}");

    Ok(())
}

fn map_row_to_list(row: &Row) -> Result<ShoppingList, rusqlite::Error> {
    Ok(ShoppingList {
        id: row.get(0)?,
        name: row.get(1)?,
        week_starting: row.get(2)?,
        created_at: row.get(3)?,
        updated_at: row.get(4)?,
    })
}


#[cfg(test)]
mod list_query_tests {
    use rusqlite::Connection;
    use time::{Date, macros::date};

    use crate::{
        Error, initialize_db,
        list::{
            ListUpdate, NewList, ShoppingList, create_list, delete_list, get_all_lists, get_list,
            update_list,
        },
    };

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize_db(&connection).expect("Could not initialize database");
        connection
    }

    #[track_caller]
    fn must_create_list(name: &str, week_starting: Date, connection: &Connection) -> ShoppingList {
        create_list(&NewList::new(name, week_starting).unwrap(), connection)
            .expect("Could not create test list")
    }

    #[test]
    fn create_list_succeeds() {
        let connection = get_test_connection();

        let list = must_create_list("Groceries", date!(2025 - 03 - 03), &connection);

        assert!(list.id > 0);
        assert_eq!(list.name, "Groceries");
        assert_eq!(list.week_starting, date!(2025 - 03 - 03));
        assert_eq!(list.created_at, list.updated_at);
    }

    #[test]
    fn get_list_succeeds() {
        let connection = get_test_connection();
        let inserted = must_create_list("Groceries", date!(2025 - 03 - 03), &connection);

        let selected = get_list(inserted.id, &connection);

        assert_eq!(selected, Ok(inserted));
    }

    #[test]
    fn get_list_with_invalid_id_returns_not_found() {
        let connection = get_test_connection();
        let inserted = must_create_list("Groceries", date!(2025 - 03 - 03), &connection);

        assert_eq!(get_list(inserted.id + 123, &connection), Err(Error::NotFound));
    }

    #[test]
    fn get_all_lists_orders_by_week_descending() {
        let connection = get_test_connection();
        let march = must_create_list("March", date!(2025 - 03 - 03), &connection);
        let may = must_create_list("May", date!(2025 - 05 - 05), &connection);
        let april = must_create_list("April", date!(2025 - 04 - 07), &connection);

        let lists = get_all_lists(&connection).expect("Could not get lists");

        assert_eq!(lists, vec![may, april, march]);
    }

    #[test]
    fn get_all_lists_breaks_ties_with_newest_first() {
        let connection = get_test_connection();
        let first = must_create_list("First", date!(2025 - 03 - 03), &connection);
        let second = must_create_list("Second", date!(2025 - 03 - 03), &connection);

        let lists = get_all_lists(&connection).expect("Could not get lists");

        assert_eq!(lists, vec![second, first]);
    }

    #[test]
    fn update_list_changes_only_given_fields() {
        let connection = get_test_connection();
        let list = must_create_list("Groceries", date!(2025 - 03 - 03), &connection);

        let updated = update_list(
            list.id,
            &ListUpdate {
                name: Some("Party".to_owned()),
                week_starting: None,
            },
            &connection,
        )
        .expect("Could not update list");

        assert_eq!(updated.name, "Party");
        assert_eq!(updated.week_starting, list.week_starting);
        assert_eq!(updated.created_at, list.created_at);
        assert!(updated.updated_at >= list.updated_at);
    }

    #[test]
    fn update_list_fails_on_empty_update() {
        let connection = get_test_connection();
        let list = must_create_list("Groceries", date!(2025 - 03 - 03), &connection);

        let result = update_list(list.id, &ListUpdate::default(), &connection);

        assert_eq!(result, Err(Error::EmptyUpdate));
        assert_eq!(get_list(list.id, &connection), Ok(list));
    }

    #[test]
    fn update_list_with_invalid_id_returns_not_found() {
        let connection = get_test_connection();

        let result = update_list(
            42,
            &ListUpdate {
                name: None,
                week_starting: Some(date!(2025 - 01 - 06)),
            },
            &connection,
        );

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn delete_list_succeeds() {
        let connection = get_test_connection();
        let list = must_create_list("Groceries", date!(2025 - 03 - 03), &connection);

        assert_eq!(delete_list(list.id, &connection), Ok(()));
        assert_eq!(get_list(list.id, &connection), Err(Error::NotFound));
    }

    #[test]
    fn delete_list_with_invalid_id_returns_not_found() {
        let connection = get_test_connection();

        assert_eq!(delete_list(999999, &connection), Err(Error::NotFound));
    }
}
