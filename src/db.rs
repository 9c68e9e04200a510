//! Creates the application's database schema.

use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, Transaction as SqlTransaction, TransactionBehavior};

use crate::{
    Error, catalog::create_catalog_item_table, item::create_item_table,
    list::create_list_table,
};

/// Create the tables for the domain models if they do not already exist.
///
/// Foreign key enforcement is switched on for `connection`, which is what
/// makes deleting a list remove its items.
///
/// # Errors
/// Returns an [Error::SqlError] if any of the SQL statements fail.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    // Has no effect inside a transaction, so it must come first.
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction = SqlTransaction::new_unchecked(connection, TransactionBehavior::Exclusive)?;

    create_list_table(&transaction)?;
    create_item_table(&transaction)?;
    create_catalog_item_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Acquire the lock on the shared database connection.
///
/// # Errors
/// Returns [Error::DatabaseLockError] if the lock was poisoned by a panic in
/// another request.
pub fn lock_connection(
    connection: &Mutex<Connection>,
) -> Result<MutexGuard<'_, Connection>, Error> {
    connection.lock().map_err(|error| {
        tracing::error!("could not acquire database lock: {error}");
        Error::DatabaseLockError
    })
}
