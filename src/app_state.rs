//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, db::initialize};

/// The state of the REST server.
///
/// The server opens one database connection at start up and shares it between
/// requests through this struct.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for the domain models.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }

    /// Close the database connection.
    ///
    /// Call this after the server has stopped. If a request handler still
    /// holds a copy of the state, the connection is left to close when the
    /// last copy is dropped.
    ///
    /// # Errors
    /// Returns an error if SQLite could not close the connection cleanly.
    pub fn close(self) -> Result<(), Error> {
        let mutex = match Arc::try_unwrap(self.db_connection) {
            Ok(mutex) => mutex,
            Err(db_connection) => {
                tracing::warn!(
                    "Database connection is still shared by {} other owners, \
                    it will be closed when they are dropped",
                    Arc::strong_count(&db_connection) - 1
                );
                return Ok(());
            }
        };

        let connection = mutex.into_inner().map_err(|_| Error::DatabaseLockError)?;

        connection.close().map_err(|(_, error)| Error::from(error))?;
        tracing::info!("Closed the database connection");

        Ok(())
    }
}
