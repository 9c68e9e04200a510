//! Weekly Shop is a household shopping list manager.
//!
//! Users plan a shopping list for each week, add the items they need with a
//! quantity, unit, price and category, and tick them off while shopping.
//! Items that are bought often are kept in a catalog so they can be added to
//! later lists with their usual details.
//!
//! This library provides a JSON REST API over a SQLite database. See
//! [build_router] for the routes.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod catalog;
mod database_id;
mod db;
mod endpoints;
mod error;
mod item;
mod list;
mod logging;
mod response;
mod routing;
mod summary;
mod validation;

pub use app_state::AppState;
pub use catalog::{
    CatalogFilter, CatalogItem, CatalogItemId, CatalogItemUpdate, NewCatalogItem,
    create_catalog_item, record_catalog_usage,
};
pub use db::initialize as initialize_db;
pub use error::{Error, ErrorBody, ErrorKind};
pub use item::{ItemId, ItemUpdate, NewItem, ShoppingItem, create_item, update_item};
pub use list::{ListId, ListUpdate, NewList, ShoppingList, create_list};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;
pub use summary::{ListSummary, summarize};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        if let Err(error) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {error}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(error) => {
                tracing::error!("failed to install terminate signal handler: {error}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
