//! Defines the endpoint for removing an item from the catalog.

use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};

use crate::{
    Error,
    catalog::{CatalogItemId, CatalogState, delete_catalog_item},
    db::lock_connection,
    response::Message,
};

/// A route handler for deleting a catalog item.
///
/// Shopping items that were created from the catalog item are not affected.
pub async fn delete_catalog_item_endpoint(
    State(state): State<CatalogState>,
    path: Result<Path<CatalogItemId>, PathRejection>,
) -> Result<Json<Message>, Error> {
    let Path(catalog_item_id) = path?;
    let connection = lock_connection(&state.db_connection)?;

    delete_catalog_item(catalog_item_id, &connection)?;

    Ok(Message::new("Catalog item deleted successfully"))
}
