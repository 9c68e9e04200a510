//! Defines the endpoint for recording that a catalog item was picked.

use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};

use crate::{
    Error,
    catalog::{CatalogItem, CatalogItemId, CatalogState, record_catalog_usage},
    db::lock_connection,
};

/// A route handler for incrementing the usage count of a catalog item,
/// responds with the updated catalog item.
pub async fn use_catalog_item_endpoint(
    State(state): State<CatalogState>,
    path: Result<Path<CatalogItemId>, PathRejection>,
) -> Result<Json<CatalogItem>, Error> {
    let Path(catalog_item_id) = path?;
    let connection = lock_connection(&state.db_connection)?;

    record_catalog_usage(catalog_item_id, &connection).map(Json)
}
