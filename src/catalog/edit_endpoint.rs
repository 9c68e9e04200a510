//! Defines the endpoint for changing a catalog item.

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};

use crate::{
    Error,
    catalog::{CatalogItem, CatalogItemId, CatalogItemUpdate, CatalogState, update_catalog_item},
    db::lock_connection,
};

/// A route handler for applying a partial update to a catalog item.
///
/// Responds with 409 if the item is renamed to the name of another item.
pub async fn edit_catalog_item_endpoint(
    State(state): State<CatalogState>,
    path: Result<Path<CatalogItemId>, PathRejection>,
    update: Result<Json<CatalogItemUpdate>, JsonRejection>,
) -> Result<Json<CatalogItem>, Error> {
    let Path(catalog_item_id) = path?;
    let Json(update) = update?;
    let connection = lock_connection(&state.db_connection)?;

    update_catalog_item(catalog_item_id, &update, &connection).map(Json)
}
