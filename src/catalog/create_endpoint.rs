//! Defines the endpoint for adding an item to the catalog.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::Response,
};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    catalog::{CatalogState, NewCatalogItem, create_catalog_item},
    db::lock_connection,
    endpoints::{self, format_endpoint},
    response::created,
};

/// The JSON body for adding an item to the catalog.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCatalogItemPayload {
    /// The item name, required and unique ignoring case.
    pub name: Option<String>,
    /// Defaults to 1.
    pub default_quantity: Option<i64>,
    /// Defaults to "pcs".
    pub default_unit: Option<String>,
    /// Defaults to "General".
    pub category: Option<String>,
    /// Defaults to 0.
    pub default_price: Option<f64>,
}

/// A route handler for adding an item to the catalog, responds with the new
/// catalog item.
///
/// Responds with 409 if the catalog already has an item with the same name.
pub async fn create_catalog_item_endpoint(
    State(state): State<CatalogState>,
    payload: Result<Json<CreateCatalogItemPayload>, JsonRejection>,
) -> Result<Response, Error> {
    let Json(payload) = payload?;
    let name = payload.name.as_deref().ok_or(Error::MissingField("name"))?;
    let new_item = NewCatalogItem::build(
        name,
        payload.default_quantity,
        payload.default_unit.as_deref(),
        payload.category.as_deref(),
        payload.default_price,
    )?;

    let connection = lock_connection(&state.db_connection)?;
    let catalog_item = create_catalog_item(&new_item, &connection)?;

    Ok(created(
        format_endpoint(endpoints::CATALOG_ITEM_API, catalog_item.id),
        catalog_item,
    ))
}
