//! Defines the endpoints for reading shopping items.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    db::lock_connection,
    item::{ItemId, ItemState, ShoppingItem, get_item, get_items_in_list},
    list::{ListId, get_list},
};

/// The query parameters for listing items.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemsQuery {
    /// The list to get the items of, required.
    pub list_id: Option<ListId>,
}

/// A route handler for getting a single shopping item.
pub async fn get_item_endpoint(
    State(state): State<ItemState>,
    path: Result<Path<ItemId>, PathRejection>,
) -> Result<Json<ShoppingItem>, Error> {
    let Path(item_id) = path?;
    let connection = lock_connection(&state.db_connection)?;

    get_item(item_id, &connection).map(Json)
}

/// A route handler for getting the items in a shopping list, ordered by
/// category and then name.
///
/// Responds with 404 if the list does not exist so that callers can tell a
/// missing list apart from an empty one.
pub async fn get_items_endpoint(
    State(state): State<ItemState>,
    query: Result<Query<ItemsQuery>, QueryRejection>,
) -> Result<Json<Vec<ShoppingItem>>, Error> {
    let Query(query) = query?;
    let list_id = query.list_id.ok_or(Error::MissingField("listId"))?;

    let connection = lock_connection(&state.db_connection)?;
    get_list(list_id, &connection)?;

    get_items_in_list(list_id, &connection).map(Json)
}
