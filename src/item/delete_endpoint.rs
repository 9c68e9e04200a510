//! Defines the endpoint for removing an item from a shopping list.

use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};

use crate::{
    Error,
    db::lock_connection,
    item::{ItemId, ItemState, delete_item},
    response::Message,
};

/// A route handler for deleting a shopping item.
pub async fn delete_item_endpoint(
    State(state): State<ItemState>,
    path: Result<Path<ItemId>, PathRejection>,
) -> Result<Json<Message>, Error> {
    let Path(item_id) = path?;
    let connection = lock_connection(&state.db_connection)?;

    delete_item(item_id, &connection)?;

    Ok(Message::new("Item deleted successfully"))
}
