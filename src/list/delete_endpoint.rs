//! Defines the endpoint for deleting a shopping list.

use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};

use crate::{
    Error,
    db::lock_connection,
    list::{ListId, ListState, delete_list},
    response::Message,
};

/// A route handler for deleting a shopping list and all of its items.
pub async fn delete_list_endpoint(
    State(state): State<ListState>,
    path: Result<Path<ListId>, PathRejection>,
) -> Result<Json<Message>, Error> {
    let Path(list_id) = path?;
    let connection = lock_connection(&state.db_connection)?;

    delete_list(list_id, &connection)?;

    Ok(Message::new("List deleted successfully"))
}
