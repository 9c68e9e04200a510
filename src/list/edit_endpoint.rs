//! Defines the endpoint for updating a shopping list.

use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};

use crate::{
    Error,
    db::lock_connection,
    list::{ListId, ListState, ListUpdate, ShoppingList, update_list},
};

/// A route handler for changing the name or week of a shopping list,
/// responds with the updated list.
pub async fn edit_list_endpoint(
    State(state): State<ListState>,
    path: Result<Path<ListId>, PathRejection>,
    update: Result<Json<ListUpdate>, JsonRejection>,
) -> Result<Json<ShoppingList>, Error> {
    let Path(list_id) = path?;
    let Json(update) = update?;
    let connection = lock_connection(&state.db_connection)?;

    update_list(list_id, &update, &connection).map(Json)
}
