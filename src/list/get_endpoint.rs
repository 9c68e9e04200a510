//! Defines the endpoints for reading shopping lists.

use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};

use crate::{
    Error,
    db::lock_connection,
    list::{
        ListId, ListOverview, ListState, ListWithItems, get_list_overviews, get_list_with_items,
    },
};

/// A route handler for getting every shopping list with its summary.
pub async fn get_lists_endpoint(
    State(state): State<ListState>,
) -> Result<Json<Vec<ListOverview>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    get_list_overviews(&connection).map(Json)
}

/// A route handler for getting a shopping list with its items and summary.
pub async fn get_list_endpoint(
    State(state): State<ListState>,
    path: Result<Path<ListId>, PathRejection>,
) -> Result<Json<ListWithItems>, Error> {
    let Path(list_id) = path?;
    let connection = lock_connection(&state.db_connection)?;

    get_list_with_items(list_id, &connection).map(Json)
}
