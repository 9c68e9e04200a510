//! Defines the endpoint for creating a shopping list.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::Response,
};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    db::lock_connection,
    endpoints::{self, format_endpoint},
    list::{ListState, NewList, create_list},
    response::created,
};

/// The JSON body for creating a shopping list.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListPayload {
    /// The list name, required.
    pub name: Option<String>,
    /// The first day of the week the list is for, required.
    pub week_starting: Option<Date>,
}

/// A route handler for creating a new shopping list, responds with the list.
pub async fn create_list_endpoint(
    State(state): State<ListState>,
    payload: Result<Json<CreateListPayload>, JsonRejection>,
) -> Result<Response, Error> {
    let Json(payload) = payload?;
    let name = payload.name.ok_or(Error::MissingField("name"))?;
    let week_starting = payload
        .week_starting
        .ok_or(Error::MissingField("weekStarting"))?;
    let new_list = NewList::new(&name, week_starting)?;

    let connection = lock_connection(&state.db_connection)?;
    let list = create_list(&new_list, &connection)?;

    Ok(created(format_endpoint(endpoints::LIST_API, list.id), list))
}
