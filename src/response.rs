//! Shared helpers for building JSON responses.

use axum::{
    Json,
    http::{StatusCode, header::LOCATION},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// A JSON body for responses that only need to confirm what happened.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct Message {
    /// A short description of the outcome.
    pub message: String,
}

impl Message {
    /// Create a message response body.
    pub fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_owned(),
        })
    }
}

/// A `201 Created` response pointing at `location` with `body` as JSON.
pub fn created<T: Serialize>(location: String, body: T) -> Response {
    (StatusCode::CREATED, [(LOCATION, location)], Json(body)).into_response()
}
