//! Defines the app level error type and its conversion to JSON error responses.
use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::list::ListId;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// A required field was missing from the request payload.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// A name was empty or contained only whitespace.
    #[error("{0} cannot be empty")]
    EmptyName(&'static str),

    /// A quantity was less than one.
    #[error("quantity must be at least 1, got {0}")]
    InvalidQuantity(i64),

    /// A price was negative, infinite or NaN.
    #[error("price must be a non-negative number, got {0}")]
    InvalidPrice(f64),

    /// An update request did not set any fields.
    #[error("no fields to update")]
    EmptyUpdate,

    /// The list ID used to create an item did not match a list.
    #[error("the list ID {0} does not refer to a shopping list")]
    InvalidListId(ListId),

    /// The request path, body or query string could not be parsed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// The catalog already has an item with this name.
    ///
    /// Names are compared after trimming whitespace and ignoring case.
    #[error("the catalog item \"{0}\" already exists")]
    DuplicateCatalogName(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// The body of a response could not be read for logging.
    #[error("could not read the response body")]
    ResponseBodyError,
}

/// The broad categories of [Error] that the API reports to its callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request was missing a required field or had a malformed one.
    InvalidInput,
    /// The request targeted an ID that does not exist.
    NotFound,
    /// The request would violate a uniqueness constraint.
    Conflict,
    /// The store failed. The caller may retry.
    InternalError,
}

impl Error {
    /// The category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingField(_)
            | Error::EmptyName(_)
            | Error::InvalidQuantity(_)
            | Error::InvalidPrice(_)
            | Error::EmptyUpdate
            | Error::InvalidListId(_)
            | Error::InvalidRequest(_) => ErrorKind::InvalidInput,
            Error::NotFound => ErrorKind::NotFound,
            Error::DuplicateCatalogName(_) => ErrorKind::Conflict,
            Error::SqlError(_) | Error::DatabaseLockError | Error::ResponseBodyError => {
                ErrorKind::InternalError
            }
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl From<PathRejection> for Error {
    fn from(rejection: PathRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::InvalidRequest(rejection.body_text())
    }
}

/// The JSON body sent to the client when a request fails.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    /// A description of what went wrong that is safe to show to the client.
    pub error: String,
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status_code = match self.kind() {
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = match self.kind() {
            // Internal errors are not intended to be shown to the client.
            ErrorKind::InternalError => {
                tracing::error!("An unexpected error occurred: {}", self);
                "An unexpected error occurred, check the server logs for more details.".to_owned()
            }
            _ => self.to_string(),
        };

        (status_code, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::{body::to_bytes, http::StatusCode, response::IntoResponse};

    use super::{Error, ErrorBody, ErrorKind};

    async fn into_status_and_body(error: Error) -> (StatusCode, ErrorBody) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).expect("error body is not valid JSON");

        (status, body)
    }

    #[test]
    fn kinds_cover_taxonomy() {
        assert_eq!(Error::MissingField("name").kind(), ErrorKind::InvalidInput);
        assert_eq!(Error::EmptyUpdate.kind(), ErrorKind::InvalidInput);
        assert_eq!(Error::InvalidListId(1).kind(), ErrorKind::InvalidInput);
        assert_eq!(Error::NotFound.kind(), ErrorKind::NotFound);
        assert_eq!(
            Error::DuplicateCatalogName("Milk".to_owned()).kind(),
            ErrorKind::Conflict
        );
        assert_eq!(Error::DatabaseLockError.kind(), ErrorKind::InternalError);
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        assert_eq!(
            Error::from(rusqlite::Error::QueryReturnedNoRows),
            Error::NotFound
        );
    }

    #[tokio::test]
    async fn invalid_input_is_bad_request_with_message() {
        let (status, body) = into_status_and_body(Error::InvalidQuantity(0)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.error, "quantity must be at least 1, got 0");
    }

    #[tokio::test]
    async fn conflict_is_409() {
        let (status, body) =
            into_status_and_body(Error::DuplicateCatalogName("Eggs".to_owned())).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body.error.contains("Eggs"), "got {:?}", body.error);
    }

    #[tokio::test]
    async fn internal_error_hides_details() {
        let (status, body) = into_status_and_body(Error::SqlError(
            rusqlite::Error::InvalidColumnName("secret_column".to_owned()),
        ))
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body.error.contains("secret_column"));
    }
}
