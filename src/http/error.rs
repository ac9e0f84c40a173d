//! Request errors and their HTTP status codes

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use crate::index::IndexError;

use super::range::RangeError;

/// Errors a request handler can end with.
///
/// Everything here is raised before the response head is sent; failures
/// while streaming a body are logged by the stream itself.
#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Not found")]
    NotFound,
    #[error("Invalid Range header: {0}")]
    Range(#[from] RangeError),
    #[error("Multiple ranges are not supported")]
    MultipleRanges,
    #[error("Index error: {0}")]
    Index(#[from] IndexError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl HttpError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Range(_) => StatusCode::BAD_REQUEST,
            Self::MultipleRanges => StatusCode::NOT_IMPLEMENTED,
            Self::Index(_) | Self::Io(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() && status != StatusCode::NOT_IMPLEMENTED {
            error!("Request failed: {}", self);
        }
        match self {
            Self::NotFound => (status, "Not Found").into_response(),
            _ => status.into_response(),
        }
    }
}
