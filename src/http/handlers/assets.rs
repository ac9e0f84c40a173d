//! Bundled static files

use axum::body::Body;
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::Response;

use super::HttpError;
use crate::http::assets;

/// `GET /static/<asset>`
pub async fn static_asset(Path(path): Path<String>) -> Result<Response, HttpError> {
    let asset = assets::lookup(&path).ok_or(HttpError::NotFound)?;
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, asset.content_type)
        .header(header::CACHE_CONTROL, "public, max-age=3600")
        .body(Body::from(asset.bytes))
        .map_err(|e| HttpError::Internal(e.to_string()))
}
