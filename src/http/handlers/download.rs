//! Range-aware file download

use std::io::SeekFrom;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, Method, StatusCode};
use axum::response::Response;
use futures::TryStreamExt;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::io::ReaderStream;
use tracing::{debug, error};

use super::{AppState, HttpError};
use crate::http::range::{self, ByteRange, RangeError};
use crate::http::virtual_path;
use crate::types::{path_to_id, FileRecord};

/// `GET`/`HEAD /download/<virtual path>`
pub async fn download(
    State(state): State<AppState>,
    method: Method,
    headers: HeaderMap,
    Path(path): Path<String>,
) -> Result<Response, HttpError> {
    let current = virtual_path::normalize(&path);
    let id = path_to_id(&virtual_path::to_absolute(state.root(), &current));

    let record = state
        .find_record(id)
        .await?
        .filter(|record| !record.is_directory())
        .ok_or(HttpError::NotFound)?;

    let builder = Response::builder()
        .header(header::ACCEPT_RANGES, "bytes")
        .header(header::CONTENT_TYPE, record.mime_type.as_str());

    if method == Method::HEAD {
        return builder
            .status(StatusCode::OK)
            .body(Body::empty())
            .map_err(|e| HttpError::Internal(e.to_string()));
    }

    let range = requested_range(&headers, record.size)?;

    let mut file = tokio::fs::File::open(&record.id).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            debug!("Indexed file {} is gone from disk", record.id);
            HttpError::NotFound
        } else {
            HttpError::Io(e)
        }
    })?;

    let (builder, length) = match range {
        Some(range) => {
            file.seek(SeekFrom::Start(range.start)).await?;
            let builder = builder
                .status(StatusCode::PARTIAL_CONTENT)
                .header(header::CONTENT_RANGE, range.content_range(record.size));
            (builder, range.length)
        }
        None => (builder.status(StatusCode::OK), record.size),
    };

    builder
        .header(header::CONTENT_LENGTH, length)
        .body(stream_body(file, length, &record))
        .map_err(|e| HttpError::Internal(e.to_string()))
}

/// The single range asked for, if any
fn requested_range(headers: &HeaderMap, size: u64) -> Result<Option<ByteRange>, HttpError> {
    let Some(value) = headers.get(header::RANGE) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| RangeError::Malformed)?;
    let specs = range::parse(value)?;
    match specs.as_slice() {
        [spec] => Ok(Some(spec.resolve(size)?)),
        _ => Err(HttpError::MultipleRanges),
    }
}

/// Body streaming `length` bytes from the current file position.
///
/// Headers are already committed once this runs, so a read error can only
/// be logged; the connection is then dropped mid-body.
fn stream_body(file: tokio::fs::File, length: u64, record: &FileRecord) -> Body {
    let id = record.id.clone();
    let stream = ReaderStream::new(file.take(length))
        .inspect_err(move |e| error!("Error streaming {}: {}", id, e));
    Body::from_stream(stream)
}
