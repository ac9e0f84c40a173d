//! Directory listing handlers

use axum::extract::{Path, State};
use axum::response::Html;
use tracing::debug;

use super::{AppState, HttpError};
use crate::http::render::{BackLink, Listing, ListingEntry};
use crate::http::virtual_path;
use crate::types::path_to_id;

/// `GET /browse`
pub async fn browse_root(State(state): State<AppState>) -> Result<Html<String>, HttpError> {
    list(&state, "/").await
}

/// `GET /browse/<virtual path>`
pub async fn browse(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Html<String>, HttpError> {
    list(&state, &path).await
}

async fn list(state: &AppState, raw_path: &str) -> Result<Html<String>, HttpError> {
    let current = virtual_path::normalize(raw_path);
    let dirname = path_to_id(&virtual_path::to_absolute(state.root(), &current));
    debug!("Listing {} ({})", current, dirname);

    let mut records = state.list_directory(dirname).await?;
    records.sort_by_key(|r| r.display_name());

    let entries = records
        .iter()
        .map(|record| {
            ListingEntry::new(record, &virtual_path::join(&current, &record.display_name()))
        })
        .collect();

    let back = match virtual_path::parent(&current) {
        Some(parent) => BackLink::Parent(virtual_path::href("/browse", &parent)),
        None => BackLink::None,
    };

    let listing = Listing {
        title: current,
        back,
        search_value: String::new(),
        entries,
    };
    Ok(Html(listing.to_string()))
}
