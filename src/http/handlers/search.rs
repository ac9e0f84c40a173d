//! Search handler

use std::path::Path;

use axum::extract::State;
use axum::response::Html;
use axum::Form;
use serde::Deserialize;
use tracing::{debug, warn};

use super::{AppState, HttpError};
use crate::http::render::{BackLink, Listing, ListingEntry};
use crate::http::virtual_path;

/// Body of `POST /search`
#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub search: String,
}

/// `POST /search`
pub async fn search(
    State(state): State<AppState>,
    Form(form): Form<SearchForm>,
) -> Result<Html<String>, HttpError> {
    let query = form.search;
    debug!("Search request: {}", query);

    let mut records = state.search(query.clone()).await?;
    records.sort_by_key(|r| r.display_name());

    let entries = records
        .iter()
        .filter_map(|record| {
            match virtual_path::from_absolute(state.root(), Path::new(&record.id)) {
                Some(location) => Some(ListingEntry::new(record, &location)),
                None => {
                    warn!("Search hit {} lies outside the served root", record.id);
                    None
                }
            }
        })
        .collect();

    let title = if query.trim().is_empty() {
        "Search".to_string()
    } else {
        format!("Search: {}", query)
    };

    let listing = Listing {
        title,
        back: BackLink::History,
        search_value: query,
        entries,
    };
    Ok(Html(listing.to_string()))
}
