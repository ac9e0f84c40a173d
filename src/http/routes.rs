//! Route definitions

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{self, AppState};

/// Create the router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/browse", get(handlers::browse_root))
        .route("/browse/", get(handlers::browse_root))
        .route("/browse/*path", get(handlers::browse))
        .route(
            "/download/*path",
            get(handlers::download).head(handlers::download),
        )
        .route("/search", post(handlers::search))
        .route("/static/*asset", get(handlers::static_asset))
        .with_state(state)
}
