//! HTTP surface: directory browsing, search, downloads and static assets
//!
//! Handlers only read from the index. Each read runs against its own
//! snapshot on the blocking pool.

pub mod assets;
pub mod error;
pub mod handlers;
pub mod range;
pub mod render;
pub mod routes;
pub mod server;
pub mod virtual_path;

pub use error::HttpError;
pub use handlers::AppState;
pub use routes::create_router;
pub use server::HttpServer;
