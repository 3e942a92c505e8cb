/// HTTP server for the Bookshelf store.
///
/// [`Router`] assembles the book routes, the API description and the
/// middleware stack, and serves them over TCP.
pub mod books;
pub mod config;
pub mod docs;
pub mod error;
pub mod router;

use std::sync::Arc;

pub use config::ServerConfig;
pub use error::ApiError;
pub use router::Router;

/// Shared state handed to every handler.
pub type AppState = Arc<dyn crate::BookStore>;
