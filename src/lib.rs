//! Bookshelf is a small REST service exposing CRUD operations over books.
//!
//! The whole collection lives in a single JSON document on disk. It is loaded
//! once at startup and every mutation rewrites the document before returning.
//!
//! ## Core Components
//! - [`engine`]: The storage backend (in-memory document with file persistence).
//! - [`model`]: The `Book` record and its partial-update form.
//! - [`server`]: HTTP routing and handlers.
//! - [`cli`]: Command-line client working on the store file directly.

pub mod cli;
pub mod engine;
pub mod model;
pub mod server;

use async_trait::async_trait;
use thiserror::Error;

pub use model::{Book, BookPatch, NewBook};

/// Errors returned by the Bookshelf store.
#[derive(Error, Debug)]
pub enum Error {
    /// No book carries the requested id.
    #[error("book not found: {0}")]
    BookNotFound(String),
    /// A field in a request had the wrong shape.
    #[error("invalid value for field '{field}': {reason}")]
    InvalidField { field: String, reason: String },
    /// A configuration value could not be used.
    #[error("invalid configuration: {0}")]
    Config(String),
    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
    /// An I/O error occurred while reading or flushing the store file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Error during JSON serialization or deserialization.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A specialized Result type for Bookshelf operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Read access to the book collection.
#[async_trait]
pub trait BookReader: Send + Sync {
    /// Returns every book in insertion order.
    async fn list(&self) -> Result<Vec<Book>>;
    /// Returns the first book whose id matches, if any.
    async fn find(&self, id: &str) -> Result<Option<Book>>;
}

/// Mutations of the book collection. Each one is flushed before it returns.
#[async_trait]
pub trait BookWriter: Send + Sync {
    /// Assigns a fresh id, appends the book and returns the stored record.
    async fn create(&self, book: NewBook) -> Result<Book>;
    /// Shallow-merges `patch` into the book with the given id.
    ///
    /// Returns [`Error::BookNotFound`] when no book matches.
    async fn update(&self, id: &str, patch: BookPatch) -> Result<Book>;
    /// Removes the first book with the given id. Returns the removed record,
    /// or `None` when nothing matched.
    async fn remove(&self, id: &str) -> Result<Option<Book>>;
}

/// The primary interface for the Bookshelf store.
pub trait BookStore: BookReader + BookWriter {}

impl<T: BookReader + BookWriter> BookStore for T {}
