//! Book resource handlers.
//!
//! Misses on get and delete are not faults: get answers `200` with an empty
//! body and delete still reports success. Update against an unknown id is a
//! `not_found` fault.

use std::collections::HashMap;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use log::debug;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::AppState;
use crate::{Book, BookPatch, NewBook};

/// Collection endpoint path.
pub const BOOKS_PATH: &str = "/books";
/// Single book endpoint path.
pub const BOOK_PATH: &str = "/books/:id";

/// Message returned by a delete.
pub const DELETED_MESSAGE: &str = "Successful";

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedBook {
    pub book: Book,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Build the book CRUD routes.
pub fn book_routes() -> Router<AppState> {
    Router::new()
        .route(BOOKS_PATH, get(list_books).post(create_book))
        .route(BOOK_PATH, get(get_book).put(update_book).delete(delete_book))
}

async fn list_books(State(store): State<AppState>) -> Result<Json<Vec<Book>>, ApiError> {
    Ok(Json(store.list().await?))
}

async fn get_book(
    State(store): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    match store.find(&id).await? {
        Some(book) => Ok(Json(book).into_response()),
        None => {
            debug!("No book with id {}", id);
            Ok(StatusCode::OK.into_response())
        }
    }
}

async fn create_book(
    State(store): State<AppState>,
    payload: Result<Json<NewBook>, JsonRejection>,
) -> Result<Json<CreatedBook>, ApiError> {
    let Json(new_book) = payload?;
    let book = store.create(new_book).await?;
    debug!("Created book {}", book.id);
    Ok(Json(CreatedBook { book }))
}

async fn update_book(
    State(store): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<BookPatch>, JsonRejection>,
) -> Result<Json<HashMap<String, Book>>, ApiError> {
    let Json(patch) = payload?;
    let book = store.update(&id, patch).await?;
    Ok(Json(HashMap::from([(id, book)])))
}

async fn delete_book(
    State(store): State<AppState>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    if store.remove(&id).await?.is_none() {
        debug!("Delete of unknown book {} ignored", id);
    }
    Ok((
        StatusCode::NON_AUTHORITATIVE_INFORMATION,
        Json(MessageResponse {
            message: DELETED_MESSAGE.to_string(),
        }),
    ))
}
