//! Machine-readable API description.
//!
//! Served as an OpenAPI 3.0 document. It is descriptive only and has no
//! effect on request handling.

use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use super::AppState;

/// Documentation endpoint path.
pub const DOCS_PATH: &str = "/api-docs";

/// Build the documentation route, advertising `server_url` as the API base.
pub fn docs_routes(server_url: &str) -> Router<AppState> {
    let document = openapi_document(server_url);
    Router::new().route(
        DOCS_PATH,
        get(move || {
            let document = document.clone();
            async move { Json(document) }
        }),
    )
}

fn id_parameter() -> Value {
    json!({
        "in": "path",
        "name": "id",
        "required": true,
        "schema": { "type": "string" },
        "description": "The book id"
    })
}

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": json_content(json!({ "$ref": "#/components/schemas/Error" }))
    })
}

fn book_ref() -> Value {
    json!({ "$ref": "#/components/schemas/Book" })
}

fn json_content(schema: Value) -> Value {
    json!({ "application/json": { "schema": schema } })
}

fn list_operation() -> Value {
    json!({
        "summary": "Returns all registered books",
        "tags": ["Books"],
        "responses": {
            "200": {
                "description": "The list of the books",
                "content": json_content(json!({ "type": "array", "items": book_ref() }))
            }
        }
    })
}

fn create_operation() -> Value {
    let created = json!({ "type": "object", "properties": { "book": book_ref() } });
    json!({
        "summary": "Create a new book",
        "tags": ["Books"],
        "requestBody": {
            "required": true,
            "content": json_content(json!({ "$ref": "#/components/schemas/NewBook" }))
        },
        "responses": {
            "200": { "description": "The book was created", "content": json_content(created) },
            "406": error_response("The request body is unacceptable")
        }
    })
}

fn get_operation() -> Value {
    json!({
        "summary": "Returns the book by id",
        "tags": ["Books"],
        "parameters": [id_parameter()],
        "responses": {
            "200": {
                "description": "The book, or an empty body when no book has this id",
                "content": json_content(book_ref())
            },
            "406": error_response("The book could not be read")
        }
    })
}

fn update_operation() -> Value {
    let patch = json!({ "type": "object", "additionalProperties": true });
    let keyed = json!({ "type": "object", "additionalProperties": book_ref() });
    json!({
        "summary": "Update the book by id",
        "tags": ["Books"],
        "parameters": [id_parameter()],
        "requestBody": { "required": true, "content": json_content(patch) },
        "responses": {
            "200": { "description": "The updated book, keyed by its id", "content": json_content(keyed) },
            "406": error_response("Unknown id or unacceptable fields")
        }
    })
}

fn delete_operation() -> Value {
    let message = json!({ "type": "object", "properties": { "message": { "type": "string" } } });
    json!({
        "summary": "Delete a book",
        "tags": ["Books"],
        "parameters": [id_parameter()],
        "responses": {
            "203": {
                "description": "The book was deleted, or no book had this id",
                "content": json_content(message)
            },
            "406": error_response("The book could not be deleted")
        }
    })
}

fn schemas() -> Value {
    let book = json!({
        "type": "object",
        "required": ["id"],
        "properties": {
            "id": { "type": "string", "description": "The auto-generated id" },
            "title": { "type": "string", "description": "Title of the book" },
            "author": { "type": "string", "description": "The author of the book" }
        },
        "example": { "id": "V1StGXR8", "title": "Make it happen", "author": "John Doe" }
    });
    let new_book = json!({
        "type": "object",
        "properties": { "title": { "type": "string" }, "author": { "type": "string" } }
    });
    let error = json!({
        "type": "object",
        "properties": {
            "error": { "type": "string" },
            "kind": { "type": "string", "enum": ["validation", "not_found", "internal"] }
        }
    });
    json!({ "Book": book, "NewBook": new_book, "Error": error })
}

/// Builds the OpenAPI document for the book routes.
pub fn openapi_document(server_url: &str) -> Value {
    json!({
        "openapi": "3.0.0",
        "info": {
            "title": "Bookshelf API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION")
        },
        "servers": [{ "url": server_url }],
        "tags": [{ "name": "Books", "description": "Operations on the book collection" }],
        "paths": {
            "/books": { "get": list_operation(), "post": create_operation() },
            "/books/{id}": {
                "get": get_operation(),
                "put": update_operation(),
                "delete": delete_operation()
            }
        },
        "components": { "schemas": schemas() }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_all_operations() {
        let doc = openapi_document("http://localhost:8080");
        assert_eq!(doc["servers"][0]["url"], "http://localhost:8080");

        let paths = &doc["paths"];
        for method in ["get", "post"] {
            assert!(paths["/books"][method].is_object(), "missing {} /books", method);
        }
        for method in ["get", "put", "delete"] {
            assert!(paths["/books/{id}"][method].is_object(), "missing {} /books/{{id}}", method);
        }
        assert!(paths["/books/{id}"]["delete"]["responses"]["203"].is_object());
    }
}
