//! Book endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookPayload, BookQuery, BookShort},
};

use super::{ApiJson, ApiQuery, ApiResponse};

/// Data returned when a book is created
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookIdData {
    pub book_id: String,
}

/// Data returned by the list endpoint
#[derive(Serialize, ToSchema)]
pub struct BooksData {
    pub books: Vec<BookShort>,
}

/// Data returned by the details endpoint
#[derive(Serialize, ToSchema)]
pub struct BookData {
    pub book: Book,
}

/// Add a book to the shelf
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = BookPayload,
    responses(
        (status = 201, description = "Book added", body = BookIdData),
        (status = 400, description = "Missing name or readPage greater than pageCount")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    ApiJson(payload): ApiJson<BookPayload>,
) -> AppResult<(StatusCode, Json<ApiResponse<BookIdData>>)> {
    payload
        .check()
        .map_err(|issue| AppError::Validation(issue.create_message().to_string()))?;

    let book_id = state.services.books.create(payload)?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::message_with_data("book added", BookIdData { book_id })),
    ))
}

/// List books, optionally filtered
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Matching books (id, name, publisher)", body = BooksData),
        (status = 400, description = "Malformed query")
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    ApiQuery(query): ApiQuery<BookQuery>,
) -> AppResult<Json<ApiResponse<BooksData>>> {
    let books = state
        .services
        .books
        .list(&query)?
        .iter()
        .map(BookShort::from)
        .collect();

    Ok(Json(ApiResponse::data(BooksData { books })))
}

/// Get book details by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book details", body = BookData),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<BookData>>> {
    let book = state
        .services
        .books
        .get_by_id(&id)
        .map_err(|e| e.or_not_found("book not found"))?;

    Ok(Json(ApiResponse::data(BookData { book })))
}

/// Update a book
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    request_body = BookPayload,
    responses(
        (status = 200, description = "Book updated"),
        (status = 400, description = "Missing name or readPage greater than pageCount"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<BookPayload>,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .services
        .books
        .update(&id, payload)
        .map_err(|e| e.or_not_found("update failed: id not found"))?;

    Ok(Json(ApiResponse::message("book updated")))
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Book deleted"),
        (status = 404, description = "Book not found")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<()>>> {
    state
        .services
        .books
        .delete_by_id(&id)
        .map_err(|e| e.or_not_found("delete failed: id not found"))?;

    Ok(Json(ApiResponse::message("book deleted")))
}
