//! Book (catalog) endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::book::{Book, BookPage, BookQuery, BookWithLending, CreateBook},
};

use super::{AppJson, EncryptedQuery};

/// Register a batch of books
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body = Vec<CreateBook>,
    responses(
        (status = 201, description = "Books registered", body = Vec<Book>),
        (status = 400, description = "Invalid input", body = crate::error::ErrorResponse)
    )
)]
pub async fn register_books(
    State(state): State<crate::AppState>,
    AppJson(requests): AppJson<Vec<CreateBook>>,
) -> AppResult<(StatusCode, Json<Vec<Book>>)> {
    let books = state.services.catalog.register_books(requests).await?;
    Ok((StatusCode::CREATED, Json(books)))
}

/// Search the catalog by title, author and genre
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "One page of matching books", body = BookPage),
        (status = 400, description = "No criterion or bad genre", body = crate::error::ErrorResponse),
        (status = 404, description = "No books found", body = crate::error::ErrorResponse)
    )
)]
pub async fn search_books(
    State(state): State<crate::AppState>,
    Query(query): Query<BookQuery>,
) -> AppResult<Json<BookPage>> {
    let page = state.services.catalog.search(query).await?;
    Ok(Json(page))
}

/// Get a book by ID
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID, or codec token when encrypted"),
        EncryptedQuery
    ),
    responses(
        (status = 200, description = "Book with lending status", body = BookWithLending),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<String>,
    Query(query): Query<EncryptedQuery>,
) -> AppResult<Json<BookWithLending>> {
    let book = state.services.catalog.get_book(&id, query.encrypted()?).await?;
    Ok(Json(book))
}
