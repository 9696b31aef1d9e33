//! Book (catalog) model and search filter types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::genre::Genre;
use crate::error::{AppError, AppResult};

/// Catalog search page size
pub const BOOK_PAGE_LIMIT: i64 = 50;

/// Book model from database
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    #[schema(value_type = i16, minimum = 0, maximum = 9)]
    pub genre: Genre,
    pub created_at: DateTime<Utc>,
}

/// Book annotated with its lending status
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BookWithLending {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub book: Book,
    /// Whether a live lending exists for this book
    pub lending: bool,
}

/// One entry of a bulk registration request
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBook {
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 255, message = "author must be 1-255 characters"))]
    pub author: String,
    #[schema(value_type = i16, minimum = 0, maximum = 9)]
    pub genre: Genre,
}

/// Catalog search query parameters, as received
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Substring of the title
    pub title: Option<String>,
    /// Substring of the author
    pub author: Option<String>,
    /// Exact genre (0-9)
    pub genre: Option<String>,
    /// Cursor: id of the last book of the previous page
    pub last_book_id: Option<String>,
}

/// Validated catalog filter; at least one criterion is present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookFilter {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<Genre>,
}

/// Where a search total comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalSource {
    /// Bare genre filter: the aggregate cache tracks exactly this count
    GenreCache(Genre),
    /// Anything involving a substring filter is counted in the store
    Store,
}

impl BookQuery {
    /// Split into a validated filter and the page cursor
    pub fn into_filter(self) -> AppResult<(BookFilter, Option<String>)> {
        fn present(v: Option<String>) -> Option<String> {
            v.filter(|s| !s.is_empty())
        }

        let genre = present(self.genre).map(|g| g.parse::<Genre>()).transpose()?;
        let filter = BookFilter {
            title: present(self.title),
            author: present(self.author),
            genre,
        };
        if filter.title.is_none() && filter.author.is_none() && filter.genre.is_none() {
            return Err(AppError::Validation(
                "title, author or genre is required".to_string(),
            ));
        }
        Ok((filter, present(self.last_book_id)))
    }
}

impl BookFilter {
    pub fn total_source(&self) -> TotalSource {
        match (self.genre, &self.title, &self.author) {
            (Some(genre), None, None) => TotalSource::GenreCache(genre),
            _ => TotalSource::Store,
        }
    }
}

/// Paginated search result
#[derive(Debug, Serialize, ToSchema)]
pub struct BookPage {
    pub books: Vec<BookWithLending>,
    pub total: i64,
}
