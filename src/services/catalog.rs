//! Catalog service: bulk registration and search

use std::collections::BTreeMap;
use std::sync::Arc;

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookPage, BookQuery, BookWithLending, CreateBook, BOOK_PAGE_LIMIT},
        generate_id, now, Genre, TotalSource,
    },
    repository::Repository,
    services::{aggregate_cache::AggregateCache, codec::IdCodec},
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
    cache: Arc<AggregateCache>,
    codec: Arc<dyn IdCodec>,
}

impl CatalogService {
    pub fn new(repository: Repository, cache: Arc<AggregateCache>, codec: Arc<dyn IdCodec>) -> Self {
        Self {
            repository,
            cache,
            codec,
        }
    }

    /// Register a batch of books with their suffix index entries.
    ///
    /// Every entry is validated before the store is touched; the batch is
    /// written in one transaction and the genre counters move after commit.
    pub async fn register_books(&self, requests: Vec<CreateBook>) -> AppResult<Vec<Book>> {
        if requests.is_empty() {
            return Err(AppError::Validation("at least one book is required".to_string()));
        }
        for request in &requests {
            request.validate()?;
        }

        let created_at = now();
        let books: Vec<Book> = requests
            .into_iter()
            .map(|request| Book {
                id: generate_id(),
                title: request.title,
                author: request.author,
                genre: request.genre,
                created_at,
            })
            .collect();

        self.repository.books.register(&books).await?;

        for (genre, count) in count_by_genre(&books) {
            self.cache.on_books_registered(genre, count);
        }
        tracing::info!(count = books.len(), "Books registered");
        Ok(books)
    }

    /// One page of books matching the query
    pub async fn search(&self, query: BookQuery) -> AppResult<BookPage> {
        let (filter, last_book_id) = query.into_filter()?;

        let known_total = match filter.total_source() {
            TotalSource::GenreCache(genre) => Some(self.cache.genre_count(genre)),
            TotalSource::Store => None,
        };

        let (books, total) = self
            .repository
            .books
            .search(&filter, last_book_id.as_deref(), BOOK_PAGE_LIMIT, known_total)
            .await?;

        if total == 0 {
            return Err(AppError::NotFound("no books found".to_string()));
        }
        if books.is_empty() {
            return Err(AppError::NotFound("no books to show in this page".to_string()));
        }

        tracing::debug!(?filter, total, page = books.len(), "Catalog search");
        Ok(BookPage { books, total })
    }

    /// Get a book with its lending status; `encrypted` ids go through the codec first
    pub async fn get_book(&self, id: &str, encrypted: bool) -> AppResult<BookWithLending> {
        let id = if encrypted {
            self.codec.decode(id)?
        } else {
            id.to_string()
        };
        self.repository.books.get_with_lending(&id).await
    }
}

fn count_by_genre(books: &[Book]) -> BTreeMap<Genre, i64> {
    let mut counts = BTreeMap::new();
    for book in books {
        *counts.entry(book.genre).or_insert(0) += 1;
    }
    counts
}
