//! Books repository: bulk registration, suffix index writes and catalog search

use std::collections::HashSet;

use sqlx::{PgConnection, Pool, Postgres, QueryBuilder};

use super::BIND_LIMIT;
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookFilter, BookWithLending, Genre},
    suffix::{prefix_pattern, suffix_rows, SuffixField, SuffixRow},
};

const BOOK_COLUMNS: usize = 5;
const SUFFIX_COLUMNS: usize = 2;

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    // =========================================================================
    // CREATE
    // =========================================================================

    /// Insert books with their title and author suffixes as one unit of work.
    ///
    /// A book is never visible without its full suffix set: any failure rolls
    /// back every row of the batch.
    pub async fn register(&self, books: &[Book]) -> AppResult<()> {
        let titles = suffix_rows(books, SuffixField::Title);
        let authors = suffix_rows(books, SuffixField::Author);

        let mut tx = self.pool.begin().await?;
        insert_books(&mut *tx, books).await?;
        insert_suffixes(&mut *tx, SuffixField::Title, &titles).await?;
        insert_suffixes(&mut *tx, SuffixField::Author, &authors).await?;
        tx.commit().await?;

        tracing::debug!(
            books = books.len(),
            title_suffixes = titles.len(),
            author_suffixes = authors.len(),
            "Registered books"
        );
        Ok(())
    }

    // =========================================================================
    // READ
    // =========================================================================

    /// Get a book with its lending status
    pub async fn get_with_lending(&self, id: &str) -> AppResult<BookWithLending> {
        sqlx::query_as::<_, BookWithLending>(
            r#"
            SELECT b.id, b.title, b.author, b.genre, b.created_at,
                   EXISTS(SELECT 1 FROM lending l WHERE l.book_id = b.id) AS lending
            FROM book b
            WHERE b.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Book with id {} not found", id)))
    }

    /// Book count per genre; genres without books are absent
    pub async fn count_by_genre(&self) -> AppResult<Vec<(Genre, i64)>> {
        let counts = sqlx::query_as::<_, (Genre, i64)>(
            "SELECT genre, COUNT(*) FROM book GROUP BY genre ORDER BY genre",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(counts)
    }

    // =========================================================================
    // SEARCH
    // =========================================================================

    /// One page of books matching `filter`, with the total match count.
    ///
    /// `known_total` skips the count query when the caller already has an
    /// exact total. A zero total returns an empty page without fetching.
    pub async fn search(
        &self,
        filter: &BookFilter,
        last_book_id: Option<&str>,
        limit: i64,
        known_total: Option<i64>,
    ) -> AppResult<(Vec<BookWithLending>, i64)> {
        if known_total == Some(0) {
            return Ok((Vec::new(), 0));
        }

        let mut tx = self.pool.begin().await?;

        let total = match known_total {
            Some(total) => total,
            None => {
                count_query(filter)
                    .build_query_scalar::<i64>()
                    .fetch_one(&mut *tx)
                    .await?
            }
        };
        if total == 0 {
            return Ok((Vec::new(), 0));
        }

        let books = page_query(filter, last_book_id, limit)
            .build_query_as::<Book>()
            .fetch_all(&mut *tx)
            .await?;
        if books.is_empty() {
            return Ok((Vec::new(), total));
        }

        let ids: Vec<String> = books.iter().map(|b| b.id.clone()).collect();
        let lent: HashSet<String> = sqlx::query_scalar::<_, String>("SELECT book_id FROM lending WHERE book_id = ANY($1)")
            .bind(&ids)
            .fetch_all(&mut *tx)
            .await?
            .into_iter()
            .collect();

        tx.commit().await?;

        let page = books
            .into_iter()
            .map(|book| {
                let lending = lent.contains(&book.id);
                BookWithLending { book, lending }
            })
            .collect();
        Ok((page, total))
    }
}

async fn insert_books(conn: &mut PgConnection, books: &[Book]) -> AppResult<()> {
    for chunk in books.chunks(BIND_LIMIT / BOOK_COLUMNS) {
        let mut qb = QueryBuilder::<Postgres>::new("INSERT INTO book (id, title, author, genre, created_at) ");
        qb.push_values(chunk, |mut row, book| {
            row.push_bind(&book.id)
                .push_bind(&book.title)
                .push_bind(&book.author)
                .push_bind(book.genre)
                .push_bind(book.created_at);
        });
        qb.build().execute(&mut *conn).await?;
    }
    Ok(())
}

async fn insert_suffixes(conn: &mut PgConnection, field: SuffixField, rows: &[SuffixRow<'_>]) -> AppResult<()> {
    for chunk in rows.chunks(BIND_LIMIT / SUFFIX_COLUMNS) {
        let mut qb = QueryBuilder::<Postgres>::new(format!(
            "INSERT INTO {} (book_id, {}) ",
            field.table(),
            field.column()
        ));
        qb.push_values(chunk, |mut b, row| {
            b.push_bind(row.book_id).push_bind(row.suffix);
        });
        qb.build().execute(&mut *conn).await?;
    }
    Ok(())
}

/// Append the filter's predicates; the builder must already end in a WHERE clause
fn push_predicates(qb: &mut QueryBuilder<'static, Postgres>, filter: &BookFilter) {
    if let Some(genre) = filter.genre {
        qb.push(" AND genre = ").push_bind(genre);
    }
    let text_filters = [
        (SuffixField::Title, &filter.title),
        (SuffixField::Author, &filter.author),
    ];
    for (field, value) in text_filters {
        if let Some(value) = value {
            qb.push(format!(
                " AND id IN (SELECT book_id FROM {} WHERE {} LIKE ",
                field.table(),
                field.column()
            ))
            .push_bind(prefix_pattern(value))
            .push(")");
        }
    }
}

pub(crate) fn count_query(filter: &BookFilter) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT COUNT(*) FROM book WHERE TRUE");
    push_predicates(&mut qb, filter);
    qb
}

pub(crate) fn page_query(filter: &BookFilter, last_book_id: Option<&str>, limit: i64) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT id, title, author, genre, created_at FROM book WHERE TRUE");
    push_predicates(&mut qb, filter);
    if let Some(cursor) = last_book_id {
        qb.push(" AND id > ").push_bind(cursor.to_string());
    }
    qb.push(" ORDER BY id ASC LIMIT ").push_bind(limit);
    qb
}
