//! Repository layer for database operations

pub mod books;
pub mod lendings;
pub mod members;

use sqlx::{Pool, Postgres};

/// Postgres caps a statement at 65535 bind parameters; bulk inserts are chunked under it
pub(crate) const BIND_LIMIT: usize = u16::MAX as usize;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub members: members::MembersRepository,
    pub books: books::BooksRepository,
    pub lendings: lendings::LendingsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            members: members::MembersRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            lendings: lendings::LendingsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Round-trip to the store, used by the readiness probe
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
