//! Lendings repository for database operations

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use sqlx::{FromRow, Pool, Postgres, QueryBuilder};

use crate::{
    error::{AppError, AppResult},
    models::{generate_id, Lending, LendingDetails},
};

#[derive(Clone)]
pub struct LendingsRepository {
    pool: Pool<Postgres>,
}

#[derive(FromRow)]
struct MemberStatus {
    name: String,
    banned: bool,
}

#[derive(FromRow)]
struct BookTitle {
    id: String,
    title: String,
}

impl LendingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Lend every book of the batch to a member, or none of them.
    ///
    /// The member row is share-locked so a concurrent ban waits for this
    /// transaction, and the book rows are locked in id order before the
    /// availability check so two lends of the same book serialize. The unique
    /// index on `lending.book_id` backs both.
    pub async fn lend(
        &self,
        member_id: &str,
        book_ids: &[String],
        lent_at: DateTime<Utc>,
        due: DateTime<Utc>,
    ) -> AppResult<Vec<LendingDetails>> {
        let mut tx = self.pool.begin().await?;

        let member = sqlx::query_as::<_, MemberStatus>("SELECT name, banned FROM member WHERE id = $1 FOR SHARE")
            .bind(member_id)
            .fetch_optional(&mut *tx)
            .await?
            .filter(|m| !m.banned)
            .ok_or_else(|| AppError::NotFound(format!("Member with id {} not found", member_id)))?;

        let titles: HashMap<String, String> = sqlx::query_as::<_, BookTitle>(
            "SELECT id, title FROM book WHERE id = ANY($1) ORDER BY id FOR UPDATE",
        )
        .bind(book_ids)
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .map(|b| (b.id, b.title))
        .collect();

        if let Some(missing) = book_ids.iter().find(|id| !titles.contains_key(*id)) {
            return Err(AppError::NotFound(format!("Book with id {} not found", missing)));
        }

        let lent: Vec<String> = sqlx::query_scalar("SELECT book_id FROM lending WHERE book_id = ANY($1) ORDER BY book_id")
            .bind(book_ids)
            .fetch_all(&mut *tx)
            .await?;
        if let Some(book_id) = lent.first() {
            return Err(AppError::Conflict(format!("Book {} is already lent", book_id)));
        }

        let lendings: Vec<Lending> = book_ids
            .iter()
            .map(|book_id| Lending {
                id: generate_id(),
                member_id: member_id.to_string(),
                book_id: book_id.clone(),
                due,
                created_at: lent_at,
            })
            .collect();

        let mut qb = QueryBuilder::<Postgres>::new("INSERT INTO lending (id, member_id, book_id, due, created_at) ");
        qb.push_values(&lendings, |mut row, lending| {
            row.push_bind(&lending.id)
                .push_bind(&lending.member_id)
                .push_bind(&lending.book_id)
                .push_bind(lending.due)
                .push_bind(lending.created_at);
        });
        qb.build().execute(&mut *tx).await.map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                AppError::Conflict("Book is already lent".to_string())
            }
            e => AppError::Database(e),
        })?;

        tx.commit().await?;

        Ok(lendings
            .into_iter()
            .map(|lending| {
                let book_title = titles.get(&lending.book_id).cloned().unwrap_or_default();
                LendingDetails {
                    lending,
                    member_name: member.name.clone(),
                    book_title,
                }
            })
            .collect())
    }

    /// Return every book of the batch from a member, or none of them.
    ///
    /// Each book must have a live lending held by exactly this member.
    pub async fn return_books(&self, member_id: &str, book_ids: &[String]) -> AppResult<()> {
        let mut tx = self.pool.begin().await?;

        let member_exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM member WHERE id = $1)")
            .bind(member_id)
            .fetch_one(&mut *tx)
            .await?;
        if !member_exists {
            return Err(AppError::NotFound(format!("Member with id {} not found", member_id)));
        }

        let returned: HashSet<String> = sqlx::query_scalar::<_, String>(
            "DELETE FROM lending WHERE member_id = $1 AND book_id = ANY($2) RETURNING book_id",
        )
        .bind(member_id)
        .bind(book_ids)
        .fetch_all(&mut *tx)
        .await?
        .into_iter()
        .collect();

        if let Some(missing) = book_ids.iter().find(|id| !returned.contains(*id)) {
            return Err(AppError::NotFound(format!(
                "No lending of book {} by member {}",
                missing, member_id
            )));
        }

        tx.commit().await?;
        Ok(())
    }

    /// Live lendings with member name and book title, ordered by lending id
    pub async fn list(
        &self,
        overdue_at: Option<DateTime<Utc>>,
        member_id: Option<&str>,
    ) -> AppResult<Vec<LendingDetails>> {
        let lendings = list_query(overdue_at, member_id)
            .build_query_as::<LendingDetails>()
            .fetch_all(&self.pool)
            .await?;
        Ok(lendings)
    }
}

/// `overdue_at` keeps lendings whose due date is before that instant
pub(crate) fn list_query(overdue_at: Option<DateTime<Utc>>, member_id: Option<&str>) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(
        "SELECT l.id, l.member_id, l.book_id, l.due, l.created_at, \
         m.name AS member_name, b.title AS book_title \
         FROM lending l \
         JOIN member m ON l.member_id = m.id \
         JOIN book b ON l.book_id = b.id \
         WHERE TRUE",
    );
    if let Some(now) = overdue_at {
        qb.push(" AND l.due < ").push_bind(now);
    }
    if let Some(member_id) = member_id {
        qb.push(" AND l.member_id = ").push_bind(member_id.to_string());
    }
    qb.push(" ORDER BY l.id ASC");
    qb
}
