//! Members repository for database operations

use sqlx::{Pool, Postgres, QueryBuilder};

use crate::{
    error::{AppError, AppResult},
    models::member::{Member, MemberOrder, UpdateMember},
};

#[derive(Clone)]
pub struct MembersRepository {
    pool: Pool<Postgres>,
}

/// Where a member page starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum MemberCursor {
    Start,
    AfterId(String),
    /// Name orders compare on (name, id) so members sharing a name are not skipped
    AfterName(String, String),
}

impl MembersRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert a new member
    pub async fn create(&self, member: &Member) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO member (id, name, address, phone_number, banned, created_at)
            VALUES ($1, $2, $3, $4, false, $5)
            "#,
        )
        .bind(&member.id)
        .bind(&member.name)
        .bind(&member.address)
        .bind(&member.phone_number)
        .bind(member.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Get a non-banned member by ID
    pub async fn get_active(&self, id: &str) -> AppResult<Member> {
        sqlx::query_as::<_, Member>("SELECT * FROM member WHERE id = $1 AND banned = false")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member with id {} not found", id)))
    }

    /// Get a member by ID, banned or not
    pub async fn get_by_id(&self, id: &str) -> AppResult<Member> {
        sqlx::query_as::<_, Member>("SELECT * FROM member WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Member with id {} not found", id)))
    }

    /// One page of non-banned members
    pub async fn list(&self, order: MemberOrder, last_member_id: Option<&str>, limit: i64) -> AppResult<Vec<Member>> {
        let cursor = match (order, last_member_id) {
            (_, None) => MemberCursor::Start,
            (MemberOrder::Id, Some(id)) => MemberCursor::AfterId(id.to_string()),
            (MemberOrder::NameAsc | MemberOrder::NameDesc, Some(id)) => {
                let last = self.get_by_id(id).await?;
                MemberCursor::AfterName(last.name, last.id)
            }
        };

        let members = list_query(order, cursor, limit)
            .build_query_as::<Member>()
            .fetch_all(&self.pool)
            .await?;
        Ok(members)
    }

    /// Apply the non-empty fields of an edit to a non-banned member
    pub async fn update(&self, id: &str, update: &UpdateMember) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE member SET
                name = COALESCE($2, name),
                address = COALESCE($3, address),
                phone_number = COALESCE($4, phone_number)
            WHERE id = $1 AND banned = false
            "#,
        )
        .bind(id)
        .bind(&update.name)
        .bind(&update.address)
        .bind(&update.phone_number)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Member with id {} not found", id)));
        }
        Ok(())
    }

    /// Ban a member and drop all of their live lendings in one transaction.
    ///
    /// Returns the number of lendings released.
    pub async fn ban(&self, id: &str) -> AppResult<u64> {
        let mut tx = self.pool.begin().await?;

        let banned: Option<String> = sqlx::query_scalar(
            "UPDATE member SET banned = true WHERE id = $1 AND banned = false RETURNING id",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        if banned.is_none() {
            return Err(AppError::NotFound(format!("Member with id {} not found", id)));
        }

        let released = sqlx::query("DELETE FROM lending WHERE member_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        tx.commit().await?;
        Ok(released)
    }

    /// Count non-banned members
    pub async fn count_active(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM member WHERE banned = false")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

pub(crate) fn list_query(order: MemberOrder, cursor: MemberCursor, limit: i64) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new("SELECT * FROM member WHERE banned = false");

    match cursor {
        MemberCursor::Start => {}
        MemberCursor::AfterId(id) => {
            qb.push(" AND id > ").push_bind(id);
        }
        MemberCursor::AfterName(name, id) => {
            let op = if order == MemberOrder::NameDesc { "<" } else { ">" };
            qb.push(format!(" AND (name, id) {} (", op))
                .push_bind(name)
                .push(", ")
                .push_bind(id)
                .push(")");
        }
    }

    qb.push(match order {
        MemberOrder::Id => " ORDER BY id ASC",
        MemberOrder::NameAsc => " ORDER BY name ASC, id ASC",
        MemberOrder::NameDesc => " ORDER BY name DESC, id DESC",
    });
    qb.push(" LIMIT ").push_bind(limit);
    qb
}
