//! Lending ledger service

use crate::{
    config::LendingConfig,
    error::AppResult,
    models::{
        lending::{LendingBatch, LendingDetails},
        now,
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct LendingsService {
    repository: Repository,
    period: chrono::Duration,
}

impl LendingsService {
    pub fn new(repository: Repository, config: &LendingConfig) -> Self {
        Self {
            repository,
            period: config.period(),
        }
    }

    /// Lend a batch of books to one member, due one lending period from now
    pub async fn lend(&self, batch: LendingBatch) -> AppResult<Vec<LendingDetails>> {
        batch.validate()?;

        let lent_at = now();
        let due = lent_at + self.period;
        let lendings = self
            .repository
            .lendings
            .lend(&batch.member_id, &batch.book_ids, lent_at, due)
            .await?;

        tracing::info!(member_id = %batch.member_id, count = lendings.len(), %due, "Books lent");
        Ok(lendings)
    }

    /// Return a batch of books held by one member
    pub async fn return_books(&self, batch: LendingBatch) -> AppResult<()> {
        batch.validate()?;
        self.repository
            .lendings
            .return_books(&batch.member_id, &batch.book_ids)
            .await?;

        tracing::info!(member_id = %batch.member_id, count = batch.book_ids.len(), "Books returned");
        Ok(())
    }

    /// Live lendings, optionally only the overdue ones or one member's
    pub async fn list(&self, over_due: bool, member_id: Option<&str>) -> AppResult<Vec<LendingDetails>> {
        let overdue_at = over_due.then(now);
        self.repository.lendings.list(overdue_at, member_id).await
    }
}
