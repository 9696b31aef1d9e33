//! Lending model and related types

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult};

/// Live lending row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Lending {
    pub id: String,
    pub member_id: String,
    pub book_id: String,
    pub due: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Lending joined with the member name and book title
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct LendingDetails {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub lending: Lending,
    pub member_name: String,
    pub book_title: String,
}

/// Batch lend or return request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LendingBatch {
    pub member_id: String,
    pub book_ids: Vec<String>,
}

impl LendingBatch {
    /// Reject empty batches and batches naming the same book twice
    pub fn validate(&self) -> AppResult<()> {
        if self.member_id.is_empty() {
            return Err(AppError::Validation("member_id is required".to_string()));
        }
        if self.book_ids.is_empty() {
            return Err(AppError::Validation("at least one book_ids is required".to_string()));
        }
        let mut seen = HashSet::with_capacity(self.book_ids.len());
        for id in &self.book_ids {
            if id.is_empty() {
                return Err(AppError::Validation("book_ids must not contain empty ids".to_string()));
            }
            if !seen.insert(id.as_str()) {
                return Err(AppError::Validation(format!("book {} appears twice in the batch", id)));
            }
        }
        Ok(())
    }
}

/// Lending listing query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct LendingQuery {
    /// `true` keeps only lendings whose due date has passed
    pub over_due: Option<String>,
    /// Restrict to one member
    pub member_id: Option<String>,
}
