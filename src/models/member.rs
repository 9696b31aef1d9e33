//! Member model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Member page size
pub const MEMBER_PAGE_LIMIT: i64 = 100;

/// Member model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Member {
    pub id: String,
    pub name: String,
    pub address: String,
    pub phone_number: String,
    pub banned: bool,
    pub created_at: DateTime<Utc>,
}

/// Register member request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateMember {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "address is required"))]
    pub address: String,
    #[validate(length(min = 1, message = "phone_number is required"))]
    pub phone_number: String,
}

/// Edit member request; empty strings leave the field untouched
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateMember {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
}

impl UpdateMember {
    /// Drop empty fields and require at least one remaining
    pub fn normalized(self) -> AppResult<Self> {
        fn keep(v: Option<String>) -> Option<String> {
            v.filter(|s| !s.is_empty())
        }
        let update = Self {
            name: keep(self.name),
            address: keep(self.address),
            phone_number: keep(self.phone_number),
        };
        if update.name.is_none() && update.address.is_none() && update.phone_number.is_none() {
            return Err(AppError::Validation(
                "name, address or phone_number is required".to_string(),
            ));
        }
        Ok(update)
    }
}

/// Member listing order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MemberOrder {
    #[default]
    Id,
    NameAsc,
    NameDesc,
}

impl std::str::FromStr for MemberOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(MemberOrder::Id),
            "name_asc" => Ok(MemberOrder::NameAsc),
            "name_desc" => Ok(MemberOrder::NameDesc),
            other => Err(AppError::Validation(format!("invalid order '{}'", other))),
        }
    }
}

/// Member listing query parameters
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct MemberQuery {
    /// Cursor: id of the last member of the previous page
    pub last_member_id: Option<String>,
    /// `name_asc`, `name_desc`, or absent for id order
    pub order: Option<String>,
}

impl MemberQuery {
    pub fn order(&self) -> AppResult<MemberOrder> {
        self.order.as_deref().unwrap_or_default().parse()
    }

    pub fn cursor(&self) -> Option<&str> {
        self.last_member_id.as_deref().filter(|s| !s.is_empty())
    }
}

/// Paginated member listing
#[derive(Debug, Serialize, ToSchema)]
pub struct MemberPage {
    pub members: Vec<Member>,
    /// Number of non-banned members
    pub total: i64,
}
