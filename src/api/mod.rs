//! API handlers for Shelfmark REST endpoints

pub mod admin;
pub mod books;
pub mod health;
pub mod lendings;
pub mod members;
pub mod openapi;

use axum::extract::FromRequest;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::error::{AppError, AppResult};

/// `Json` whose rejections are reported as validation errors
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `?encrypted=true` on single-entity lookups
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EncryptedQuery {
    /// `true` when the path id is a codec token
    pub encrypted: Option<String>,
}

impl EncryptedQuery {
    pub fn encrypted(&self) -> AppResult<bool> {
        parse_flag("encrypted", self.encrypted.as_deref())
    }
}

/// Boolean query flag: absent or empty is `false`
pub(crate) fn parse_flag(name: &str, value: Option<&str>) -> AppResult<bool> {
    match value.unwrap_or_default() {
        "" | "false" => Ok(false),
        "true" => Ok(true),
        other => Err(AppError::Validation(format!(
            "{} must be true or false, got '{}'",
            name, other
        ))),
    }
}
