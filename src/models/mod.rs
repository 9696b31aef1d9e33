//! Data models for Shelfmark

pub mod book;
pub mod genre;
pub mod lending;
pub mod member;

use chrono::{DateTime, SubsecRound, Utc};
use uuid::Uuid;

// Re-export commonly used types
pub use book::{Book, BookFilter, BookWithLending, TotalSource};
pub use genre::Genre;
pub use lending::{Lending, LendingDetails};
pub use member::Member;

/// New entity id: UUIDv7 text, which sorts by creation time and doubles as the page cursor
pub fn generate_id() -> String {
    Uuid::now_v7().to_string()
}

/// Current time at the store's microsecond precision
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}
