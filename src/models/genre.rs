//! Book classification following the Universal Decimal Classification main classes

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Number of genre cells tracked by the aggregate cache
pub const GENRE_COUNT: usize = 10;

/// Book genre, stored as SMALLINT 0-9
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type)]
#[serde(try_from = "i16", into = "i16")]
#[repr(i16)]
pub enum Genre {
    General = 0,
    Philosophy = 1,
    Religion = 2,
    SocialScience = 3,
    Vacant = 4,
    Mathematics = 5,
    AppliedSciences = 6,
    Arts = 7,
    Literature = 8,
    Geography = 9,
}

impl Genre {
    pub const ALL: [Genre; GENRE_COUNT] = [
        Genre::General,
        Genre::Philosophy,
        Genre::Religion,
        Genre::SocialScience,
        Genre::Vacant,
        Genre::Mathematics,
        Genre::AppliedSciences,
        Genre::Arts,
        Genre::Literature,
        Genre::Geography,
    ];

    /// Position of this genre's counter cell
    pub fn index(self) -> usize {
        self as i16 as usize
    }
}

impl TryFrom<i16> for Genre {
    type Error = AppError;

    fn try_from(v: i16) -> Result<Self, Self::Error> {
        usize::try_from(v)
            .ok()
            .and_then(|i| Genre::ALL.get(i).copied())
            .ok_or_else(|| AppError::Validation(format!("genre must be between 0 and 9, got {}", v)))
    }
}

impl From<Genre> for i16 {
    fn from(g: Genre) -> Self {
        g as i16
    }
}

impl std::str::FromStr for Genre {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let v: i16 = s
            .trim()
            .parse()
            .map_err(|_| AppError::Validation(format!("genre must be an integer, got '{}'", s)))?;
        Genre::try_from(v)
    }
}

impl std::fmt::Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", *self as i16)
    }
}
