use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// First year the court published archived oral-argument video.
pub const FIRST_ARCHIVE_YEAR: i32 = 2006;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum YearError {
    #[error("{0} is not a valid year.")]
    NotANumber(String),

    #[error("Year must be between {FIRST_ARCHIVE_YEAR} and {current}.")]
    OutOfRange { year: i32, current: i32 },
}

/// An archive year, guaranteed to lie in `FIRST_ARCHIVE_YEAR..=current year`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Year(i32);

impl Year {
    /// Parse and range-check a year against an explicit "current" year.
    pub fn parse_with_current(value: &str, current: i32) -> Result<Self, YearError> {
        let year: i32 = value
            .trim()
            .parse()
            .map_err(|_| YearError::NotANumber(value.to_string()))?;
        Self::checked(year, current)
    }

    fn checked(year: i32, current: i32) -> Result<Self, YearError> {
        if !(FIRST_ARCHIVE_YEAR..=current).contains(&year) {
            return Err(YearError::OutOfRange { year, current });
        }
        Ok(Self(year))
    }

    pub fn value(self) -> i32 {
        self.0
    }
}

impl TryFrom<i32> for Year {
    type Error = YearError;

    fn try_from(year: i32) -> Result<Self, Self::Error> {
        Self::checked(year, chrono::Local::now().year())
    }
}

impl From<Year> for i32 {
    fn from(year: Year) -> Self {
        year.0
    }
}

impl FromStr for Year {
    type Err = YearError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with_current(s, chrono::Local::now().year())
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
