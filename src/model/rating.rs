//! Maturity rating for media items.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Maturity rating, ordered by severity: `Pg < Pg13 < R < X < Xxx`.
///
/// The ordering makes threshold filtering a plain comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MatureRating {
    #[serde(rename = "pg")]
    Pg,
    #[serde(rename = "pg-13")]
    Pg13,
    #[serde(rename = "r")]
    R,
    #[serde(rename = "x")]
    X,
    #[serde(rename = "xxx")]
    Xxx,
}

impl MatureRating {
    /// Wire name of this rating.
    pub fn as_str(&self) -> &'static str {
        match self {
            MatureRating::Pg => "pg",
            MatureRating::Pg13 => "pg-13",
            MatureRating::R => "r",
            MatureRating::X => "x",
            MatureRating::Xxx => "xxx",
        }
    }
}

impl fmt::Display for MatureRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatureRating {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Error> {
        match s {
            "pg" => Ok(MatureRating::Pg),
            "pg-13" => Ok(MatureRating::Pg13),
            "r" => Ok(MatureRating::R),
            "x" => Ok(MatureRating::X),
            "xxx" => Ok(MatureRating::Xxx),
            other => Err(Error::validation(format!("unknown mature rating: {other}"))),
        }
    }
}
