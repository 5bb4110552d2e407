use crate::error::ModelError;
use serde::{Deserialize, Serialize};

/// Audience rating attached to a video.
///
/// Stored as its short label (`L`, `10`, `12`, `14`, `16`, `18`) both in the
/// database and on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rating {
    #[serde(rename = "L")]
    Free,
    #[serde(rename = "10")]
    Age10,
    #[serde(rename = "12")]
    Age12,
    #[serde(rename = "14")]
    Age14,
    #[serde(rename = "16")]
    Age16,
    #[serde(rename = "18")]
    Age18,
}

impl Rating {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::Free => "L",
            Rating::Age10 => "10",
            Rating::Age12 => "12",
            Rating::Age14 => "14",
            Rating::Age16 => "16",
            Rating::Age18 => "18",
        }
    }

    pub const ALL: [Rating; 6] = [
        Rating::Free,
        Rating::Age10,
        Rating::Age12,
        Rating::Age14,
        Rating::Age16,
        Rating::Age18,
    ];
}

impl std::str::FromStr for Rating {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L" => Ok(Rating::Free),
            "10" => Ok(Rating::Age10),
            "12" => Ok(Rating::Age12),
            "14" => Ok(Rating::Age14),
            "16" => Ok(Rating::Age16),
            "18" => Ok(Rating::Age18),
            other => Err(ModelError::InvalidRating(other.to_string())),
        }
    }
}

impl std::fmt::Display for Rating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
