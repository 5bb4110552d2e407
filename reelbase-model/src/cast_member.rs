use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::ids::CastMemberId;

/// Role a cast member plays in a production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CastMemberKind {
    Director,
    Actor,
}

impl CastMemberKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CastMemberKind::Director => "director",
            CastMemberKind::Actor => "actor",
        }
    }
}

impl std::str::FromStr for CastMemberKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "director" => Ok(CastMemberKind::Director),
            "actor" => Ok(CastMemberKind::Actor),
            other => Err(ModelError::InvalidKind(other.to_string())),
        }
    }
}

impl std::fmt::Display for CastMemberKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A person credited on videos (director or actor).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastMember {
    pub id: CastMemberId,
    pub name: String,
    pub kind: CastMemberKind,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl CastMember {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Attributes for creating a cast member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCastMember {
    pub name: String,
    pub kind: CastMemberKind,
}

/// Partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCastMember {
    pub name: Option<String>,
    pub kind: Option<CastMemberKind>,
}
