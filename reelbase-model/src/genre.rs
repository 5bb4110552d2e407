use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{CategoryId, GenreId};

/// A genre, linked many-to-many to categories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Genre {
    pub id: GenreId,
    pub name: String,
    pub is_active: bool,
    /// Categories this genre belongs to. Replaced wholesale on each sync.
    pub categories: Vec<CategoryId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Genre {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Attributes for creating a genre.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGenre {
    pub name: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
    #[serde(default)]
    pub categories: Vec<CategoryId>,
}

/// Partial update; `None` relation input leaves the association set untouched,
/// `Some` replaces it exactly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateGenre {
    pub name: Option<String>,
    pub is_active: Option<bool>,
    pub categories: Option<Vec<CategoryId>>,
}

fn default_active() -> bool {
    true
}
