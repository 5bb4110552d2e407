use crate::error::ModelError;
use uuid::Uuid;

/// Strongly typed ID for categories
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Copy,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct CategoryId(pub Uuid);

impl Default for CategoryId {
    fn default() -> Self {
        Self::new()
    }
}

impl CategoryId {
    pub fn new() -> Self {
        CategoryId(Uuid::now_v7())
    }

    pub fn parse(value: &str) -> Result<Self, ModelError> {
        value
            .parse()
            .map(CategoryId)
            .map_err(|_| ModelError::InvalidId(value.to_string()))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn to_uuid(&self) -> Uuid {
        self.0
    }
}

impl AsRef<Uuid> for CategoryId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for CategoryId {
    fn from(value: Uuid) -> Self {
        CategoryId(value)
    }
}

impl std::fmt::Display for CategoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strongly typed ID for genres
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Copy,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct GenreId(pub Uuid);

impl Default for GenreId {
    fn default() -> Self {
        Self::new()
    }
}

impl GenreId {
    pub fn new() -> Self {
        GenreId(Uuid::now_v7())
    }

    pub fn parse(value: &str) -> Result<Self, ModelError> {
        value
            .parse()
            .map(GenreId)
            .map_err(|_| ModelError::InvalidId(value.to_string()))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn to_uuid(&self) -> Uuid {
        self.0
    }
}

impl AsRef<Uuid> for GenreId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for GenreId {
    fn from(value: Uuid) -> Self {
        GenreId(value)
    }
}

impl std::fmt::Display for GenreId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strongly typed ID for cast members
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Copy,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct CastMemberId(pub Uuid);

impl Default for CastMemberId {
    fn default() -> Self {
        Self::new()
    }
}

impl CastMemberId {
    pub fn new() -> Self {
        CastMemberId(Uuid::now_v7())
    }

    pub fn parse(value: &str) -> Result<Self, ModelError> {
        value
            .parse()
            .map(CastMemberId)
            .map_err(|_| ModelError::InvalidId(value.to_string()))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn to_uuid(&self) -> Uuid {
        self.0
    }
}

impl AsRef<Uuid> for CastMemberId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for CastMemberId {
    fn from(value: Uuid) -> Self {
        CastMemberId(value)
    }
}

impl std::fmt::Display for CastMemberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Strongly typed ID for videos
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Copy,
    serde::Serialize,
    serde::Deserialize,
)]
#[serde(transparent)]
pub struct VideoId(pub Uuid);

impl Default for VideoId {
    fn default() -> Self {
        Self::new()
    }
}

impl VideoId {
    pub fn new() -> Self {
        VideoId(Uuid::now_v7())
    }

    pub fn parse(value: &str) -> Result<Self, ModelError> {
        value
            .parse()
            .map(VideoId)
            .map_err(|_| ModelError::InvalidId(value.to_string()))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    pub fn to_uuid(&self) -> Uuid {
        self.0
    }
}

impl AsRef<Uuid> for VideoId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for VideoId {
    fn from(value: Uuid) -> Self {
        VideoId(value)
    }
}

impl std::fmt::Display for VideoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rejects_garbage() {
        assert!(VideoId::parse("not-a-uuid").is_err());
    }

    #[test]
    fn parse_roundtrips_display() {
        let id = CategoryId::new();
        let parsed = CategoryId::parse(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }
}
