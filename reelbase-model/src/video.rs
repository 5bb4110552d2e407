use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cast_member::CastMember;
use crate::category::Category;
use crate::error::ModelError;
use crate::genre::Genre;
use crate::ids::{CastMemberId, CategoryId, GenreId, VideoId};
use crate::rating::Rating;

/// Named file slots carried by a video.
///
/// Each slot maps to one nullable column on the `videos` table holding the
/// stored blob name, and to one multipart part name on the upload surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoFileSlot {
    ThumbFile,
    BannerFile,
    TrailerFile,
    VideoFile,
}

impl VideoFileSlot {
    pub const ALL: [VideoFileSlot; 4] = [
        VideoFileSlot::ThumbFile,
        VideoFileSlot::BannerFile,
        VideoFileSlot::TrailerFile,
        VideoFileSlot::VideoFile,
    ];

    /// Column on the `videos` table backing this slot.
    pub fn column(&self) -> &'static str {
        match self {
            VideoFileSlot::ThumbFile => "thumb_file",
            VideoFileSlot::BannerFile => "banner_file",
            VideoFileSlot::TrailerFile => "trailer_file",
            VideoFileSlot::VideoFile => "video_file",
        }
    }

    /// Upload size cap for this slot, in bytes.
    pub fn max_bytes(&self) -> u64 {
        const MIB: u64 = 1024 * 1024;
        match self {
            VideoFileSlot::ThumbFile => 5 * MIB,
            VideoFileSlot::BannerFile => 10 * MIB,
            VideoFileSlot::TrailerFile => 1024 * MIB,
            VideoFileSlot::VideoFile => 50 * 1024 * MIB,
        }
    }
}

impl std::str::FromStr for VideoFileSlot {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "thumb_file" => Ok(VideoFileSlot::ThumbFile),
            "banner_file" => Ok(VideoFileSlot::BannerFile),
            "trailer_file" => Ok(VideoFileSlot::TrailerFile),
            "video_file" => Ok(VideoFileSlot::VideoFile),
            other => Err(ModelError::InvalidFileSlot(other.to_string())),
        }
    }
}

impl std::fmt::Display for VideoFileSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.column())
    }
}

/// A catalog video with its relation sets and stored file references.
///
/// File fields hold the derived blob name within the video's namespace, or
/// `None` when no file was uploaded for the slot. A non-null value always
/// references a blob that exists in the store; the transactional writer's
/// rollback path protects this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    pub id: VideoId,
    pub title: String,
    pub description: String,
    pub year_launched: i16,
    pub opened: bool,
    pub rating: Rating,
    /// Runtime in minutes.
    pub duration: i16,
    pub thumb_file: Option<String>,
    pub banner_file: Option<String>,
    pub trailer_file: Option<String>,
    pub video_file: Option<String>,
    /// Relation sets resolved to their full target records. Targets stay
    /// resolved even when soft-deleted; association rows outlive the
    /// tombstone.
    pub categories: Vec<Category>,
    pub genres: Vec<Genre>,
    pub cast_members: Vec<CastMember>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Video {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    pub fn file_for(&self, slot: VideoFileSlot) -> Option<&str> {
        match slot {
            VideoFileSlot::ThumbFile => self.thumb_file.as_deref(),
            VideoFileSlot::BannerFile => self.banner_file.as_deref(),
            VideoFileSlot::TrailerFile => self.trailer_file.as_deref(),
            VideoFileSlot::VideoFile => self.video_file.as_deref(),
        }
    }

    pub fn category_ids(&self) -> Vec<CategoryId> {
        self.categories.iter().map(|c| c.id).collect()
    }

    pub fn genre_ids(&self) -> Vec<GenreId> {
        self.genres.iter().map(|g| g.id).collect()
    }

    pub fn cast_member_ids(&self) -> Vec<CastMemberId> {
        self.cast_members.iter().map(|m| m.id).collect()
    }
}

/// Scalar and relation attributes for creating a video.
///
/// File payloads travel separately as pending uploads; the writer derives the
/// stored names before anything is persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVideo {
    pub title: String,
    pub description: String,
    pub year_launched: i16,
    #[serde(default)]
    pub opened: bool,
    pub rating: Rating,
    pub duration: i16,
    #[serde(default)]
    pub categories: Vec<CategoryId>,
    #[serde(default)]
    pub genres: Vec<GenreId>,
    #[serde(default)]
    pub cast_members: Vec<CastMemberId>,
}

/// Partial update. `None` scalars are left untouched; `None` relation inputs
/// leave the association set alone, `Some` replaces it exactly.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateVideo {
    pub title: Option<String>,
    pub description: Option<String>,
    pub year_launched: Option<i16>,
    pub opened: Option<bool>,
    pub rating: Option<Rating>,
    pub duration: Option<i16>,
    pub categories: Option<Vec<CategoryId>>,
    pub genres: Option<Vec<GenreId>>,
    pub cast_members: Option<Vec<CastMemberId>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_parses_column_names() {
        for slot in VideoFileSlot::ALL {
            assert_eq!(slot.column().parse::<VideoFileSlot>().unwrap(), slot);
        }
        assert!("poster_file".parse::<VideoFileSlot>().is_err());
    }

    #[test]
    fn slot_caps_are_ordered_by_media_weight() {
        assert!(
            VideoFileSlot::ThumbFile.max_bytes() < VideoFileSlot::BannerFile.max_bytes()
        );
        assert!(
            VideoFileSlot::TrailerFile.max_bytes() < VideoFileSlot::VideoFile.max_bytes()
        );
    }
}
