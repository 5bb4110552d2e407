//! # Reelbase Model
//!
//! Shared data models for the Reelbase VOD catalog platform.
//!
//! This crate holds the domain vocabulary used across the Reelbase services:
//!
//! - **Typed IDs**: UUID-backed newtypes for categories, genres, cast members,
//!   and videos
//! - **Entities**: catalog records with soft-deletion tombstones and
//!   many-to-many relation sets
//! - **Requests**: create/update payloads consumed by the repositories and the
//!   transactional writer
//! - **Listing**: shared filter/sort/pagination types

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

pub mod cast_member;
pub mod category;
pub mod error;
pub mod genre;
pub mod ids;
pub mod query;
pub mod rating;
pub mod video;

pub use cast_member::{CastMember, CastMemberKind, NewCastMember, UpdateCastMember};
pub use category::{Category, NewCategory, UpdateCategory};
pub use error::ModelError;
pub use genre::{Genre, NewGenre, UpdateGenre};
pub use ids::{CastMemberId, CategoryId, GenreId, VideoId};
pub use query::{ListQuery, Page, SortDir};
pub use rating::Rating;
pub use video::{CreateVideo, UpdateVideo, Video, VideoFileSlot};
