//! # Reelbase Core
//!
//! Core library for the Reelbase VOD catalog backend, providing the
//! transactional catalog-write machinery, persistence, and blob storage for
//! the admin surface.
//!
//! ## Overview
//!
//! - **Transactional writer**: create/update of videos keeping the scalar
//!   row, its relation sets, and the blob store mutually consistent under
//!   failure ([`writer`])
//! - **Relation sync**: diff-based, idempotent set replacement for
//!   many-to-many association tables ([`relations`])
//! - **Blob storage**: content-hash stored names, a store port with an
//!   idempotent delete, and a filesystem implementation ([`storage`])
//! - **Persistence**: repository ports and PostgreSQL implementations for
//!   categories, genres, cast members, and videos ([`database`])
//! - **Listing**: whitelist-driven filter/sort/paginate SQL building
//!   ([`query`])

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

/// Database abstraction layer and PostgreSQL implementations
pub mod database;

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Error types and error handling utilities
pub mod error;

/// Whitelist-driven list query building
pub mod query;

/// Diff-based many-to-many relation synchronization
pub mod relations;

/// Blob store port, filesystem store, and stored-name derivation
pub mod storage;

/// Transactional entity writer for videos
pub mod writer;

pub use error::{CatalogError, Result};
pub use writer::{SlotUpload, VideoWriter};
