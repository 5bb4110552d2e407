//! # Reelbase Server
//!
//! Admin HTTP API for the Reelbase VOD catalog.
//!
//! ## Overview
//!
//! Thin axum layer over `reelbase-core`:
//!
//! - **CRUD + restore** endpoints for categories, genres, cast members, and
//!   videos
//! - **Multipart intake** for video create/update, feeding the transactional
//!   writer (thumb/banner/trailer/video file slots)
//! - **Listing** with search, whitelisted sorting, and pagination
//!
//! The server is built on Axum and uses PostgreSQL for persistent storage
//! and a local directory as the blob store.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

pub mod config;
pub mod errors;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::Config;
pub use errors::{AppError, AppResult};
pub use state::AppState;
