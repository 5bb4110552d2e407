#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use reelbase_core::database::ports::{
    CastMembersRepository, CategoriesRepository, GenresRepository,
};
use reelbase_core::database::repositories::{
    PostgresCastMembersRepository, PostgresCategoriesRepository, PostgresGenresRepository,
};
use reelbase_core::error::{CatalogError, Result};
use reelbase_core::storage::{BlobStore, FsBlobStore, Upload};
use reelbase_core::writer::SlotUpload;
use reelbase_model::{
    CastMember, CastMemberKind, Category, CategoryId, CreateVideo, Genre, NewCastMember,
    NewCategory, NewGenre, Rating, VideoFileSlot,
};

/// Blob store that lets the first `allow` puts through, then fails every
/// put. Deletes and lookups pass through to the real filesystem store.
pub struct FailAfter {
    inner: FsBlobStore,
    allow: usize,
    puts: AtomicUsize,
}

impl FailAfter {
    pub fn new(root: &Path, allow: usize) -> Self {
        Self {
            inner: FsBlobStore::new(root),
            allow,
            puts: AtomicUsize::new(0),
        }
    }
}

impl std::fmt::Debug for FailAfter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FailAfter")
            .field("allow", &self.allow)
            .finish()
    }
}

#[async_trait]
impl BlobStore for FailAfter {
    async fn put(&self, path: &str, bytes: &[u8]) -> Result<()> {
        let seen = self.puts.fetch_add(1, Ordering::SeqCst);
        if seen >= self.allow {
            return Err(CatalogError::storage(
                path,
                std::io::Error::other("injected put failure"),
            ));
        }
        self.inner.put(path, bytes).await
    }

    async fn delete(&self, path: &str) -> Result<()> {
        self.inner.delete(path).await
    }

    async fn contains(&self, path: &str) -> Result<bool> {
        self.inner.contains(path).await
    }
}

/// Count regular files anywhere under `dir`.
pub fn file_count_under(dir: &Path) -> usize {
    fn walk(dir: &Path, acc: &mut usize) {
        let Ok(entries) = std::fs::read_dir(dir) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                walk(&path, acc);
            } else {
                *acc += 1;
            }
        }
    }

    let mut count = 0;
    walk(dir, &mut count);
    count
}

pub async fn seed_category(pool: &PgPool, name: &str) -> Category {
    PostgresCategoriesRepository::new(pool.clone())
        .create(NewCategory {
            name: name.to_string(),
            description: None,
            is_active: true,
        })
        .await
        .expect("seed category")
}

pub async fn seed_genre(pool: &PgPool, name: &str, categories: Vec<CategoryId>) -> Genre {
    PostgresGenresRepository::new(pool.clone())
        .create(NewGenre {
            name: name.to_string(),
            is_active: true,
            categories,
        })
        .await
        .expect("seed genre")
}

pub async fn seed_cast_member(pool: &PgPool, name: &str, kind: CastMemberKind) -> CastMember {
    PostgresCastMembersRepository::new(pool.clone())
        .create(NewCastMember {
            name: name.to_string(),
            kind,
        })
        .await
        .expect("seed cast member")
}

pub fn draft(title: &str) -> CreateVideo {
    CreateVideo {
        title: title.to_string(),
        description: format!("{title} description"),
        year_launched: 2024,
        opened: false,
        rating: Rating::Free,
        duration: 120,
        categories: vec![],
        genres: vec![],
        cast_members: vec![],
    }
}

pub fn upload(slot: VideoFileSlot, name: &str, bytes: &[u8]) -> SlotUpload {
    SlotUpload {
        slot,
        upload: Upload::new(name, bytes.to_vec()),
    }
}

pub async fn count_rows(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .expect("count rows")
}

pub async fn relation_targets(pool: &PgPool, table: &str, owner_column: &str, owner: Uuid) -> Vec<Uuid> {
    let target_column = match table {
        "video_categories" | "genre_categories" => "category_id",
        "video_genres" => "genre_id",
        "video_cast_members" => "cast_member_id",
        other => panic!("unknown relation table {other}"),
    };
    sqlx::query_scalar(&format!(
        "SELECT {target_column} FROM {table} WHERE {owner_column} = $1 ORDER BY {target_column}"
    ))
    .bind(owner)
    .fetch_all(pool)
    .await
    .expect("relation targets")
}

pub fn namespace_dir(root: &Path, video: impl std::fmt::Display) -> PathBuf {
    root.join(video.to_string())
}
