//! Transactional entity writer for videos.
//!
//! A video write touches three stores that must stay mutually consistent:
//! the scalar row, the association tables, and the blob store. The row and
//! the relation sync share one database transaction; the blob store has no
//! rollback, so blob writes are compensated manually.
//!
//! The protocol is deliberately name-first:
//!
//! 1. reserve stored names (pure, no I/O): the row must reference the
//!    final blob name before the blob exists, URL generation depends on it
//! 2. write the row and relation deltas inside one transaction
//! 3. write the blobs, then commit (create) / commit, then write the blobs
//!    (update)
//!
//! On a failed create every blob written during the attempt is deleted and
//! the transaction rolls back: zero trace. On update the row commits before
//! the uploads run; a post-commit upload failure leaves the row pointing at
//! a not-yet-existing blob. That window is accepted and surfaced as a
//! `Storage` error rather than papered over.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use reelbase_model::{CreateVideo, UpdateVideo, Video, VideoFileSlot, VideoId};

use crate::database::ports::VideosRepository;
use crate::database::repositories::PostgresVideosRepository;
use crate::error::{CatalogError, Result};
use crate::relations::{self, VIDEO_CAST_MEMBERS, VIDEO_CATEGORIES, VIDEO_GENRES};
use crate::storage::{BlobStore, Upload, WriteLedger};

/// A pending upload assigned to one of the video's file slots.
#[derive(Debug, Clone)]
pub struct SlotUpload {
    pub slot: VideoFileSlot,
    pub upload: Upload,
}

/// One reserved blob write: slot, derived stored name, and the namespaced
/// store path, all computed before any I/O.
#[derive(Debug, Clone)]
struct PlannedUpload {
    slot: VideoFileSlot,
    stored_name: String,
    path: String,
    upload: Upload,
}

/// Store path for a blob within a video's namespace.
pub fn blob_path(id: VideoId, stored_name: &str) -> String {
    format!("{id}/{stored_name}")
}

fn plan_uploads(id: VideoId, uploads: Vec<SlotUpload>) -> Vec<PlannedUpload> {
    uploads
        .into_iter()
        .map(|entry| {
            let stored_name = entry.upload.stored_name().into_string();
            let path = blob_path(id, &stored_name);
            PlannedUpload {
                slot: entry.slot,
                stored_name,
                path,
                upload: entry.upload,
            }
        })
        .collect()
}

fn planned_name(planned: &[PlannedUpload], slot: VideoFileSlot) -> Option<&str> {
    planned
        .iter()
        .find(|p| p.slot == slot)
        .map(|p| p.stored_name.as_str())
}

fn validate_uploads(uploads: &[SlotUpload]) -> Result<()> {
    let mut seen = HashSet::new();
    for entry in uploads {
        if !seen.insert(entry.slot) {
            return Err(CatalogError::validation(
                entry.slot.column(),
                "duplicate upload for file slot",
            ));
        }
        if entry.upload.is_empty() {
            return Err(CatalogError::validation(
                entry.slot.column(),
                "upload is empty",
            ));
        }
        let max = entry.slot.max_bytes();
        if entry.upload.len() > max {
            return Err(CatalogError::validation(
                entry.slot.column(),
                format!(
                    "upload of {} bytes exceeds the {max} byte limit",
                    entry.upload.len()
                ),
            ));
        }
    }
    Ok(())
}

fn validate_create(draft: &CreateVideo) -> Result<()> {
    if draft.title.trim().is_empty() {
        return Err(CatalogError::validation("title", "title must not be empty"));
    }
    if draft.description.trim().is_empty() {
        return Err(CatalogError::validation(
            "description",
            "description must not be empty",
        ));
    }
    if draft.year_launched <= 0 {
        return Err(CatalogError::validation(
            "year_launched",
            "year must be positive",
        ));
    }
    if draft.duration <= 0 {
        return Err(CatalogError::validation(
            "duration",
            "duration must be positive",
        ));
    }
    Ok(())
}

fn validate_update(changes: &UpdateVideo) -> Result<()> {
    if let Some(title) = &changes.title
        && title.trim().is_empty()
    {
        return Err(CatalogError::validation("title", "title must not be empty"));
    }
    if let Some(description) = &changes.description
        && description.trim().is_empty()
    {
        return Err(CatalogError::validation(
            "description",
            "description must not be empty",
        ));
    }
    if let Some(year) = changes.year_launched
        && year <= 0
    {
        return Err(CatalogError::validation(
            "year_launched",
            "year must be positive",
        ));
    }
    if let Some(duration) = changes.duration
        && duration <= 0
    {
        return Err(CatalogError::validation(
            "duration",
            "duration must be positive",
        ));
    }
    Ok(())
}

/// Transactional create/update of videos.
///
/// Callers observe either a fully consistent entity or an error; no
/// half-written state is ever returned.
#[derive(Clone)]
pub struct VideoWriter {
    pool: PgPool,
    store: Arc<dyn BlobStore>,
    videos: PostgresVideosRepository,
}

impl fmt::Debug for VideoWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VideoWriter")
            .field("pool_size", &self.pool.size())
            .finish()
    }
}

impl VideoWriter {
    pub fn new(pool: PgPool, store: Arc<dyn BlobStore>) -> Self {
        let videos = PostgresVideosRepository::new(pool.clone());
        Self { pool, store, videos }
    }

    /// Create a video: scalar row, relation sets, and blobs, all or
    /// nothing.
    pub async fn create(&self, draft: CreateVideo, uploads: Vec<SlotUpload>) -> Result<Video> {
        validate_create(&draft)?;
        validate_uploads(&uploads)?;

        let id = VideoId::new();
        // Phase 1: reserve names. Pure, so the insert below can reference
        // the final blob names.
        let planned = plan_uploads(id, uploads);

        // Phase 2: row + relation deltas in one transaction. Any `?` exit
        // here drops the transaction, which rolls it back; no blobs have
        // been written yet.
        let mut tx = self.pool.begin().await?;
        insert_video(&mut tx, id, &draft, &planned).await?;
        sync_relations(
            &mut tx,
            id,
            Some(&draft.categories.iter().map(|c| c.to_uuid()).collect::<Vec<_>>()),
            Some(&draft.genres.iter().map(|g| g.to_uuid()).collect::<Vec<_>>()),
            Some(&draft.cast_members.iter().map(|m| m.to_uuid()).collect::<Vec<_>>()),
        )
        .await?;

        // Phase 3: blob writes, tracked for compensation, then commit.
        let mut ledger = WriteLedger::new();
        for entry in &planned {
            match self.store.put(&entry.path, entry.upload.bytes()).await {
                Ok(()) => ledger.record(entry.path.clone()),
                Err(err) => {
                    tracing::warn!(
                        %id,
                        slot = entry.slot.column(),
                        error = %err,
                        "upload failed, rolling back create"
                    );
                    rollback_quietly(tx).await;
                    ledger.undo(self.store.as_ref()).await;
                    return Err(err);
                }
            }
        }

        if let Err(err) = tx.commit().await {
            ledger.undo(self.store.as_ref()).await;
            return Err(CatalogError::from_db("videos", err));
        }

        tracing::info!(%id, files = planned.len(), "created video");
        self.videos.get(id).await
    }

    /// Update a video. The row-level write (scalars + relation re-sync)
    /// commits first; new blobs are uploaded after commit, and old blobs
    /// are deleted only once every replacement is safely stored.
    pub async fn update(
        &self,
        id: VideoId,
        changes: UpdateVideo,
        uploads: Vec<SlotUpload>,
    ) -> Result<Video> {
        validate_update(&changes)?;
        validate_uploads(&uploads)?;

        let current = self.videos.get(id).await?;

        // Record the names being replaced before anything is overwritten.
        // Re-uploading identical bytes derives the identical name; a path
        // we are about to write must never land on the cleanup list.
        let planned = plan_uploads(id, uploads);
        let replaced: Vec<String> = planned
            .iter()
            .filter_map(|entry| current.file_for(entry.slot))
            .map(|old| blob_path(id, old))
            .filter(|old| planned.iter().all(|entry| entry.path != *old))
            .collect();

        let mut tx = self.pool.begin().await?;
        update_video_row(&mut tx, id, &changes, &planned).await?;
        sync_relations(
            &mut tx,
            id,
            changes
                .categories
                .as_ref()
                .map(|set| set.iter().map(|c| c.to_uuid()).collect::<Vec<_>>())
                .as_deref(),
            changes
                .genres
                .as_ref()
                .map(|set| set.iter().map(|g| g.to_uuid()).collect::<Vec<_>>())
                .as_deref(),
            changes
                .cast_members
                .as_ref()
                .map(|set| set.iter().map(|m| m.to_uuid()).collect::<Vec<_>>())
                .as_deref(),
        )
        .await?;
        tx.commit()
            .await
            .map_err(|e| CatalogError::from_db("videos", e))?;

        // Post-commit: upload replacements. A failure here leaves the row
        // referencing a blob that does not exist yet; surfaced to the
        // caller, never auto-repaired. Old blobs are still intact.
        for entry in &planned {
            self.store.put(&entry.path, entry.upload.bytes()).await?;
        }

        // Replacements confirmed; drop the superseded blobs. Best-effort:
        // a failed cleanup orphans a blob but the entity stays consistent.
        for old_path in &replaced {
            if let Err(err) = self.store.delete(old_path).await {
                tracing::warn!(%id, path = %old_path, error = %err, "old blob cleanup failed");
            }
        }

        tracing::info!(%id, files = planned.len(), "updated video");
        self.videos.get(id).await
    }
}

async fn insert_video(
    tx: &mut Transaction<'_, Postgres>,
    id: VideoId,
    draft: &CreateVideo,
    planned: &[PlannedUpload],
) -> Result<()> {
    sqlx::query(
        "INSERT INTO videos \
           (id, title, description, year_launched, opened, rating, duration, \
            thumb_file, banner_file, trailer_file, video_file) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
    )
    .bind(id.to_uuid())
    .bind(&draft.title)
    .bind(&draft.description)
    .bind(draft.year_launched)
    .bind(draft.opened)
    .bind(draft.rating.as_str())
    .bind(draft.duration)
    .bind(planned_name(planned, VideoFileSlot::ThumbFile))
    .bind(planned_name(planned, VideoFileSlot::BannerFile))
    .bind(planned_name(planned, VideoFileSlot::TrailerFile))
    .bind(planned_name(planned, VideoFileSlot::VideoFile))
    .execute(&mut **tx)
    .await
    .map_err(|e| CatalogError::from_db("videos", e))?;
    Ok(())
}

async fn update_video_row(
    tx: &mut Transaction<'_, Postgres>,
    id: VideoId,
    changes: &UpdateVideo,
    planned: &[PlannedUpload],
) -> Result<()> {
    let result = sqlx::query(
        "UPDATE videos SET \
           title = COALESCE($2, title), \
           description = COALESCE($3, description), \
           year_launched = COALESCE($4, year_launched), \
           opened = COALESCE($5, opened), \
           rating = COALESCE($6, rating), \
           duration = COALESCE($7, duration), \
           thumb_file = COALESCE($8, thumb_file), \
           banner_file = COALESCE($9, banner_file), \
           trailer_file = COALESCE($10, trailer_file), \
           video_file = COALESCE($11, video_file), \
           updated_at = now() \
         WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(id.to_uuid())
    .bind(&changes.title)
    .bind(&changes.description)
    .bind(changes.year_launched)
    .bind(changes.opened)
    .bind(changes.rating.map(|r| r.as_str()))
    .bind(changes.duration)
    .bind(planned_name(planned, VideoFileSlot::ThumbFile))
    .bind(planned_name(planned, VideoFileSlot::BannerFile))
    .bind(planned_name(planned, VideoFileSlot::TrailerFile))
    .bind(planned_name(planned, VideoFileSlot::VideoFile))
    .execute(&mut **tx)
    .await
    .map_err(|e| CatalogError::from_db("videos", e))?;

    if result.rows_affected() == 0 {
        return Err(CatalogError::not_found("video", id));
    }
    Ok(())
}

async fn sync_relations(
    tx: &mut Transaction<'_, Postgres>,
    id: VideoId,
    categories: Option<&[Uuid]>,
    genres: Option<&[Uuid]>,
    cast_members: Option<&[Uuid]>,
) -> Result<()> {
    let owner = id.to_uuid();
    if let Some(desired) = categories {
        relations::sync(tx, VIDEO_CATEGORIES, owner, desired).await?;
    }
    if let Some(desired) = genres {
        relations::sync(tx, VIDEO_GENRES, owner, desired).await?;
    }
    if let Some(desired) = cast_members {
        relations::sync(tx, VIDEO_CAST_MEMBERS, owner, desired).await?;
    }
    Ok(())
}

async fn rollback_quietly(tx: Transaction<'_, Postgres>) {
    if let Err(err) = tx.rollback().await {
        tracing::warn!(error = %err, "transaction rollback failed");
    }
}
