use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use reelbase_model::{CastMember, Category, Genre, ListQuery, Page, Rating, Video, VideoId};

use crate::database::ports::VideosRepository;
use crate::database::repositories::cast_members::row_to_cast_member;
use crate::database::repositories::categories::row_to_category;
use crate::database::repositories::genres::row_to_genre;
use crate::error::{CatalogError, Result};
use crate::query::{self, ListSpec};
use crate::relations::{self, GENRE_CATEGORIES, VIDEO_CAST_MEMBERS, VIDEO_CATEGORIES, VIDEO_GENRES};

const COLUMNS: &str = "id, title, description, year_launched, opened, rating, \
     duration, thumb_file, banner_file, trailer_file, video_file, \
     created_at, updated_at, deleted_at";

const LIST_SPEC: ListSpec = ListSpec {
    table: "videos",
    columns: COLUMNS,
    search_column: "title",
    sortable: &["title", "year_launched", "duration", "created_at", "updated_at"],
    default_sort: "title",
};

#[derive(Clone, Debug)]
pub struct PostgresVideosRepository {
    pool: PgPool,
}

/// Relation sets resolved to full target records for one video.
///
/// Resolution never filters on the tombstone: association rows reference
/// their targets regardless of soft-deletion state.
#[derive(Debug, Default, Clone)]
struct RelationSets {
    categories: Vec<Category>,
    genres: Vec<Genre>,
    cast_members: Vec<CastMember>,
}

impl PostgresVideosRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn fetch_categories(&self, ids: &[Uuid]) -> Result<Vec<Category>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query(
            "SELECT id, name, description, is_active, created_at, updated_at, deleted_at \
             FROM categories WHERE id = ANY($1) ORDER BY id",
        )
        .bind(ids)
        .fetch_all(self.pool())
        .await?;
        rows.iter().map(row_to_category).collect()
    }

    async fn fetch_genres(&self, ids: &[Uuid]) -> Result<Vec<Genre>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query(
            "SELECT id, name, is_active, created_at, updated_at, deleted_at \
             FROM genres WHERE id = ANY($1) ORDER BY id",
        )
        .bind(ids)
        .fetch_all(self.pool())
        .await?;

        let mut grouped =
            relations::load_targets_bulk(self.pool(), GENRE_CATEGORIES, ids).await?;
        rows.iter()
            .map(|row| {
                let owner: Uuid = row.try_get("id")?;
                let categories = grouped
                    .remove(&owner)
                    .unwrap_or_default()
                    .into_iter()
                    .map(reelbase_model::CategoryId)
                    .collect();
                row_to_genre(row, categories)
            })
            .collect()
    }

    async fn fetch_cast_members(&self, ids: &[Uuid]) -> Result<Vec<CastMember>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query(
            "SELECT id, name, kind, created_at, updated_at, deleted_at \
             FROM cast_members WHERE id = ANY($1) ORDER BY id",
        )
        .bind(ids)
        .fetch_all(self.pool())
        .await?;
        rows.iter().map(row_to_cast_member).collect()
    }

    async fn load_relations(&self, id: VideoId) -> Result<RelationSets> {
        let owner = id.to_uuid();
        let category_ids = relations::load_targets(self.pool(), VIDEO_CATEGORIES, owner).await?;
        let genre_ids = relations::load_targets(self.pool(), VIDEO_GENRES, owner).await?;
        let cast_ids = relations::load_targets(self.pool(), VIDEO_CAST_MEMBERS, owner).await?;

        Ok(RelationSets {
            categories: self.fetch_categories(&category_ids).await?,
            genres: self.fetch_genres(&genre_ids).await?,
            cast_members: self.fetch_cast_members(&cast_ids).await?,
        })
    }

    fn to_video(row: &PgRow, sets: RelationSets) -> Result<Video> {
        let rating: String = row.try_get("rating")?;
        let rating: Rating = rating
            .parse()
            .map_err(|e| CatalogError::Internal(format!("videos row: {e}")))?;

        Ok(Video {
            id: VideoId(row.try_get("id")?),
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            year_launched: row.try_get("year_launched")?,
            opened: row.try_get("opened")?,
            rating,
            duration: row.try_get("duration")?,
            thumb_file: row.try_get("thumb_file")?,
            banner_file: row.try_get("banner_file")?,
            trailer_file: row.try_get("trailer_file")?,
            video_file: row.try_get("video_file")?,
            categories: sets.categories,
            genres: sets.genres,
            cast_members: sets.cast_members,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            deleted_at: row.try_get("deleted_at")?,
        })
    }
}

#[async_trait]
impl VideosRepository for PostgresVideosRepository {
    async fn get(&self, id: VideoId) -> Result<Video> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM videos WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id.to_uuid())
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(|| CatalogError::not_found("video", id))?;

        let sets = self.load_relations(id).await?;
        Self::to_video(&row, sets)
    }

    async fn list(&self, query: ListQuery) -> Result<Page<Video>> {
        let sql = query::build_list_sql(&LIST_SPEC, &query)?;

        let mut select = sqlx::query(&sql.select);
        let mut count = sqlx::query_scalar::<_, i64>(&sql.count);
        if let Some(pattern) = &sql.search {
            select = select.bind(pattern);
            count = count.bind(pattern);
        }

        let rows = select.fetch_all(self.pool()).await?;
        let total = count.fetch_one(self.pool()).await?;

        let owners: Vec<Uuid> = rows
            .iter()
            .map(|row| row.try_get("id"))
            .collect::<std::result::Result<_, _>>()?;

        let mut category_sets =
            relations::load_targets_bulk(self.pool(), VIDEO_CATEGORIES, &owners).await?;
        let mut genre_sets =
            relations::load_targets_bulk(self.pool(), VIDEO_GENRES, &owners).await?;
        let mut cast_sets =
            relations::load_targets_bulk(self.pool(), VIDEO_CAST_MEMBERS, &owners).await?;

        // Resolve each referenced target once across the page, then hand
        // clones out per video.
        let categories = self
            .fetch_categories(&collect_ids(&category_sets))
            .await?
            .into_iter()
            .map(|c| (c.id.to_uuid(), c))
            .collect::<HashMap<_, _>>();
        let genres = self
            .fetch_genres(&collect_ids(&genre_sets))
            .await?
            .into_iter()
            .map(|g| (g.id.to_uuid(), g))
            .collect::<HashMap<_, _>>();
        let cast_members = self
            .fetch_cast_members(&collect_ids(&cast_sets))
            .await?
            .into_iter()
            .map(|m| (m.id.to_uuid(), m))
            .collect::<HashMap<_, _>>();

        let mut items = Vec::with_capacity(rows.len());
        for row in &rows {
            let owner: Uuid = row.try_get("id")?;
            let sets = RelationSets {
                categories: resolve(&category_sets.remove(&owner).unwrap_or_default(), &categories)?,
                genres: resolve(&genre_sets.remove(&owner).unwrap_or_default(), &genres)?,
                cast_members: resolve(&cast_sets.remove(&owner).unwrap_or_default(), &cast_members)?,
            };
            items.push(Self::to_video(row, sets)?);
        }

        Ok(Page {
            items,
            total: total as u64,
            page: query.page,
            per_page: query::effective_per_page(&query),
        })
    }

    async fn soft_delete(&self, id: VideoId) -> Result<()> {
        let result = sqlx::query(
            "UPDATE videos SET deleted_at = now(), updated_at = now() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id.to_uuid())
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::not_found("video", id));
        }
        tracing::debug!(%id, "soft-deleted video");
        Ok(())
    }

    async fn restore(&self, id: VideoId) -> Result<Video> {
        let row = sqlx::query(&format!(
            "UPDATE videos SET deleted_at = NULL, updated_at = now() \
             WHERE id = $1 AND deleted_at IS NOT NULL RETURNING {COLUMNS}"
        ))
        .bind(id.to_uuid())
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(|| CatalogError::not_found("video", id))?;

        tracing::debug!(%id, "restored video");
        let sets = self.load_relations(id).await?;
        Self::to_video(&row, sets)
    }
}

fn collect_ids(sets: &HashMap<Uuid, Vec<Uuid>>) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = sets.values().flatten().copied().collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

fn resolve<T: Clone>(ids: &[Uuid], loaded: &HashMap<Uuid, T>) -> Result<Vec<T>> {
    ids.iter()
        .map(|id| {
            loaded
                .get(id)
                .cloned()
                .ok_or_else(|| CatalogError::Internal(format!("dangling relation target {id}")))
        })
        .collect()
}
