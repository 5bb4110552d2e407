use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use reelbase_model::{CategoryId, Genre, GenreId, ListQuery, NewGenre, Page, UpdateGenre};

use crate::database::ports::GenresRepository;
use crate::error::{CatalogError, Result};
use crate::query::{self, ListSpec};
use crate::relations::{self, GENRE_CATEGORIES};

const COLUMNS: &str = "id, name, is_active, created_at, updated_at, deleted_at";

const LIST_SPEC: ListSpec = ListSpec {
    table: "genres",
    columns: COLUMNS,
    search_column: "name",
    sortable: &["name", "created_at", "updated_at"],
    default_sort: "name",
};

/// Genres follow the transactional write shape of the video writer, minus
/// files: the scalar row and the `genre_categories` set commit together or
/// not at all.
#[derive(Clone, Debug)]
pub struct PostgresGenresRepository {
    pool: PgPool,
}

impl PostgresGenresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn load_categories(&self, id: GenreId) -> Result<Vec<CategoryId>> {
        let targets = relations::load_targets(self.pool(), GENRE_CATEGORIES, id.to_uuid()).await?;
        Ok(targets.into_iter().map(CategoryId).collect())
    }
}

pub(crate) fn row_to_genre(row: &PgRow, categories: Vec<CategoryId>) -> Result<Genre> {
    Ok(Genre {
        id: GenreId(row.try_get("id")?),
        name: row.try_get("name")?,
        is_active: row.try_get("is_active")?,
        categories,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        deleted_at: row.try_get("deleted_at")?,
    })
}

#[async_trait]
impl GenresRepository for PostgresGenresRepository {
    async fn create(&self, new: NewGenre) -> Result<Genre> {
        if new.name.trim().is_empty() {
            return Err(CatalogError::validation("name", "name must not be empty"));
        }

        let id = GenreId::new();
        let mut tx = self.pool().begin().await?;

        let row = sqlx::query(&format!(
            "INSERT INTO genres (id, name, is_active) \
             VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        ))
        .bind(id.to_uuid())
        .bind(&new.name)
        .bind(new.is_active)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| CatalogError::from_db("genres", e))?;

        let desired: Vec<Uuid> = new.categories.iter().map(CategoryId::to_uuid).collect();
        relations::sync(&mut tx, GENRE_CATEGORIES, id.to_uuid(), &desired).await?;

        tx.commit()
            .await
            .map_err(|e| CatalogError::from_db("genres", e))?;

        tracing::debug!(%id, categories = desired.len(), "created genre");
        let categories = self.load_categories(id).await?;
        row_to_genre(&row, categories)
    }

    async fn update(&self, id: GenreId, changes: UpdateGenre) -> Result<Genre> {
        if let Some(name) = &changes.name
            && name.trim().is_empty()
        {
            return Err(CatalogError::validation("name", "name must not be empty"));
        }

        let mut tx = self.pool().begin().await?;

        let row = sqlx::query(&format!(
            "UPDATE genres SET \
               name = COALESCE($2, name), \
               is_active = COALESCE($3, is_active), \
               updated_at = now() \
             WHERE id = $1 AND deleted_at IS NULL RETURNING {COLUMNS}"
        ))
        .bind(id.to_uuid())
        .bind(&changes.name)
        .bind(changes.is_active)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| CatalogError::from_db("genres", e))?
        .ok_or_else(|| CatalogError::not_found("genre", id))?;

        if let Some(categories) = &changes.categories {
            let desired: Vec<Uuid> = categories.iter().map(CategoryId::to_uuid).collect();
            relations::sync(&mut tx, GENRE_CATEGORIES, id.to_uuid(), &desired).await?;
        }

        tx.commit()
            .await
            .map_err(|e| CatalogError::from_db("genres", e))?;

        let categories = self.load_categories(id).await?;
        row_to_genre(&row, categories)
    }

    async fn get(&self, id: GenreId) -> Result<Genre> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM genres WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id.to_uuid())
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(|| CatalogError::not_found("genre", id))?;

        let categories = self.load_categories(id).await?;
        row_to_genre(&row, categories)
    }

    async fn list(&self, query: ListQuery) -> Result<Page<Genre>> {
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
        let mut grouped =
            relations::load_targets_bulk(self.pool(), GENRE_CATEGORIES, &owners).await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in &rows {
            let owner: Uuid = row.try_get("id")?;
            let categories = grouped
                .remove(&owner)
                .unwrap_or_default()
                .into_iter()
                .map(CategoryId)
                .collect();
            items.push(row_to_genre(row, categories)?);
        }

        Ok(Page {
            items,
            total: total as u64,
            page: query.page,
            per_page: query::effective_per_page(&query),
        })
    }

    async fn soft_delete(&self, id: GenreId) -> Result<()> {
        let result = sqlx::query(
            "UPDATE genres SET deleted_at = now(), updated_at = now() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id.to_uuid())
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::not_found("genre", id));
        }
        tracing::debug!(%id, "soft-deleted genre");
        Ok(())
    }

    async fn restore(&self, id: GenreId) -> Result<Genre> {
        let row = sqlx::query(&format!(
            "UPDATE genres SET deleted_at = NULL, updated_at = now() \
             WHERE id = $1 AND deleted_at IS NOT NULL RETURNING {COLUMNS}"
        ))
        .bind(id.to_uuid())
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(|| CatalogError::not_found("genre", id))?;

        tracing::debug!(%id, "restored genre");
        let categories = self.load_categories(id).await?;
        row_to_genre(&row, categories)
    }
}
