use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use reelbase_model::{Category, CategoryId, ListQuery, NewCategory, Page, UpdateCategory};

use crate::database::ports::CategoriesRepository;
use crate::error::{CatalogError, Result};
use crate::query::{self, ListSpec};

const COLUMNS: &str = "id, name, description, is_active, created_at, updated_at, deleted_at";

const LIST_SPEC: ListSpec = ListSpec {
    table: "categories",
    columns: COLUMNS,
    search_column: "name",
    sortable: &["name", "created_at", "updated_at"],
    default_sort: "name",
};

#[derive(Clone, Debug)]
pub struct PostgresCategoriesRepository {
    pool: PgPool,
}

impl PostgresCategoriesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

pub(crate) fn row_to_category(row: &PgRow) -> Result<Category> {
    Ok(Category {
        id: CategoryId(row.try_get("id")?),
        name: row.try_get("name")?,
        description: row.try_get("description")?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        deleted_at: row.try_get("deleted_at")?,
    })
}

#[async_trait]
impl CategoriesRepository for PostgresCategoriesRepository {
    async fn create(&self, new: NewCategory) -> Result<Category> {
        if new.name.trim().is_empty() {
            return Err(CatalogError::validation("name", "name must not be empty"));
        }

        let id = CategoryId::new();
        let row = sqlx::query(&format!(
            "INSERT INTO categories (id, name, description, is_active) \
             VALUES ($1, $2, $3, $4) RETURNING {COLUMNS}"
        ))
        .bind(id.to_uuid())
        .bind(&new.name)
        .bind(&new.description)
        .bind(new.is_active)
        .fetch_one(self.pool())
        .await
        .map_err(|e| CatalogError::from_db("categories", e))?;

        tracing::debug!(%id, "created category");
        row_to_category(&row)
    }

    async fn update(&self, id: CategoryId, changes: UpdateCategory) -> Result<Category> {
        if let Some(name) = &changes.name
            && name.trim().is_empty()
        {
            return Err(CatalogError::validation("name", "name must not be empty"));
        }

        let row = sqlx::query(&format!(
            "UPDATE categories SET \
               name = COALESCE($2, name), \
               description = COALESCE($3, description), \
               is_active = COALESCE($4, is_active), \
               updated_at = now() \
             WHERE id = $1 AND deleted_at IS NULL RETURNING {COLUMNS}"
        ))
        .bind(id.to_uuid())
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(changes.is_active)
        .fetch_optional(self.pool())
        .await
        .map_err(|e| CatalogError::from_db("categories", e))?
        .ok_or_else(|| CatalogError::not_found("category", id))?;

        row_to_category(&row)
    }

    async fn get(&self, id: CategoryId) -> Result<Category> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM categories WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id.to_uuid())
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(|| CatalogError::not_found("category", id))?;

        row_to_category(&row)
    }

    async fn list(&self, query: ListQuery) -> Result<Page<Category>> {
        let sql = query::build_list_sql(&LIST_SPEC, &query)?;

        let mut select = sqlx::query(&sql.select);
        let mut count = sqlx::query_scalar::<_, i64>(&sql.count);
        if let Some(pattern) = &sql.search {
            select = select.bind(pattern);
            count = count.bind(pattern);
        }

        let rows = select.fetch_all(self.pool()).await?;
        let total = count.fetch_one(self.pool()).await?;

        let items = rows
            .iter()
            .map(row_to_category)
            .collect::<Result<Vec<_>>>()?;

        Ok(Page {
            items,
            total: total as u64,
            page: query.page,
            per_page: query::effective_per_page(&query),
        })
    }

    async fn soft_delete(&self, id: CategoryId) -> Result<()> {
        let result = sqlx::query(
            "UPDATE categories SET deleted_at = now(), updated_at = now() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id.to_uuid())
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::not_found("category", id));
        }
        tracing::debug!(%id, "soft-deleted category");
        Ok(())
    }

    async fn restore(&self, id: CategoryId) -> Result<Category> {
        let row = sqlx::query(&format!(
            "UPDATE categories SET deleted_at = NULL, updated_at = now() \
             WHERE id = $1 AND deleted_at IS NOT NULL RETURNING {COLUMNS}"
        ))
        .bind(id.to_uuid())
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(|| CatalogError::not_found("category", id))?;

        tracing::debug!(%id, "restored category");
        row_to_category(&row)
    }
}
