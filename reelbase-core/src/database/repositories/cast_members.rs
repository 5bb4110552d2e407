use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use reelbase_model::{
    CastMember, CastMemberId, CastMemberKind, ListQuery, NewCastMember, Page, UpdateCastMember,
};

use crate::database::ports::CastMembersRepository;
use crate::error::{CatalogError, Result};
use crate::query::{self, ListSpec};

const COLUMNS: &str = "id, name, kind, created_at, updated_at, deleted_at";

const LIST_SPEC: ListSpec = ListSpec {
    table: "cast_members",
    columns: COLUMNS,
    search_column: "name",
    sortable: &["name", "kind", "created_at", "updated_at"],
    default_sort: "name",
};

#[derive(Clone, Debug)]
pub struct PostgresCastMembersRepository {
    pool: PgPool,
}

impl PostgresCastMembersRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

pub(crate) fn row_to_cast_member(row: &PgRow) -> Result<CastMember> {
    let kind: String = row.try_get("kind")?;
    let kind: CastMemberKind = kind
        .parse()
        .map_err(|e| CatalogError::Internal(format!("cast_members row: {e}")))?;

    Ok(CastMember {
        id: CastMemberId(row.try_get("id")?),
        name: row.try_get("name")?,
        kind,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        deleted_at: row.try_get("deleted_at")?,
    })
}

#[async_trait]
impl CastMembersRepository for PostgresCastMembersRepository {
    async fn create(&self, new: NewCastMember) -> Result<CastMember> {
        if new.name.trim().is_empty() {
            return Err(CatalogError::validation("name", "name must not be empty"));
        }

        let id = CastMemberId::new();
        let row = sqlx::query(&format!(
            "INSERT INTO cast_members (id, name, kind) \
             VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        ))
        .bind(id.to_uuid())
        .bind(&new.name)
        .bind(new.kind.as_str())
        .fetch_one(self.pool())
        .await
        .map_err(|e| CatalogError::from_db("cast_members", e))?;

        tracing::debug!(%id, kind = %new.kind, "created cast member");
        row_to_cast_member(&row)
    }

    async fn update(&self, id: CastMemberId, changes: UpdateCastMember) -> Result<CastMember> {
        if let Some(name) = &changes.name
            && name.trim().is_empty()
        {
            return Err(CatalogError::validation("name", "name must not be empty"));
        }

        let row = sqlx::query(&format!(
            "UPDATE cast_members SET \
               name = COALESCE($2, name), \
               kind = COALESCE($3, kind), \
               updated_at = now() \
             WHERE id = $1 AND deleted_at IS NULL RETURNING {COLUMNS}"
        ))
        .bind(id.to_uuid())
        .bind(&changes.name)
        .bind(changes.kind.map(|k| k.as_str()))
        .fetch_optional(self.pool())
        .await
        .map_err(|e| CatalogError::from_db("cast_members", e))?
        .ok_or_else(|| CatalogError::not_found("cast member", id))?;

        row_to_cast_member(&row)
    }

    async fn get(&self, id: CastMemberId) -> Result<CastMember> {
        let row = sqlx::query(&format!(
            "SELECT {COLUMNS} FROM cast_members WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id.to_uuid())
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(|| CatalogError::not_found("cast member", id))?;

        row_to_cast_member(&row)
    }

    async fn list(&self, query: ListQuery) -> Result<Page<CastMember>> {
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
            .map(row_to_cast_member)
            .collect::<Result<Vec<_>>>()?;

        Ok(Page {
            items,
            total: total as u64,
            page: query.page,
            per_page: query::effective_per_page(&query),
        })
    }

    async fn soft_delete(&self, id: CastMemberId) -> Result<()> {
        let result = sqlx::query(
            "UPDATE cast_members SET deleted_at = now(), updated_at = now() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id.to_uuid())
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(CatalogError::not_found("cast member", id));
        }
        tracing::debug!(%id, "soft-deleted cast member");
        Ok(())
    }

    async fn restore(&self, id: CastMemberId) -> Result<CastMember> {
        let row = sqlx::query(&format!(
            "UPDATE cast_members SET deleted_at = NULL, updated_at = now() \
             WHERE id = $1 AND deleted_at IS NOT NULL RETURNING {COLUMNS}"
        ))
        .bind(id.to_uuid())
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(|| CatalogError::not_found("cast member", id))?;

        tracing::debug!(%id, "restored cast member");
        row_to_cast_member(&row)
    }
}
