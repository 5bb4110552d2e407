//! Diff-based synchronization of many-to-many relation sets.
//!
//! A relation set is replaced wholesale on each sync: rows whose target is
//! not in the new set are deleted, missing rows are inserted, unchanged rows
//! are left alone. There is no additive/merge mode and no ordering among
//! targets. The delta runs inside the caller's transaction so the relation
//! write commits or rolls back with the scalar write.

use std::collections::{HashMap, HashSet};

use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{CatalogError, Result};

/// Descriptor for one association table keyed `(owner_id, target_id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationTable {
    pub table: &'static str,
    pub owner_column: &'static str,
    pub target_column: &'static str,
}

pub const VIDEO_CATEGORIES: RelationTable = RelationTable {
    table: "video_categories",
    owner_column: "video_id",
    target_column: "category_id",
};

pub const VIDEO_GENRES: RelationTable = RelationTable {
    table: "video_genres",
    owner_column: "video_id",
    target_column: "genre_id",
};

pub const VIDEO_CAST_MEMBERS: RelationTable = RelationTable {
    table: "video_cast_members",
    owner_column: "video_id",
    target_column: "cast_member_id",
};

pub const GENRE_CATEGORIES: RelationTable = RelationTable {
    table: "genre_categories",
    owner_column: "genre_id",
    target_column: "category_id",
};

/// The insert/remove operations turning one target set into another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationDelta {
    pub insert: Vec<Uuid>,
    pub remove: Vec<Uuid>,
}

impl RelationDelta {
    pub fn is_empty(&self) -> bool {
        self.insert.is_empty() && self.remove.is_empty()
    }
}

/// Symmetric difference between the stored and the desired target sets.
///
/// Duplicate IDs in `desired` collapse; the relation is a set. Output
/// vectors are sorted so the executed statements are deterministic.
pub fn diff(current: &[Uuid], desired: &[Uuid]) -> RelationDelta {
    let current: HashSet<Uuid> = current.iter().copied().collect();
    let desired: HashSet<Uuid> = desired.iter().copied().collect();

    let mut insert: Vec<Uuid> = desired.difference(&current).copied().collect();
    let mut remove: Vec<Uuid> = current.difference(&desired).copied().collect();
    insert.sort_unstable();
    remove.sort_unstable();

    RelationDelta { insert, remove }
}

/// Replace `relation`'s association rows for `owner` with exactly `desired`.
///
/// Idempotent: re-running with the same set executes no writes. Foreign-key
/// rejections for unknown targets surface as [`CatalogError::Constraint`]
/// with the association table as context.
pub async fn sync(
    tx: &mut Transaction<'_, Postgres>,
    relation: RelationTable,
    owner: Uuid,
    desired: &[Uuid],
) -> Result<()> {
    let current = current_targets(tx, relation, owner).await?;
    let delta = diff(&current, desired);
    if delta.is_empty() {
        return Ok(());
    }

    if !delta.remove.is_empty() {
        let sql = format!(
            "DELETE FROM {table} WHERE {owner} = $1 AND {target} = ANY($2)",
            table = relation.table,
            owner = relation.owner_column,
            target = relation.target_column,
        );
        sqlx::query(&sql)
            .bind(owner)
            .bind(&delta.remove)
            .execute(&mut **tx)
            .await
            .map_err(|e| CatalogError::from_db(relation.table, e))?;
    }

    if !delta.insert.is_empty() {
        let sql = format!(
            "INSERT INTO {table} ({owner}, {target}) SELECT $1, UNNEST($2::uuid[])",
            table = relation.table,
            owner = relation.owner_column,
            target = relation.target_column,
        );
        sqlx::query(&sql)
            .bind(owner)
            .bind(&delta.insert)
            .execute(&mut **tx)
            .await
            .map_err(|e| CatalogError::from_db(relation.table, e))?;
    }

    tracing::debug!(
        table = relation.table,
        %owner,
        inserted = delta.insert.len(),
        removed = delta.remove.len(),
        "synced relation set"
    );
    Ok(())
}

async fn current_targets(
    tx: &mut Transaction<'_, Postgres>,
    relation: RelationTable,
    owner: Uuid,
) -> Result<Vec<Uuid>> {
    let sql = format!(
        "SELECT {target} FROM {table} WHERE {owner} = $1",
        table = relation.table,
        owner = relation.owner_column,
        target = relation.target_column,
    );
    sqlx::query_scalar(&sql)
        .bind(owner)
        .fetch_all(&mut **tx)
        .await
        .map_err(|e| CatalogError::from_db(relation.table, e))
}

/// Load `owner`'s target IDs outside a transaction.
pub async fn load_targets(
    pool: &PgPool,
    relation: RelationTable,
    owner: Uuid,
) -> Result<Vec<Uuid>> {
    let sql = format!(
        "SELECT {target} FROM {table} WHERE {owner} = $1 ORDER BY {target}",
        table = relation.table,
        owner = relation.owner_column,
        target = relation.target_column,
    );
    sqlx::query_scalar(&sql)
        .bind(owner)
        .fetch_all(pool)
        .await
        .map_err(|e| CatalogError::from_db(relation.table, e))
}

/// Load target IDs for many owners in one round trip, grouped by owner.
///
/// Owners with no rows are absent from the map.
pub async fn load_targets_bulk(
    pool: &PgPool,
    relation: RelationTable,
    owners: &[Uuid],
) -> Result<HashMap<Uuid, Vec<Uuid>>> {
    if owners.is_empty() {
        return Ok(HashMap::new());
    }

    let sql = format!(
        "SELECT {owner}, {target} FROM {table} WHERE {owner} = ANY($1) ORDER BY {target}",
        table = relation.table,
        owner = relation.owner_column,
        target = relation.target_column,
    );
    let rows: Vec<(Uuid, Uuid)> = sqlx::query_as(&sql)
        .bind(owners)
        .fetch_all(pool)
        .await
        .map_err(|e| CatalogError::from_db(relation.table, e))?;

    let mut grouped: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
    for (owner, target) in rows {
        grouped.entry(owner).or_default().push(target);
    }
    Ok(grouped)
}
