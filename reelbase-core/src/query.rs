//! List query building for the catalog resources.
//!
//! Not a generic query builder: each repository declares a fixed
//! [`ListSpec`] (table, selectable columns, search column, sortable
//! whitelist) and this module renders the two statements a paged list
//! needs. Values are always bound; only whitelisted identifiers are ever
//! interpolated.

use reelbase_model::ListQuery;

use crate::error::{CatalogError, Result};

/// Hard ceiling on page size; requests above it are clamped.
pub const MAX_PER_PAGE: u32 = 100;

/// Per-resource listing contract.
#[derive(Debug, Clone, Copy)]
pub struct ListSpec {
    pub table: &'static str,
    pub columns: &'static str,
    pub search_column: &'static str,
    pub sortable: &'static [&'static str],
    pub default_sort: &'static str,
}

/// Rendered SQL for one list call: the page select, the match count, and
/// the single search bind value shared by both (always `$1` when present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListSql {
    pub select: String,
    pub count: String,
    pub search: Option<String>,
}

/// Render the select/count pair for `query` against `spec`.
///
/// Soft-deleted rows are filtered out unless `include_deleted` is set. An
/// unknown sort column is a validation error, not a silent fallback.
pub fn build_list_sql(spec: &ListSpec, query: &ListQuery) -> Result<ListSql> {
    let sort = match query.sort.as_deref() {
        Some(requested) => {
            if !spec.sortable.contains(&requested) {
                return Err(CatalogError::validation(
                    "sort",
                    format!(
                        "cannot sort {} by {requested:?}; allowed: {}",
                        spec.table,
                        spec.sortable.join(", ")
                    ),
                ));
            }
            requested
        }
        None => spec.default_sort,
    };

    let search = query
        .search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{s}%"));

    let mut conditions = Vec::new();
    if !query.include_deleted {
        conditions.push("deleted_at IS NULL".to_string());
    }
    if search.is_some() {
        conditions.push(format!("{} ILIKE $1", spec.search_column));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    let per_page = query.per_page.clamp(1, MAX_PER_PAGE);
    let offset = u64::from(query.page.saturating_sub(1)) * u64::from(per_page);

    let select = format!(
        "SELECT {columns} FROM {table}{where_clause} ORDER BY {sort} {dir} LIMIT {per_page} OFFSET {offset}",
        columns = spec.columns,
        table = spec.table,
        dir = query.dir.as_sql(),
    );
    let count = format!(
        "SELECT COUNT(*) FROM {table}{where_clause}",
        table = spec.table,
    );

    Ok(ListSql {
        select,
        count,
        search,
    })
}

/// Effective page size after clamping, for building the returned page.
pub fn effective_per_page(query: &ListQuery) -> u32 {
    query.per_page.clamp(1, MAX_PER_PAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SPEC: ListSpec = ListSpec {
        table: "categories",
        columns: "id, name",
        search_column: "name",
        sortable: &["name", "created_at"],
        default_sort: "name",
    };

    #[test]
    fn default_query_filters_tombstones() {
        let sql = build_list_sql(&SPEC, &ListQuery::default()).unwrap();
        assert_eq!(
            sql.select,
            "SELECT id, name FROM categories WHERE deleted_at IS NULL \
             ORDER BY name ASC LIMIT 15 OFFSET 0"
        );
        assert_eq!(
            sql.count,
            "SELECT COUNT(*) FROM categories WHERE deleted_at IS NULL"
        );
        assert_eq!(sql.search, None);
    }

    #[test]
    fn include_deleted_drops_the_tombstone_filter() {
        let query = ListQuery {
            include_deleted: true,
            ..ListQuery::default()
        };
        let sql = build_list_sql(&SPEC, &query).unwrap();
        assert!(!sql.select.contains("deleted_at"));
        assert!(!sql.count.contains("WHERE"));
    }

    #[test]
    fn search_binds_a_wildcard_pattern() {
        let query = ListQuery {
            search: Some("  drama ".to_string()),
            ..ListQuery::default()
        };
        let sql = build_list_sql(&SPEC, &query).unwrap();
        assert!(sql.select.contains("name ILIKE $1"));
        assert_eq!(sql.search.as_deref(), Some("%drama%"));
    }

    #[test]
    fn blank_search_is_ignored() {
        let query = ListQuery {
            search: Some("   ".to_string()),
            ..ListQuery::default()
        };
        let sql = build_list_sql(&SPEC, &query).unwrap();
        assert_eq!(sql.search, None);
        assert!(!sql.select.contains("ILIKE"));
    }

    #[test]
    fn unknown_sort_column_is_rejected() {
        let query = ListQuery {
            sort: Some("deleted_at; DROP TABLE categories".to_string()),
            ..ListQuery::default()
        };
        let err = build_list_sql(&SPEC, &query).unwrap_err();
        assert!(matches!(err, CatalogError::Validation { .. }));
    }

    #[test]
    fn pagination_is_rendered_from_page_and_per_page() {
        let query = ListQuery {
            page: 3,
            per_page: 20,
            ..ListQuery::default()
        };
        let sql = build_list_sql(&SPEC, &query).unwrap();
        assert!(sql.select.ends_with("LIMIT 20 OFFSET 40"));
    }

    #[test]
    fn per_page_is_clamped() {
        let query = ListQuery {
            per_page: 10_000,
            ..ListQuery::default()
        };
        let sql = build_list_sql(&SPEC, &query).unwrap();
        assert!(sql.select.ends_with("LIMIT 100 OFFSET 0"));
        assert_eq!(effective_per_page(&query), 100);
    }
}
