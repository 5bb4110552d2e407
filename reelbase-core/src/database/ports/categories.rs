use async_trait::async_trait;

use reelbase_model::{Category, CategoryId, ListQuery, NewCategory, Page, UpdateCategory};

use crate::error::Result;

/// Repository port for categories.
///
/// Reads exclude soft-deleted rows unless the list query opts in via
/// `include_deleted`. Deletion is always a tombstone write; `restore`
/// clears it.
#[async_trait]
pub trait CategoriesRepository: Send + Sync {
    async fn create(&self, new: NewCategory) -> Result<Category>;
    async fn update(&self, id: CategoryId, changes: UpdateCategory) -> Result<Category>;

    async fn get(&self, id: CategoryId) -> Result<Category>;
    async fn list(&self, query: ListQuery) -> Result<Page<Category>>;

    async fn soft_delete(&self, id: CategoryId) -> Result<()>;
    async fn restore(&self, id: CategoryId) -> Result<Category>;
}
