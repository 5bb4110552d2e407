use async_trait::async_trait;

use reelbase_model::{Genre, GenreId, ListQuery, NewGenre, Page, UpdateGenre};

use crate::error::Result;

/// Repository port for genres.
///
/// Create and update are transactional over the scalar row and the
/// `genre_categories` association set: the category set is replaced
/// wholesale within the same transaction as the row write, so callers never
/// observe a half-synced genre.
#[async_trait]
pub trait GenresRepository: Send + Sync {
    async fn create(&self, new: NewGenre) -> Result<Genre>;
    async fn update(&self, id: GenreId, changes: UpdateGenre) -> Result<Genre>;

    async fn get(&self, id: GenreId) -> Result<Genre>;
    async fn list(&self, query: ListQuery) -> Result<Page<Genre>>;

    async fn soft_delete(&self, id: GenreId) -> Result<()>;
    async fn restore(&self, id: GenreId) -> Result<Genre>;
}
