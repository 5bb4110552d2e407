use std::fmt;
use std::sync::Arc;

use reelbase_core::database::PostgresDatabase;
use reelbase_core::database::ports::{
    CastMembersRepository, CategoriesRepository, GenresRepository, VideosRepository,
};
use reelbase_core::database::repositories::{
    PostgresCastMembersRepository, PostgresCategoriesRepository, PostgresGenresRepository,
    PostgresVideosRepository,
};
use reelbase_core::storage::BlobStore;
use reelbase_core::writer::VideoWriter;

/// Shared per-request state: the repositories and the transactional writer.
#[derive(Clone)]
pub struct AppState {
    pub db: PostgresDatabase,
    pub categories: Arc<dyn CategoriesRepository>,
    pub genres: Arc<dyn GenresRepository>,
    pub cast_members: Arc<dyn CastMembersRepository>,
    pub videos: Arc<dyn VideosRepository>,
    pub writer: Arc<VideoWriter>,
}

impl AppState {
    pub fn new(db: PostgresDatabase, store: Arc<dyn BlobStore>) -> Self {
        let pool = db.pool().clone();
        Self {
            categories: Arc::new(PostgresCategoriesRepository::new(pool.clone())),
            genres: Arc::new(PostgresGenresRepository::new(pool.clone())),
            cast_members: Arc::new(PostgresCastMembersRepository::new(pool.clone())),
            videos: Arc::new(PostgresVideosRepository::new(pool.clone())),
            writer: Arc::new(VideoWriter::new(pool, store)),
            db,
        }
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").field("db", &self.db).finish()
    }
}
