use async_trait::async_trait;

use reelbase_model::{ListQuery, Page, Video, VideoId};

use crate::error::Result;

/// Read-side and lifecycle port for videos.
///
/// Create/update go through the transactional writer
/// ([`crate::writer::VideoWriter`]); this port covers everything that does
/// not touch blobs or relation inputs. `get` resolves the three relation
/// sets along with the row.
#[async_trait]
pub trait VideosRepository: Send + Sync {
    async fn get(&self, id: VideoId) -> Result<Video>;
    async fn list(&self, query: ListQuery) -> Result<Page<Video>>;

    async fn soft_delete(&self, id: VideoId) -> Result<()>;
    async fn restore(&self, id: VideoId) -> Result<Video>;
}
