use async_trait::async_trait;

use reelbase_model::{CastMember, CastMemberId, ListQuery, NewCastMember, Page, UpdateCastMember};

use crate::error::Result;

/// Repository port for cast members.
#[async_trait]
pub trait CastMembersRepository: Send + Sync {
    async fn create(&self, new: NewCastMember) -> Result<CastMember>;
    async fn update(&self, id: CastMemberId, changes: UpdateCastMember) -> Result<CastMember>;

    async fn get(&self, id: CastMemberId) -> Result<CastMember>;
    async fn list(&self, query: ListQuery) -> Result<Page<CastMember>>;

    async fn soft_delete(&self, id: CastMemberId) -> Result<()>;
    async fn restore(&self, id: CastMemberId) -> Result<CastMember>;
}
