use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::lessons::ContentItem;

#[async_trait]
pub trait ContentItemRepository: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<ContentItem>>;
}
