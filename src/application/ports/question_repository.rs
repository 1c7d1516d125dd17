use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::discussions::Question;

#[derive(Debug, Clone)]
pub struct QuestionSlice {
    pub items: Vec<Question>,
    /// Total matching rows before offset/limit.
    pub total: u64,
}

#[async_trait]
pub trait QuestionRepository: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<Question>>;

    // Active questions only, newest first.
    async fn list_for_content_item(
        &self,
        content_item_id: Uuid,
        offset: u64,
        limit: u64,
    ) -> anyhow::Result<QuestionSlice>;
}
