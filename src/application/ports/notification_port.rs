use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::application::dto::discussions::{CommentResponse, QuestionResponse};

#[derive(Debug, Clone, Serialize)]
pub struct QuestionNotice {
    pub payload: QuestionResponse,
    pub content_item_id: Uuid,
    pub actor_id: Uuid,
    pub actor_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentNotice {
    pub payload: CommentResponse,
    pub content_item_id: Uuid,
    pub actor_name: String,
    pub actor_avatar: Option<String>,
    pub reply_count: u64,
    pub parent_comment_id: Option<Uuid>,
}

/// Real-time fan-out of discussion changes. Called only after a commit;
/// the engine never waits on or reacts to the outcome beyond logging it.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn question_created(&self, notice: &QuestionNotice) -> anyhow::Result<()>;
    async fn question_updated(&self, notice: &QuestionNotice) -> anyhow::Result<()>;
    async fn question_deleted(&self, notice: &QuestionNotice) -> anyhow::Result<()>;

    async fn comment_created(&self, notice: &CommentNotice) -> anyhow::Result<()>;
    async fn comment_updated(&self, notice: &CommentNotice) -> anyhow::Result<()>;
    async fn comment_deleted(&self, notice: &CommentNotice) -> anyhow::Result<()>;
}
