use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::discussions::Comment;

#[async_trait]
pub trait CommentRepository: Send + Sync {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<Comment>>;

    /// Every comment and reply of the question, any status, unordered.
    async fn list_for_question(&self, question_id: Uuid) -> anyhow::Result<Vec<Comment>>;

    async fn list_replies(&self, comment_id: Uuid) -> anyhow::Result<Vec<Comment>>;

    /// Active top-level comments plus active replies hanging off one of them.
    /// Replies under an inactive or missing parent are not counted.
    async fn count_active_for_question(&self, question_id: Uuid) -> anyhow::Result<u64>;

    async fn count_active_replies(&self, comment_id: Uuid) -> anyhow::Result<u64>;
}
