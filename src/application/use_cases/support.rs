use uuid::Uuid;

use crate::application::context::RequestContext;
use crate::application::error::{DiscussionError, DiscussionResult, ErrorCode};
use crate::application::ports::comment_repository::CommentRepository;
use crate::application::ports::content_item_repository::ContentItemRepository;
use crate::application::ports::question_repository::QuestionRepository;
use crate::domain::discussions::{Comment, Question};
use crate::domain::lessons::ContentItem;

/// Trimmed text, or `InvalidContent` when nothing is left.
pub fn require_text(field: &'static str, value: &str) -> DiscussionResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DiscussionError::rule_with(
            ErrorCode::InvalidContent,
            format!("{field} must not be blank"),
        ));
    }
    Ok(trimmed.to_string())
}

pub async fn load_content_item<I>(
    ctx: &RequestContext,
    items: &I,
    id: Uuid,
) -> DiscussionResult<ContentItem>
where
    I: ContentItemRepository + ?Sized,
{
    ctx.step(items.get_by_id(id))
        .await?
        .ok_or_else(|| ErrorCode::LessonMaterialNotFound.into())
}

pub async fn load_question<Q>(ctx: &RequestContext, questions: &Q, id: Uuid) -> DiscussionResult<Question>
where
    Q: QuestionRepository + ?Sized,
{
    ctx.step(questions.get_by_id(id))
        .await?
        .ok_or_else(|| ErrorCode::QuestionNotFound.into())
}

pub async fn load_comment<M>(ctx: &RequestContext, comments: &M, id: Uuid) -> DiscussionResult<Comment>
where
    M: CommentRepository + ?Sized,
{
    ctx.step(comments.get_by_id(id))
        .await?
        .ok_or_else(|| ErrorCode::CommentNotFound.into())
}

pub fn ensure_question_active(question: &Question) -> DiscussionResult<()> {
    if question.is_active() {
        Ok(())
    } else {
        Err(ErrorCode::QuestionNotActive.into())
    }
}

pub fn ensure_comment_active(comment: &Comment) -> DiscussionResult<()> {
    if comment.is_active() {
        Ok(())
    } else {
        Err(ErrorCode::CommentNotActive.into())
    }
}

pub fn log_rejection(operation: &'static str, actor_id: Uuid, err: &DiscussionError) {
    match err.code() {
        Some(code) => tracing::debug!(operation, actor_id = %actor_id, code = %code, "discussion_request_rejected"),
        None => tracing::debug!(operation, actor_id = %actor_id, error = %err, "discussion_request_failed"),
    }
}
