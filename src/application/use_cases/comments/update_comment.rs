use uuid::Uuid;

use crate::application::access::rules::{OwnedNode, Subject};
use crate::application::access::{AccessGuard, Operation};
use crate::application::context::RequestContext;
use crate::application::dto::discussions::CommentResponse;
use crate::application::error::DiscussionResult;
use crate::application::ports::class_membership_port::ClassMembershipPort;
use crate::application::ports::clock::Clock;
use crate::application::ports::comment_repository::CommentRepository;
use crate::application::ports::content_item_repository::ContentItemRepository;
use crate::application::ports::notification_port::{CommentNotice, NotificationDispatcher};
use crate::application::ports::question_repository::QuestionRepository;
use crate::application::ports::role_provider::RoleProvider;
use crate::application::ports::unit_of_work::UnitOfWorkFactory;
use crate::application::ports::user_repository::UserRepository;
use crate::application::services::notifier::{self, Notice};
use crate::application::services::transaction::{self, StagedWrite};
use crate::application::use_cases::support::{
    ensure_comment_active, ensure_question_active, load_comment, load_content_item,
    load_question, log_rejection, require_text,
};

#[derive(Debug, Clone)]
pub struct CommentEdit {
    pub comment_id: Uuid,
    pub content: String,
}

pub struct UpdateComment<'a, U, R, C, I, Q, M, W, K, N>
where
    U: UserRepository + ?Sized,
    R: RoleProvider + ?Sized,
    C: ClassMembershipPort + ?Sized,
    I: ContentItemRepository + ?Sized,
    Q: QuestionRepository + ?Sized,
    M: CommentRepository + ?Sized,
    W: UnitOfWorkFactory + ?Sized,
    K: Clock + ?Sized,
    N: NotificationDispatcher + ?Sized,
{
    pub guard: AccessGuard<'a, U, R, C>,
    pub content_items: &'a I,
    pub questions: &'a Q,
    pub comments: &'a M,
    pub uow: &'a W,
    pub clock: &'a K,
    pub notifier: &'a N,
}

impl<'a, U, R, C, I, Q, M, W, K, N> UpdateComment<'a, U, R, C, I, Q, M, W, K, N>
where
    U: UserRepository + ?Sized,
    R: RoleProvider + ?Sized,
    C: ClassMembershipPort + ?Sized,
    I: ContentItemRepository + ?Sized,
    Q: QuestionRepository + ?Sized,
    M: CommentRepository + ?Sized,
    W: UnitOfWorkFactory + ?Sized,
    K: Clock + ?Sized,
    N: NotificationDispatcher + ?Sized,
{
    pub async fn execute(&self, ctx: &RequestContext, edit: CommentEdit) -> DiscussionResult<CommentResponse> {
        self.run(ctx, edit)
            .await
            .inspect_err(|e| log_rejection("update_comment", ctx.actor_id, e))
    }

    async fn run(&self, ctx: &RequestContext, edit: CommentEdit) -> DiscussionResult<CommentResponse> {
        let content = require_text("content", &edit.content)?;

        let actor = self.guard.load_actor(ctx).await?;
        let mut comment = load_comment(ctx, self.comments, edit.comment_id).await?;
        ensure_comment_active(&comment)?;
        let question = load_question(ctx, self.questions, comment.question_id).await?;
        ensure_question_active(&question)?;
        let item = load_content_item(ctx, self.content_items, question.content_item_id).await?;

        let active_replies = ctx
            .step(self.comments.count_active_replies(comment.id))
            .await?;
        let node = OwnedNode {
            subject: Subject::Comment,
            created_by: comment.created_by,
            active_children: active_replies,
        };
        self.guard
            .authorize(ctx, &actor, Operation::Update, &item, &node)
            .await?;
        let view = self.guard.describe(ctx, &actor, &node).await?;

        comment.content = content;
        comment.last_modified_at = Some(self.clock.now());
        transaction::commit_writes(ctx, self.uow, &[StagedWrite::UpdateComment(comment.clone())])
            .await?;
        tracing::info!(comment_id = %comment.id, actor_id = %actor.id(), "comment_updated");

        let mut response = CommentResponse::from_comment(&comment, view.creator_role);
        response.reply_count = if comment.is_reply() { 0 } else { active_replies };
        response.can_update = view.can_update;
        response.can_delete = view.can_delete;

        let notice = Notice::CommentUpdated(CommentNotice {
            payload: response.clone(),
            content_item_id: item.id,
            actor_name: actor.user.full_name.clone(),
            actor_avatar: actor.user.avatar_url.clone(),
            reply_count: response.reply_count,
            parent_comment_id: comment.parent_comment_id,
        });
        notifier::dispatch(self.notifier, &notice).await;
        Ok(response)
    }
}
