use uuid::Uuid;

use crate::application::access::rules::{OwnedNode, Subject};
use crate::application::access::AccessGuard;
use crate::application::context::RequestContext;
use crate::application::dto::discussions::CommentResponse;
use crate::application::error::{DiscussionResult, ErrorCode};
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
    ensure_comment_active, ensure_question_active, load_content_item, load_question,
    log_rejection, require_text,
};
use crate::domain::discussions::Comment;
use crate::domain::status::ActivationStatus;

#[derive(Debug, Clone)]
pub struct NewComment {
    pub question_id: Uuid,
    pub content: String,
    pub parent_comment_id: Option<Uuid>,
}

pub struct CreateComment<'a, U, R, C, I, Q, M, W, K, N>
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

impl<'a, U, R, C, I, Q, M, W, K, N> CreateComment<'a, U, R, C, I, Q, M, W, K, N>
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
    pub async fn execute(&self, ctx: &RequestContext, input: NewComment) -> DiscussionResult<CommentResponse> {
        self.run(ctx, input)
            .await
            .inspect_err(|e| log_rejection("create_comment", ctx.actor_id, e))
    }

    async fn run(&self, ctx: &RequestContext, input: NewComment) -> DiscussionResult<CommentResponse> {
        let content = require_text("content", &input.content)?;

        let actor = self.guard.load_actor(ctx).await?;
        let question = load_question(ctx, self.questions, input.question_id).await?;
        let item = load_content_item(ctx, self.content_items, question.content_item_id).await?;
        self.guard.check_view_question(ctx, &actor, &item).await?;
        ensure_question_active(&question)?;

        let parent_comment_id = match input.parent_comment_id {
            None => None,
            Some(parent_id) => Some(self.attach_point(ctx, question.id, parent_id).await?),
        };

        let view = self
            .guard
            .describe(
                ctx,
                &actor,
                &OwnedNode {
                    subject: Subject::Comment,
                    created_by: actor.id(),
                    active_children: 0,
                },
            )
            .await?;

        let comment = Comment {
            id: Uuid::new_v4(),
            question_id: question.id,
            parent_comment_id,
            created_by: actor.id(),
            content,
            created_at: self.clock.now(),
            last_modified_at: None,
            status: ActivationStatus::Active,
        };
        transaction::commit_writes(ctx, self.uow, &[StagedWrite::AddComment(comment.clone())])
            .await?;
        tracing::info!(comment_id = %comment.id, question_id = %question.id, parent_comment_id = ?parent_comment_id, actor_id = %actor.id(), "comment_created");

        let mut response = CommentResponse::from_comment(&comment, view.creator_role);
        response.can_update = view.can_update;
        response.can_delete = view.can_delete;

        let notice = Notice::CommentCreated(CommentNotice {
            payload: response.clone(),
            content_item_id: item.id,
            actor_name: actor.user.full_name.clone(),
            actor_avatar: actor.user.avatar_url.clone(),
            reply_count: 0,
            parent_comment_id,
        });
        notifier::dispatch(self.notifier, &notice).await;
        Ok(response)
    }

    /// Resolves the comment a new reply hangs off. Replying to a reply
    /// attaches to that reply's top-level comment.
    async fn attach_point(
        &self,
        ctx: &RequestContext,
        question_id: Uuid,
        parent_id: Uuid,
    ) -> DiscussionResult<Uuid> {
        let parent = ctx
            .step(self.comments.get_by_id(parent_id))
            .await?
            .filter(|c| c.question_id == question_id)
            .ok_or(ErrorCode::CommentNotFound)?;
        ensure_comment_active(&parent)?;
        let Some(top_id) = parent.parent_comment_id else {
            return Ok(parent.id);
        };
        let top = ctx
            .step(self.comments.get_by_id(top_id))
            .await?
            .filter(|c| c.question_id == question_id)
            .ok_or(ErrorCode::CommentNotFound)?;
        ensure_comment_active(&top)?;
        Ok(top.id)
    }
}
