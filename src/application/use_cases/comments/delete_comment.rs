use uuid::Uuid;

use crate::application::access::rules::{OwnedNode, Subject};
use crate::application::access::{AccessGuard, Operation};
use crate::application::context::RequestContext;
use crate::application::dto::discussions::CommentResponse;
use crate::application::error::DiscussionResult;
use crate::application::ports::class_membership_port::ClassMembershipPort;
use crate::application::ports::comment_repository::CommentRepository;
use crate::application::ports::content_item_repository::ContentItemRepository;
use crate::application::ports::notification_port::{CommentNotice, NotificationDispatcher};
use crate::application::ports::question_repository::QuestionRepository;
use crate::application::ports::role_provider::RoleProvider;
use crate::application::ports::unit_of_work::UnitOfWorkFactory;
use crate::application::ports::user_repository::UserRepository;
use crate::application::services::cascade_delete::{
    self, CascadeDeletion, CascadeState, CascadeTarget,
};
use crate::application::services::notifier::Notice;
use crate::application::use_cases::support::{
    load_comment, load_content_item, load_question, log_rejection,
};

pub struct DeleteComment<'a, U, R, C, I, Q, M, W, N>
where
    U: UserRepository + ?Sized,
    R: RoleProvider + ?Sized,
    C: ClassMembershipPort + ?Sized,
    I: ContentItemRepository + ?Sized,
    Q: QuestionRepository + ?Sized,
    M: CommentRepository + ?Sized,
    W: UnitOfWorkFactory + ?Sized,
    N: NotificationDispatcher + ?Sized,
{
    pub guard: AccessGuard<'a, U, R, C>,
    pub content_items: &'a I,
    pub questions: &'a Q,
    pub comments: &'a M,
    pub uow: &'a W,
    pub notifier: &'a N,
}

impl<'a, U, R, C, I, Q, M, W, N> DeleteComment<'a, U, R, C, I, Q, M, W, N>
where
    U: UserRepository + ?Sized,
    R: RoleProvider + ?Sized,
    C: ClassMembershipPort + ?Sized,
    I: ContentItemRepository + ?Sized,
    Q: QuestionRepository + ?Sized,
    M: CommentRepository + ?Sized,
    W: UnitOfWorkFactory + ?Sized,
    N: NotificationDispatcher + ?Sized,
{
    pub async fn execute(&self, ctx: &RequestContext, comment_id: Uuid) -> DiscussionResult<bool> {
        self.run(ctx, comment_id)
            .await
            .inspect_err(|e| log_rejection("delete_comment", ctx.actor_id, e))
    }

    async fn run(&self, ctx: &RequestContext, comment_id: Uuid) -> DiscussionResult<bool> {
        let actor = self.guard.load_actor(ctx).await?;
        let comment = load_comment(ctx, self.comments, comment_id).await?;
        let question = load_question(ctx, self.questions, comment.question_id).await?;
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
            .authorize(ctx, &actor, Operation::Delete, &item, &node)
            .await
            .inspect_err(|_| cascade_delete::trace_state("comment", comment.id, CascadeState::Rejected))?;

        let replies = ctx.step(self.comments.list_replies(comment.id)).await?;
        let view = self.guard.describe(ctx, &actor, &node).await?;
        let mut payload = CommentResponse::from_comment(&comment, view.creator_role);
        payload.reply_count = active_replies;
        let notice = Notice::CommentDeleted(CommentNotice {
            payload,
            content_item_id: item.id,
            actor_name: actor.user.full_name.clone(),
            actor_avatar: actor.user.avatar_url.clone(),
            reply_count: active_replies,
            parent_comment_id: comment.parent_comment_id,
        });

        CascadeDeletion {
            uow: self.uow,
            notifier: self.notifier,
        }
        .execute(ctx, CascadeTarget::Comment(&comment, &replies), notice)
        .await?;
        Ok(true)
    }
}
