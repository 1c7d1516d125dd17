use uuid::Uuid;

use crate::application::access::rules::{OwnedNode, Subject};
use crate::application::access::{AccessGuard, Operation};
use crate::application::context::RequestContext;
use crate::application::dto::discussions::QuestionResponse;
use crate::application::error::DiscussionResult;
use crate::application::ports::class_membership_port::ClassMembershipPort;
use crate::application::ports::clock::Clock;
use crate::application::ports::comment_repository::CommentRepository;
use crate::application::ports::content_item_repository::ContentItemRepository;
use crate::application::ports::notification_port::{NotificationDispatcher, QuestionNotice};
use crate::application::ports::question_repository::QuestionRepository;
use crate::application::ports::role_provider::RoleProvider;
use crate::application::ports::unit_of_work::UnitOfWorkFactory;
use crate::application::ports::user_repository::UserRepository;
use crate::application::services::notifier::{self, Notice};
use crate::application::services::transaction::{self, StagedWrite};
use crate::application::use_cases::support::{
    ensure_question_active, load_content_item, load_question, log_rejection, require_text,
};

#[derive(Debug, Clone)]
pub struct QuestionEdit {
    pub question_id: Uuid,
    pub title: String,
    pub content: String,
}

pub struct UpdateQuestion<'a, U, R, C, I, Q, M, W, K, N>
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

impl<'a, U, R, C, I, Q, M, W, K, N> UpdateQuestion<'a, U, R, C, I, Q, M, W, K, N>
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
    pub async fn execute(&self, ctx: &RequestContext, edit: QuestionEdit) -> DiscussionResult<QuestionResponse> {
        self.run(ctx, edit)
            .await
            .inspect_err(|e| log_rejection("update_question", ctx.actor_id, e))
    }

    async fn run(&self, ctx: &RequestContext, edit: QuestionEdit) -> DiscussionResult<QuestionResponse> {
        let title = require_text("title", &edit.title)?;
        let content = require_text("content", &edit.content)?;

        let actor = self.guard.load_actor(ctx).await?;
        let mut question = load_question(ctx, self.questions, edit.question_id).await?;
        ensure_question_active(&question)?;
        let item = load_content_item(ctx, self.content_items, question.content_item_id).await?;

        let active_comments = ctx
            .step(self.comments.count_active_for_question(question.id))
            .await?;
        let node = OwnedNode {
            subject: Subject::Question,
            created_by: question.created_by,
            active_children: active_comments,
        };
        self.guard
            .authorize(ctx, &actor, Operation::Update, &item, &node)
            .await?;
        let view = self.guard.describe(ctx, &actor, &node).await?;

        question.title = title;
        question.content = content;
        question.last_modified_at = Some(self.clock.now());
        transaction::commit_writes(ctx, self.uow, &[StagedWrite::UpdateQuestion(question.clone())])
            .await?;
        tracing::info!(question_id = %question.id, actor_id = %actor.id(), "question_updated");

        let mut response = QuestionResponse::from_question(&question, view.creator_role);
        response.comment_count = active_comments;
        response.can_update = view.can_update;
        response.can_delete = view.can_delete;

        let notice = Notice::QuestionUpdated(QuestionNotice {
            payload: response.clone(),
            content_item_id: item.id,
            actor_id: actor.id(),
            actor_name: actor.user.full_name.clone(),
        });
        notifier::dispatch(self.notifier, &notice).await;
        Ok(response)
    }
}
