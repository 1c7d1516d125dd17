use uuid::Uuid;

use crate::application::access::rules::{OwnedNode, Subject};
use crate::application::access::AccessGuard;
use crate::application::context::RequestContext;
use crate::application::dto::discussions::QuestionResponse;
use crate::application::error::DiscussionResult;
use crate::application::ports::class_membership_port::ClassMembershipPort;
use crate::application::ports::clock::Clock;
use crate::application::ports::content_item_repository::ContentItemRepository;
use crate::application::ports::notification_port::{NotificationDispatcher, QuestionNotice};
use crate::application::ports::role_provider::RoleProvider;
use crate::application::ports::unit_of_work::UnitOfWorkFactory;
use crate::application::ports::user_repository::UserRepository;
use crate::application::services::notifier::{self, Notice};
use crate::application::services::transaction::{self, StagedWrite};
use crate::application::use_cases::support::{load_content_item, log_rejection, require_text};
use crate::domain::discussions::Question;
use crate::domain::status::ActivationStatus;

#[derive(Debug, Clone)]
pub struct NewQuestion {
    pub content_item_id: Uuid,
    pub title: String,
    pub content: String,
}

pub struct CreateQuestion<'a, U, R, C, I, W, K, N>
where
    U: UserRepository + ?Sized,
    R: RoleProvider + ?Sized,
    C: ClassMembershipPort + ?Sized,
    I: ContentItemRepository + ?Sized,
    W: UnitOfWorkFactory + ?Sized,
    K: Clock + ?Sized,
    N: NotificationDispatcher + ?Sized,
{
    pub guard: AccessGuard<'a, U, R, C>,
    pub content_items: &'a I,
    pub uow: &'a W,
    pub clock: &'a K,
    pub notifier: &'a N,
}

impl<'a, U, R, C, I, W, K, N> CreateQuestion<'a, U, R, C, I, W, K, N>
where
    U: UserRepository + ?Sized,
    R: RoleProvider + ?Sized,
    C: ClassMembershipPort + ?Sized,
    I: ContentItemRepository + ?Sized,
    W: UnitOfWorkFactory + ?Sized,
    K: Clock + ?Sized,
    N: NotificationDispatcher + ?Sized,
{
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        input: NewQuestion,
    ) -> DiscussionResult<QuestionResponse> {
        self.run(ctx, input)
            .await
            .inspect_err(|e| log_rejection("create_question", ctx.actor_id, e))
    }

    async fn run(&self, ctx: &RequestContext, input: NewQuestion) -> DiscussionResult<QuestionResponse> {
        let title = require_text("title", &input.title)?;
        let content = require_text("content", &input.content)?;

        let actor = self.guard.load_actor(ctx).await?;
        let item = load_content_item(ctx, self.content_items, input.content_item_id).await?;
        self.guard.check_create_question(ctx, &actor, &item).await?;

        let view = self
            .guard
            .describe(
                ctx,
                &actor,
                &OwnedNode {
                    subject: Subject::Question,
                    created_by: actor.id(),
                    active_children: 0,
                },
            )
            .await?;

        let question = Question {
            id: Uuid::new_v4(),
            content_item_id: item.id,
            created_by: actor.id(),
            title,
            content,
            created_at: self.clock.now(),
            last_modified_at: None,
            status: ActivationStatus::Active,
        };
        transaction::commit_writes(ctx, self.uow, &[StagedWrite::AddQuestion(question.clone())])
            .await?;
        tracing::info!(question_id = %question.id, content_item_id = %item.id, actor_id = %actor.id(), "question_created");

        let mut response = QuestionResponse::from_question(&question, view.creator_role);
        response.can_update = view.can_update;
        response.can_delete = view.can_delete;

        let notice = Notice::QuestionCreated(QuestionNotice {
            payload: response.clone(),
            content_item_id: item.id,
            actor_id: actor.id(),
            actor_name: actor.user.full_name.clone(),
        });
        notifier::dispatch(self.notifier, &notice).await;
        Ok(response)
    }
}
