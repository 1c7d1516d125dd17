use std::collections::HashMap;

use uuid::Uuid;

use crate::application::access::rules::{self, CreatorFacts, OwnedNode, Subject};
use crate::application::access::AccessGuard;
use crate::application::context::RequestContext;
use crate::application::dto::discussions::QuestionResponse;
use crate::application::dto::pagination::{Page, PageRequest};
use crate::application::error::DiscussionResult;
use crate::application::ports::class_membership_port::ClassMembershipPort;
use crate::application::ports::comment_repository::CommentRepository;
use crate::application::ports::content_item_repository::ContentItemRepository;
use crate::application::ports::question_repository::QuestionRepository;
use crate::application::ports::role_provider::RoleProvider;
use crate::application::ports::user_repository::UserRepository;
use crate::application::services::visibility::{self, CountMode};
use crate::application::use_cases::support::{load_content_item, log_rejection};
use crate::domain::users::Actor;

#[derive(Debug, Clone, Copy)]
pub struct ListingLimits {
    pub default_page_size: u64,
    pub max_page_size: u64,
    pub count_mode: CountMode,
}

impl Default for ListingLimits {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
            count_mode: CountMode::PageAdjusted,
        }
    }
}

pub struct ListQuestionsByLesson<'a, U, R, C, I, Q, M>
where
    U: UserRepository + ?Sized,
    R: RoleProvider + ?Sized,
    C: ClassMembershipPort + ?Sized,
    I: ContentItemRepository + ?Sized,
    Q: QuestionRepository + ?Sized,
    M: CommentRepository + ?Sized,
{
    pub guard: AccessGuard<'a, U, R, C>,
    pub content_items: &'a I,
    pub questions: &'a Q,
    pub comments: &'a M,
    pub limits: ListingLimits,
}

impl<'a, U, R, C, I, Q, M> ListQuestionsByLesson<'a, U, R, C, I, Q, M>
where
    U: UserRepository + ?Sized,
    R: RoleProvider + ?Sized,
    C: ClassMembershipPort + ?Sized,
    I: ContentItemRepository + ?Sized,
    Q: QuestionRepository + ?Sized,
    M: CommentRepository + ?Sized,
{
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        content_item_id: Uuid,
        request: PageRequest,
    ) -> DiscussionResult<Page<QuestionResponse>> {
        self.run(ctx, content_item_id, request)
            .await
            .inspect_err(|e| log_rejection("list_questions_by_lesson", ctx.actor_id, e))
    }

    async fn run(
        &self,
        ctx: &RequestContext,
        content_item_id: Uuid,
        request: PageRequest,
    ) -> DiscussionResult<Page<QuestionResponse>> {
        let actor = self.guard.load_actor(ctx).await?;
        let item = load_content_item(ctx, self.content_items, content_item_id).await?;
        self.guard.check_list_questions(ctx, &actor, &item).await?;

        let request = request.normalized(self.limits.default_page_size, self.limits.max_page_size);
        let slice = ctx
            .step(
                self.questions
                    .list_for_content_item(item.id, request.offset(), request.limit()),
            )
            .await?;

        // Strict lookups: the visibility filter reads the creator role.
        let mut creators: HashMap<Uuid, CreatorFacts> = HashMap::new();
        let mut rows = Vec::with_capacity(slice.items.len());
        for question in &slice.items {
            let creator = self.creator(ctx, &actor, question.created_by, &mut creators).await?;
            let active_comments = ctx
                .step(self.comments.count_active_for_question(question.id))
                .await?;
            let node = OwnedNode {
                subject: Subject::Question,
                created_by: question.created_by,
                active_children: active_comments,
            };
            let mut row = QuestionResponse::from_question(question, creator.role);
            row.comment_count = active_comments;
            row.can_update = rules::can_update(&actor, &node).is_ok();
            row.can_delete = rules::can_delete(&actor, &node, Some(&creator)).is_ok();
            rows.push(row);
        }

        let visible = visibility::filter_for_viewer(&actor, &item, rows, slice.total, self.limits.count_mode);
        if visible.hidden > 0 {
            tracing::debug!(content_item_id = %item.id, actor_id = %actor.id(), hidden = visible.hidden, "questions_hidden_by_visibility");
        }
        Ok(Page::new(visible.items, request, visible.total))
    }

    async fn creator(
        &self,
        ctx: &RequestContext,
        actor: &Actor,
        creator_id: Uuid,
        cache: &mut HashMap<Uuid, CreatorFacts>,
    ) -> DiscussionResult<CreatorFacts> {
        if let Some(found) = cache.get(&creator_id) {
            return Ok(*found);
        }
        let facts = if actor.is(creator_id) {
            CreatorFacts {
                role: actor.role,
                school_id: actor.school_id(),
                under_actor_authority: false,
            }
        } else {
            self.guard.creator_facts(ctx, actor, creator_id).await?
        };
        cache.insert(creator_id, facts);
        Ok(facts)
    }
}
