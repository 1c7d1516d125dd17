use uuid::Uuid;

use crate::application::access::rules::{OwnedNode, Subject};
use crate::application::access::AccessGuard;
use crate::application::context::RequestContext;
use crate::application::dto::discussions::{QuestionDetail, QuestionResponse};
use crate::application::error::{DiscussionResult, ErrorCode};
use crate::application::ports::class_membership_port::ClassMembershipPort;
use crate::application::ports::comment_repository::CommentRepository;
use crate::application::ports::content_item_repository::ContentItemRepository;
use crate::application::ports::question_repository::QuestionRepository;
use crate::application::ports::role_provider::RoleProvider;
use crate::application::ports::user_repository::UserRepository;
use crate::application::services::comment_tree::CommentTreeAssembler;
use crate::application::use_cases::support::{load_content_item, load_question, log_rejection};

pub struct GetQuestionDetail<'a, U, R, C, I, Q, M>
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
    pub memoize_lookups: bool,
}

impl<'a, U, R, C, I, Q, M> GetQuestionDetail<'a, U, R, C, I, Q, M>
where
    U: UserRepository + ?Sized,
    R: RoleProvider + ?Sized,
    C: ClassMembershipPort + ?Sized,
    I: ContentItemRepository + ?Sized,
    Q: QuestionRepository + ?Sized,
    M: CommentRepository + ?Sized,
{
    pub async fn execute(&self, ctx: &RequestContext, question_id: Uuid) -> DiscussionResult<QuestionDetail> {
        self.run(ctx, question_id)
            .await
            .inspect_err(|e| log_rejection("get_question_detail", ctx.actor_id, e))
    }

    async fn run(&self, ctx: &RequestContext, question_id: Uuid) -> DiscussionResult<QuestionDetail> {
        let actor = self.guard.load_actor(ctx).await?;
        let question = load_question(ctx, self.questions, question_id).await?;
        // Inactive questions are not listed anywhere; look them up as missing.
        if !question.is_active() {
            return Err(ErrorCode::QuestionNotFound.into());
        }
        let item = load_content_item(ctx, self.content_items, question.content_item_id).await?;
        self.guard.check_view_question(ctx, &actor, &item).await?;

        let comments: Vec<_> = ctx
            .step(self.comments.list_for_question(question.id))
            .await?
            .into_iter()
            .filter(|c| c.is_active())
            .collect();
        let tree = CommentTreeAssembler {
            guard: &self.guard,
            memoize_lookups: self.memoize_lookups,
        }
        .build(ctx, &actor, &comments)
        .await?;

        let active_comments = ctx
            .step(self.comments.count_active_for_question(question.id))
            .await?;
        let view = self
            .guard
            .describe(
                ctx,
                &actor,
                &OwnedNode {
                    subject: Subject::Question,
                    created_by: question.created_by,
                    active_children: active_comments,
                },
            )
            .await?;
        let mut response = QuestionResponse::from_question(&question, view.creator_role);
        response.comment_count = tree.comment_count;
        response.can_update = view.can_update;
        response.can_delete = view.can_delete;

        Ok(QuestionDetail {
            question: response,
            comments: tree.comments,
        })
    }
}
