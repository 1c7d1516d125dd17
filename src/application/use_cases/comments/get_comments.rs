use uuid::Uuid;

use crate::application::access::AccessGuard;
use crate::application::context::RequestContext;
use crate::application::dto::discussions::CommentTree;
use crate::application::error::{DiscussionResult, ErrorCode};
use crate::application::ports::class_membership_port::ClassMembershipPort;
use crate::application::ports::comment_repository::CommentRepository;
use crate::application::ports::content_item_repository::ContentItemRepository;
use crate::application::ports::question_repository::QuestionRepository;
use crate::application::ports::role_provider::RoleProvider;
use crate::application::ports::user_repository::UserRepository;
use crate::application::services::comment_tree::CommentTreeAssembler;
use crate::application::use_cases::support::{load_content_item, load_question, log_rejection};

pub struct GetCommentsByQuestion<'a, U, R, C, I, Q, M>
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

impl<'a, U, R, C, I, Q, M> GetCommentsByQuestion<'a, U, R, C, I, Q, M>
where
    U: UserRepository + ?Sized,
    R: RoleProvider + ?Sized,
    C: ClassMembershipPort + ?Sized,
    I: ContentItemRepository + ?Sized,
    Q: QuestionRepository + ?Sized,
    M: CommentRepository + ?Sized,
{
    pub async fn execute(&self, ctx: &RequestContext, question_id: Uuid) -> DiscussionResult<CommentTree> {
        self.run(ctx, question_id)
            .await
            .inspect_err(|e| log_rejection("get_comments_by_question", ctx.actor_id, e))
    }

    async fn run(&self, ctx: &RequestContext, question_id: Uuid) -> DiscussionResult<CommentTree> {
        let actor = self.guard.load_actor(ctx).await?;
        let question = load_question(ctx, self.questions, question_id).await?;
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
        CommentTreeAssembler {
            guard: &self.guard,
            memoize_lookups: self.memoize_lookups,
        }
        .build(ctx, &actor, &comments)
        .await
    }
}
