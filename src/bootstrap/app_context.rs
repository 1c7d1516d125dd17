use std::sync::Arc;

use crate::application::access::AccessGuard;
use crate::application::ports::class_membership_port::ClassMembershipPort;
use crate::application::ports::clock::Clock;
use crate::application::ports::comment_repository::CommentRepository;
use crate::application::ports::content_item_repository::ContentItemRepository;
use crate::application::ports::notification_port::NotificationDispatcher;
use crate::application::ports::question_repository::QuestionRepository;
use crate::application::ports::role_provider::RoleProvider;
use crate::application::ports::unit_of_work::UnitOfWorkFactory;
use crate::application::ports::user_repository::UserRepository;
use crate::application::use_cases::comments::create_comment::CreateComment;
use crate::application::use_cases::comments::delete_comment::DeleteComment;
use crate::application::use_cases::comments::get_comments::GetCommentsByQuestion;
use crate::application::use_cases::comments::update_comment::UpdateComment;
use crate::application::use_cases::questions::create_question::CreateQuestion;
use crate::application::use_cases::questions::delete_question::DeleteQuestion;
use crate::application::use_cases::questions::get_question_detail::GetQuestionDetail;
use crate::application::use_cases::questions::list_questions_by_lesson::ListQuestionsByLesson;
use crate::application::use_cases::questions::update_question::UpdateQuestion;
use crate::bootstrap::config::Config;
use crate::infrastructure::memory::{MemoryStore, SystemClock};
use crate::infrastructure::notifications::BroadcastNotificationDispatcher;

type Users = dyn UserRepository;
type Roles = dyn RoleProvider;
type Classes = dyn ClassMembershipPort;
type Items = dyn ContentItemRepository;
type Questions = dyn QuestionRepository;
type Comments = dyn CommentRepository;
type Uow = dyn UnitOfWorkFactory;
type Time = dyn Clock;
type Notifier = dyn NotificationDispatcher;

pub type Guard<'a> = AccessGuard<'a, Users, Roles, Classes>;
pub type CreateQuestionUseCase<'a> = CreateQuestion<'a, Users, Roles, Classes, Items, Uow, Time, Notifier>;
pub type GetQuestionDetailUseCase<'a> = GetQuestionDetail<'a, Users, Roles, Classes, Items, Questions, Comments>;
pub type ListQuestionsUseCase<'a> = ListQuestionsByLesson<'a, Users, Roles, Classes, Items, Questions, Comments>;
pub type UpdateQuestionUseCase<'a> =
    UpdateQuestion<'a, Users, Roles, Classes, Items, Questions, Comments, Uow, Time, Notifier>;
pub type DeleteQuestionUseCase<'a> =
    DeleteQuestion<'a, Users, Roles, Classes, Items, Questions, Comments, Uow, Notifier>;
pub type CreateCommentUseCase<'a> =
    CreateComment<'a, Users, Roles, Classes, Items, Questions, Comments, Uow, Time, Notifier>;
pub type GetCommentsUseCase<'a> = GetCommentsByQuestion<'a, Users, Roles, Classes, Items, Questions, Comments>;
pub type UpdateCommentUseCase<'a> =
    UpdateComment<'a, Users, Roles, Classes, Items, Questions, Comments, Uow, Time, Notifier>;
pub type DeleteCommentUseCase<'a> =
    DeleteComment<'a, Users, Roles, Classes, Items, Questions, Comments, Uow, Notifier>;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

#[derive(Clone)]
pub struct AppServices {
    user_repo: Arc<Users>,
    role_provider: Arc<Roles>,
    class_membership: Arc<Classes>,
    content_item_repo: Arc<Items>,
    question_repo: Arc<Questions>,
    comment_repo: Arc<Comments>,
    unit_of_work: Arc<Uow>,
    clock: Arc<Time>,
    notifier: Arc<Notifier>,
}

impl AppServices {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_repo: Arc<Users>,
        role_provider: Arc<Roles>,
        class_membership: Arc<Classes>,
        content_item_repo: Arc<Items>,
        question_repo: Arc<Questions>,
        comment_repo: Arc<Comments>,
        unit_of_work: Arc<Uow>,
        clock: Arc<Time>,
        notifier: Arc<Notifier>,
    ) -> Self {
        Self {
            user_repo,
            role_provider,
            class_membership,
            content_item_repo,
            question_repo,
            comment_repo,
            unit_of_work,
            clock,
            notifier,
        }
    }

    /// Every store-side port backed by one [`MemoryStore`].
    pub fn from_memory_store(
        store: MemoryStore,
        clock: Arc<Time>,
        notifier: Arc<Notifier>,
    ) -> Self {
        let store = Arc::new(store);
        Self::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            store,
            clock,
            notifier,
        )
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    /// In-memory wiring with a broadcast dispatcher sized from the config.
    pub fn in_memory(cfg: Config) -> (Self, MemoryStore, BroadcastNotificationDispatcher) {
        let store = MemoryStore::new();
        let notifier = BroadcastNotificationDispatcher::new(cfg.notification_capacity);
        let services = AppServices::from_memory_store(
            store.clone(),
            Arc::new(SystemClock),
            Arc::new(notifier.clone()),
        );
        (Self::new(cfg, services), store, notifier)
    }

    pub fn user_repo(&self) -> Arc<Users> {
        self.services.user_repo.clone()
    }

    pub fn role_provider(&self) -> Arc<Roles> {
        self.services.role_provider.clone()
    }

    pub fn class_membership(&self) -> Arc<Classes> {
        self.services.class_membership.clone()
    }

    pub fn notifier(&self) -> Arc<Notifier> {
        self.services.notifier.clone()
    }

    pub fn guard(&self) -> Guard<'_> {
        AccessGuard {
            users: self.services.user_repo.as_ref(),
            roles: self.services.role_provider.as_ref(),
            classes: self.services.class_membership.as_ref(),
        }
    }

    pub fn create_question(&self) -> CreateQuestionUseCase<'_> {
        let s = &self.services;
        CreateQuestion {
            guard: self.guard(),
            content_items: s.content_item_repo.as_ref(),
            uow: s.unit_of_work.as_ref(),
            clock: s.clock.as_ref(),
            notifier: s.notifier.as_ref(),
        }
    }

    pub fn get_question_detail(&self) -> GetQuestionDetailUseCase<'_> {
        let s = &self.services;
        GetQuestionDetail {
            guard: self.guard(),
            content_items: s.content_item_repo.as_ref(),
            questions: s.question_repo.as_ref(),
            comments: s.comment_repo.as_ref(),
            memoize_lookups: self.cfg.memoize_creator_lookups,
        }
    }

    pub fn list_questions_by_lesson(&self) -> ListQuestionsUseCase<'_> {
        let s = &self.services;
        ListQuestionsByLesson {
            guard: self.guard(),
            content_items: s.content_item_repo.as_ref(),
            questions: s.question_repo.as_ref(),
            comments: s.comment_repo.as_ref(),
            limits: self.cfg.listing_limits(),
        }
    }

    pub fn update_question(&self) -> UpdateQuestionUseCase<'_> {
        let s = &self.services;
        UpdateQuestion {
            guard: self.guard(),
            content_items: s.content_item_repo.as_ref(),
            questions: s.question_repo.as_ref(),
            comments: s.comment_repo.as_ref(),
            uow: s.unit_of_work.as_ref(),
            clock: s.clock.as_ref(),
            notifier: s.notifier.as_ref(),
        }
    }

    pub fn delete_question(&self) -> DeleteQuestionUseCase<'_> {
        let s = &self.services;
        DeleteQuestion {
            guard: self.guard(),
            content_items: s.content_item_repo.as_ref(),
            questions: s.question_repo.as_ref(),
            comments: s.comment_repo.as_ref(),
            uow: s.unit_of_work.as_ref(),
            notifier: s.notifier.as_ref(),
        }
    }

    pub fn create_comment(&self) -> CreateCommentUseCase<'_> {
        let s = &self.services;
        CreateComment {
            guard: self.guard(),
            content_items: s.content_item_repo.as_ref(),
            questions: s.question_repo.as_ref(),
            comments: s.comment_repo.as_ref(),
            uow: s.unit_of_work.as_ref(),
            clock: s.clock.as_ref(),
            notifier: s.notifier.as_ref(),
        }
    }

    pub fn get_comments(&self) -> GetCommentsUseCase<'_> {
        let s = &self.services;
        GetCommentsByQuestion {
            guard: self.guard(),
            content_items: s.content_item_repo.as_ref(),
            questions: s.question_repo.as_ref(),
            comments: s.comment_repo.as_ref(),
            memoize_lookups: self.cfg.memoize_creator_lookups,
        }
    }

    pub fn update_comment(&self) -> UpdateCommentUseCase<'_> {
        let s = &self.services;
        UpdateComment {
            guard: self.guard(),
            content_items: s.content_item_repo.as_ref(),
            questions: s.question_repo.as_ref(),
            comments: s.comment_repo.as_ref(),
            uow: s.unit_of_work.as_ref(),
            clock: s.clock.as_ref(),
            notifier: s.notifier.as_ref(),
        }
    }

    pub fn delete_comment(&self) -> DeleteCommentUseCase<'_> {
        let s = &self.services;
        DeleteComment {
            guard: self.guard(),
            content_items: s.content_item_repo.as_ref(),
            questions: s.question_repo.as_ref(),
            comments: s.comment_repo.as_ref(),
            uow: s.unit_of_work.as_ref(),
            notifier: s.notifier.as_ref(),
        }
    }
}
