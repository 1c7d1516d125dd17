#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use lesson_qa::application::context::RequestContext;
use lesson_qa::application::error::{DiscussionResult, ErrorCode};
use lesson_qa::application::ports::notification_port::{
    CommentNotice, NotificationDispatcher, QuestionNotice,
};
use lesson_qa::bootstrap::app_context::{AppContext, AppServices};
use lesson_qa::bootstrap::config::Config;
use lesson_qa::domain::discussions::{Comment, Question};
use lesson_qa::domain::lessons::{ContentItem, Visibility};
use lesson_qa::domain::status::{ActivationStatus, ApprovalStatus};
use lesson_qa::domain::users::{SchoolId, User};
use lesson_qa::infrastructure::memory::{MemoryStore, SteppingClock};

pub const SCHOOL: SchoolId = 1;
pub const OTHER_SCHOOL: SchoolId = 2;

#[derive(Debug, Clone)]
pub enum Recorded {
    Question(&'static str, QuestionNotice),
    Comment(&'static str, CommentNotice),
}

impl Recorded {
    pub fn event(&self) -> &'static str {
        match self {
            Recorded::Question(e, _) | Recorded::Comment(e, _) => e,
        }
    }
}

/// Captures every notification; can be told to fail them all.
#[derive(Default)]
pub struct RecordingDispatcher {
    pub seen: Mutex<Vec<Recorded>>,
    pub fail: std::sync::atomic::AtomicBool,
}

impl RecordingDispatcher {
    pub async fn events(&self) -> Vec<Recorded> {
        self.seen.lock().await.clone()
    }

    pub fn fail_all(&self) {
        self.fail.store(true, std::sync::atomic::Ordering::SeqCst);
    }

    async fn push(&self, rec: Recorded) -> anyhow::Result<()> {
        self.seen.lock().await.push(rec);
        if self.fail.load(std::sync::atomic::Ordering::SeqCst) {
            anyhow::bail!("dispatcher offline");
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationDispatcher for RecordingDispatcher {
    async fn question_created(&self, n: &QuestionNotice) -> anyhow::Result<()> {
        self.push(Recorded::Question("question_created", n.clone())).await
    }
    async fn question_updated(&self, n: &QuestionNotice) -> anyhow::Result<()> {
        self.push(Recorded::Question("question_updated", n.clone())).await
    }
    async fn question_deleted(&self, n: &QuestionNotice) -> anyhow::Result<()> {
        self.push(Recorded::Question("question_deleted", n.clone())).await
    }
    async fn comment_created(&self, n: &CommentNotice) -> anyhow::Result<()> {
        self.push(Recorded::Comment("comment_created", n.clone())).await
    }
    async fn comment_updated(&self, n: &CommentNotice) -> anyhow::Result<()> {
        self.push(Recorded::Comment("comment_updated", n.clone())).await
    }
    async fn comment_deleted(&self, n: &CommentNotice) -> anyhow::Result<()> {
        self.push(Recorded::Comment("comment_deleted", n.clone())).await
    }
}

/// One school with a class, its teacher and a student, an approved
/// class-restricted lesson granted to the class, plus the people and
/// material needed to probe the edges.
pub struct World {
    pub app: AppContext,
    pub store: MemoryStore,
    pub notifications: Arc<RecordingDispatcher>,
    pub class_id: Uuid,
    pub lesson: ContentItem,
    pub foreign_lesson: ContentItem,
    pub system_admin: User,
    pub school_admin: User,
    pub moderator: User,
    pub teacher: User,
    pub other_teacher: User,
    pub student: User,
    pub classmate: User,
    pub unenrolled_student: User,
    pub stranger: User,
}

pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 9, 2, 8, 0, 0).unwrap()
}

pub fn user(name: &str, school: Option<SchoolId>) -> User {
    User {
        id: Uuid::new_v4(),
        full_name: name.to_string(),
        avatar_url: Some(format!("https://cdn.example.test/{name}.png")),
        school_id: school,
    }
}

pub fn lesson(school: Option<SchoolId>, visibility: Visibility, created_by: Uuid) -> ContentItem {
    ContentItem {
        id: Uuid::new_v4(),
        title: "Photosynthesis".into(),
        school_id: school,
        status: ActivationStatus::Active,
        approval: ApprovalStatus::Approved,
        visibility,
        created_by,
    }
}

pub async fn world() -> World {
    world_with(Config::default()).await
}

pub async fn world_with(cfg: Config) -> World {
    let store = MemoryStore::new();
    let notifications = Arc::new(RecordingDispatcher::default());
    let services = AppServices::from_memory_store(
        store.clone(),
        Arc::new(SteppingClock::starting_at(epoch())),
        notifications.clone(),
    );
    let app = AppContext::new(cfg, services);

    let system_admin = user("root", None);
    let school_admin = user("principal", Some(SCHOOL));
    let moderator = user("moderator", Some(SCHOOL));
    let teacher = user("teacher", Some(SCHOOL));
    let other_teacher = user("other-teacher", Some(SCHOOL));
    let student = user("student", Some(SCHOOL));
    let classmate = user("classmate", Some(SCHOOL));
    let unenrolled_student = user("newcomer", Some(SCHOOL));
    let stranger = user("stranger", Some(SCHOOL));

    store.add_user(system_admin.clone(), &["SystemAdmin", "Teacher"]).await;
    store.add_user(school_admin.clone(), &["SchoolAdmin"]).await;
    store.add_user(moderator.clone(), &["ContentModerator"]).await;
    store.add_user(teacher.clone(), &["Teacher"]).await;
    store.add_user(other_teacher.clone(), &["Teacher"]).await;
    store.add_user(student.clone(), &["Student"]).await;
    store.add_user(classmate.clone(), &["Student"]).await;
    store.add_user(unenrolled_student.clone(), &["Student"]).await;
    store.add_user(stranger.clone(), &["Guest"]).await;

    let main_lesson = lesson(Some(SCHOOL), Visibility::ClassRestricted, teacher.id);
    let foreign_lesson = lesson(Some(OTHER_SCHOOL), Visibility::SchoolWide, Uuid::new_v4());
    store.add_content_item(main_lesson.clone()).await;
    store.add_content_item(foreign_lesson.clone()).await;

    let class_id = Uuid::new_v4();
    store.add_class(class_id, teacher.id, ActivationStatus::Active).await;
    store.enroll(class_id, student.id).await.unwrap();
    store.enroll(class_id, classmate.id).await.unwrap();
    store.grant_material(class_id, main_lesson.id).await.unwrap();

    let other_class = Uuid::new_v4();
    store
        .add_class(other_class, other_teacher.id, ActivationStatus::Active)
        .await;

    World {
        app,
        store,
        notifications,
        class_id,
        lesson: main_lesson,
        foreign_lesson,
        system_admin,
        school_admin,
        moderator,
        teacher,
        other_teacher,
        student,
        classmate,
        unenrolled_student,
        stranger,
    }
}

pub fn ctx(user: &User) -> RequestContext {
    RequestContext::new(user.id)
}

/// The rule code a use case rejected with; panics on success or on a
/// non-rule failure.
pub fn rejected<T: std::fmt::Debug>(res: DiscussionResult<T>) -> ErrorCode {
    match res {
        Ok(v) => panic!("expected a rejection, got {v:?}"),
        Err(e) => e
            .code()
            .unwrap_or_else(|| panic!("expected a rule violation, got {e:?}")),
    }
}

impl World {
    /// Seeds an active question on the main lesson, bypassing the use cases.
    pub async fn seed_question(&self, author: &User, minute: i64) -> Question {
        let question = Question {
            id: Uuid::new_v4(),
            content_item_id: self.lesson.id,
            created_by: author.id,
            title: format!("question by {}", author.full_name),
            content: "How does it work?".into(),
            created_at: epoch() + Duration::minutes(minute),
            last_modified_at: None,
            status: ActivationStatus::Active,
        };
        self.store.insert_question(question.clone()).await;
        question
    }

    pub async fn seed_comment(
        &self,
        question: &Question,
        parent: Option<&Comment>,
        author: &User,
        minute: i64,
    ) -> Comment {
        let comment = Comment {
            id: Uuid::new_v4(),
            question_id: question.id,
            parent_comment_id: parent.map(|p| p.id),
            created_by: author.id,
            content: format!("comment by {} at {minute}", author.full_name),
            created_at: epoch() + Duration::minutes(minute),
            last_modified_at: None,
            status: ActivationStatus::Active,
        };
        self.store.insert_comment(comment.clone()).await;
        comment
    }
}
