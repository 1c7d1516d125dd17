use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::application::ports::class_membership_port::{ClassId, ClassMembershipPort};
use crate::application::ports::comment_repository::CommentRepository;
use crate::application::ports::content_item_repository::ContentItemRepository;
use crate::application::ports::question_repository::{QuestionRepository, QuestionSlice};
use crate::application::ports::role_provider::RoleProvider;
use crate::application::ports::unit_of_work::{UnitOfWork, UnitOfWorkFactory};
use crate::application::ports::user_repository::UserRepository;
use crate::domain::discussions::{Comment, Question};
use crate::domain::lessons::ContentItem;
use crate::domain::status::ActivationStatus;
use crate::domain::users::User;

use super::unit_of_work::MemoryUnitOfWork;

#[derive(Debug, Clone)]
pub(crate) struct ClassRecord {
    pub teacher_id: Uuid,
    pub status: ActivationStatus,
    pub students: HashSet<Uuid>,
    /// Materials granted to the class directly.
    pub materials: HashSet<Uuid>,
    /// Materials placed in one of the class folders.
    pub folder_materials: HashSet<Uuid>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct State {
    pub users: HashMap<Uuid, User>,
    pub roles: HashMap<Uuid, Vec<String>>,
    pub content_items: HashMap<Uuid, ContentItem>,
    pub questions: HashMap<Uuid, Question>,
    pub comments: HashMap<Uuid, Comment>,
    pub classes: HashMap<ClassId, ClassRecord>,
}

impl State {
    fn student_classes(&self, student_id: Uuid) -> impl Iterator<Item = (&ClassId, &ClassRecord)> {
        self.classes
            .iter()
            .filter(move |(_, class)| class.students.contains(&student_id))
    }

    fn active_teacher_classes(&self, teacher_id: Uuid) -> impl Iterator<Item = (&ClassId, &ClassRecord)> {
        self.classes.iter().filter(move |(_, class)| {
            class.teacher_id == teacher_id && class.status.is_active()
        })
    }
}

/// What happened to the store, in order. Staged writes are recorded when they
/// are staged, so a rolled back unit of work still shows what it attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalEntry {
    Added(Uuid),
    Updated(Uuid),
    Removed(Uuid),
    Committed { rows: u64 },
    RolledBack,
}

#[derive(Debug, Default)]
pub(crate) struct Faults {
    pub role_lookups: HashSet<Uuid>,
    pub commits: bool,
}

/// In-memory implementation of every store-side port.
///
/// Cheap to clone; clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub(crate) state: Arc<RwLock<State>>,
    pub(crate) journal: Arc<RwLock<Vec<JournalEntry>>>,
    pub(crate) faults: Arc<RwLock<Faults>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_user(&self, user: User, roles: &[&str]) {
        let mut state = self.state.write().await;
        state
            .roles
            .insert(user.id, roles.iter().map(|r| r.to_string()).collect());
        state.users.insert(user.id, user);
    }

    pub async fn add_content_item(&self, item: ContentItem) {
        self.state.write().await.content_items.insert(item.id, item);
    }

    pub async fn add_class(&self, class_id: ClassId, teacher_id: Uuid, status: ActivationStatus) {
        self.state.write().await.classes.insert(
            class_id,
            ClassRecord {
                teacher_id,
                status,
                students: HashSet::new(),
                materials: HashSet::new(),
                folder_materials: HashSet::new(),
            },
        );
    }

    pub async fn enroll(&self, class_id: ClassId, student_id: Uuid) -> anyhow::Result<()> {
        self.with_class(class_id, |class| {
            class.students.insert(student_id);
        })
        .await
    }

    pub async fn grant_material(&self, class_id: ClassId, material_id: Uuid) -> anyhow::Result<()> {
        self.with_class(class_id, |class| {
            class.materials.insert(material_id);
        })
        .await
    }

    pub async fn place_in_folder(&self, class_id: ClassId, material_id: Uuid) -> anyhow::Result<()> {
        self.with_class(class_id, |class| {
            class.folder_materials.insert(material_id);
        })
        .await
    }

    /// Seeds a question directly, outside of any unit of work.
    pub async fn insert_question(&self, question: Question) {
        self.state.write().await.questions.insert(question.id, question);
    }

    /// Seeds a comment directly, outside of any unit of work.
    pub async fn insert_comment(&self, comment: Comment) {
        self.state.write().await.comments.insert(comment.id, comment);
    }

    pub async fn question(&self, id: Uuid) -> Option<Question> {
        self.state.read().await.questions.get(&id).cloned()
    }

    pub async fn comment(&self, id: Uuid) -> Option<Comment> {
        self.state.read().await.comments.get(&id).cloned()
    }

    pub async fn journal(&self) -> Vec<JournalEntry> {
        self.journal.read().await.clone()
    }

    pub async fn removals(&self) -> Vec<Uuid> {
        self.journal
            .read()
            .await
            .iter()
            .filter_map(|e| match e {
                JournalEntry::Removed(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub async fn commits(&self) -> usize {
        self.journal
            .read()
            .await
            .iter()
            .filter(|e| matches!(e, JournalEntry::Committed { .. }))
            .count()
    }

    pub async fn clear_journal(&self) {
        self.journal.write().await.clear();
    }

    /// Makes every role lookup for `user_id` fail.
    pub async fn fail_role_lookups_for(&self, user_id: Uuid) {
        self.faults.write().await.role_lookups.insert(user_id);
    }

    /// Makes every commit fail until switched off again.
    pub async fn fail_commits(&self, fail: bool) {
        self.faults.write().await.commits = fail;
    }

    pub(crate) async fn record(&self, entry: JournalEntry) {
        self.journal.write().await.push(entry);
    }

    async fn with_class<F>(&self, class_id: ClassId, f: F) -> anyhow::Result<()>
    where
        F: FnOnce(&mut ClassRecord),
    {
        let mut state = self.state.write().await;
        let class = state
            .classes
            .get_mut(&class_id)
            .ok_or_else(|| anyhow::anyhow!("class {class_id} does not exist"))?;
        f(class);
        Ok(())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }
}

#[async_trait]
impl RoleProvider for MemoryStore {
    async fn roles_for(&self, user_id: Uuid) -> anyhow::Result<Vec<String>> {
        if self.faults.read().await.role_lookups.contains(&user_id) {
            anyhow::bail!("role directory unavailable for {user_id}");
        }
        Ok(self
            .state
            .read()
            .await
            .roles
            .get(&user_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl ContentItemRepository for MemoryStore {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<ContentItem>> {
        Ok(self.state.read().await.content_items.get(&id).cloned())
    }
}

#[async_trait]
impl QuestionRepository for MemoryStore {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<Question>> {
        Ok(self.state.read().await.questions.get(&id).cloned())
    }

    async fn list_for_content_item(
        &self,
        content_item_id: Uuid,
        offset: u64,
        limit: u64,
    ) -> anyhow::Result<QuestionSlice> {
        let state = self.state.read().await;
        let mut matching: Vec<&Question> = state
            .questions
            .values()
            .filter(|q| q.content_item_id == content_item_id && q.is_active())
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(usize::try_from(offset).unwrap_or(usize::MAX))
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .cloned()
            .collect();
        Ok(QuestionSlice { items, total })
    }
}

#[async_trait]
impl CommentRepository for MemoryStore {
    async fn get_by_id(&self, id: Uuid) -> anyhow::Result<Option<Comment>> {
        Ok(self.state.read().await.comments.get(&id).cloned())
    }

    async fn list_for_question(&self, question_id: Uuid) -> anyhow::Result<Vec<Comment>> {
        Ok(self
            .state
            .read()
            .await
            .comments
            .values()
            .filter(|c| c.question_id == question_id)
            .cloned()
            .collect())
    }

    async fn list_replies(&self, comment_id: Uuid) -> anyhow::Result<Vec<Comment>> {
        let state = self.state.read().await;
        let mut replies: Vec<Comment> = state
            .comments
            .values()
            .filter(|c| c.parent_comment_id == Some(comment_id))
            .cloned()
            .collect();
        replies.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(replies)
    }

    async fn count_active_for_question(&self, question_id: Uuid) -> anyhow::Result<u64> {
        let state = self.state.read().await;
        let attached = |parent: Uuid| {
            state.comments.get(&parent).is_some_and(|p| {
                p.question_id == question_id && p.is_active() && p.parent_comment_id.is_none()
            })
        };
        Ok(state
            .comments
            .values()
            .filter(|c| c.question_id == question_id && c.is_active())
            .filter(|c| c.parent_comment_id.is_none_or(|p| attached(p)))
            .count() as u64)
    }

    async fn count_active_replies(&self, comment_id: Uuid) -> anyhow::Result<u64> {
        Ok(self
            .state
            .read()
            .await
            .comments
            .values()
            .filter(|c| c.parent_comment_id == Some(comment_id) && c.is_active())
            .count() as u64)
    }
}

#[async_trait]
impl ClassMembershipPort for MemoryStore {
    async fn classes_for_student(&self, student_id: Uuid) -> anyhow::Result<Vec<ClassId>> {
        let state = self.state.read().await;
        Ok(state.student_classes(student_id).map(|(id, _)| *id).collect())
    }

    async fn active_classes_for_teacher(&self, teacher_id: Uuid) -> anyhow::Result<Vec<ClassId>> {
        let state = self.state.read().await;
        Ok(state
            .active_teacher_classes(teacher_id)
            .map(|(id, _)| *id)
            .collect())
    }

    async fn teacher_has_active_class(&self, teacher_id: Uuid) -> anyhow::Result<bool> {
        let state = self.state.read().await;
        Ok(state.active_teacher_classes(teacher_id).next().is_some())
    }

    async fn teacher_has_access_to_material(
        &self,
        teacher_id: Uuid,
        material_id: Uuid,
    ) -> anyhow::Result<bool> {
        let state = self.state.read().await;
        Ok(state.active_teacher_classes(teacher_id).any(|(_, class)| {
            class.materials.contains(&material_id) || class.folder_materials.contains(&material_id)
        }))
    }

    async fn has_access_to_material(
        &self,
        student_id: Uuid,
        material_id: Uuid,
    ) -> anyhow::Result<bool> {
        let state = self.state.read().await;
        Ok(state
            .student_classes(student_id)
            .any(|(_, class)| class.materials.contains(&material_id)))
    }

    async fn material_in_student_folders(
        &self,
        student_id: Uuid,
        material_id: Uuid,
    ) -> anyhow::Result<bool> {
        let state = self.state.read().await;
        Ok(state
            .student_classes(student_id)
            .any(|(_, class)| class.folder_materials.contains(&material_id)))
    }

    async fn is_enrolled_in_any_class(&self, student_id: Uuid) -> anyhow::Result<bool> {
        let state = self.state.read().await;
        Ok(state.student_classes(student_id).next().is_some())
    }
}

#[async_trait]
impl UnitOfWorkFactory for MemoryStore {
    async fn begin(&self) -> anyhow::Result<Box<dyn UnitOfWork>> {
        Ok(Box::new(MemoryUnitOfWork::new(self.clone())))
    }
}
