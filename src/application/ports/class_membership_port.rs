use async_trait::async_trait;
use uuid::Uuid;

pub type ClassId = Uuid;

/// Class enrollment, class ownership and folder placement lookups.
#[async_trait]
pub trait ClassMembershipPort: Send + Sync {
    async fn classes_for_student(&self, student_id: Uuid) -> anyhow::Result<Vec<ClassId>>;

    /// Classes owned by the teacher whose status is active.
    async fn active_classes_for_teacher(&self, teacher_id: Uuid) -> anyhow::Result<Vec<ClassId>>;

    async fn teacher_has_active_class(&self, teacher_id: Uuid) -> anyhow::Result<bool>;

    async fn teacher_has_access_to_material(
        &self,
        teacher_id: Uuid,
        material_id: Uuid,
    ) -> anyhow::Result<bool>;

    /// Direct access: one of the student's classes was granted the material.
    async fn has_access_to_material(
        &self,
        student_id: Uuid,
        material_id: Uuid,
    ) -> anyhow::Result<bool>;

    /// Indirect access: the material sits in a folder of one of the student's classes.
    async fn material_in_student_folders(
        &self,
        student_id: Uuid,
        material_id: Uuid,
    ) -> anyhow::Result<bool>;

    async fn is_enrolled_in_any_class(&self, student_id: Uuid) -> anyhow::Result<bool>;
}
