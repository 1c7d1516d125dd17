use std::collections::HashSet;

use uuid::Uuid;

use crate::application::context::RequestContext;
use crate::application::error::DiscussionResult;
use crate::application::ports::class_membership_port::ClassMembershipPort;

/// Derives a teacher's moderation authority over a student from the classes
/// they have in common.
pub struct RelationshipResolver<'a, C: ClassMembershipPort + ?Sized> {
    pub classes: &'a C,
}

impl<'a, C: ClassMembershipPort + ?Sized> RelationshipResolver<'a, C> {
    pub async fn teacher_owns_authority_over_student(
        &self,
        ctx: &RequestContext,
        teacher_id: Uuid,
        student_id: Uuid,
    ) -> DiscussionResult<bool> {
        let owned: HashSet<Uuid> = ctx
            .step(self.classes.active_classes_for_teacher(teacher_id))
            .await?
            .into_iter()
            .collect();
        // No active class, no authority; enrollment is not even looked at.
        if owned.is_empty() {
            return Ok(false);
        }
        let enrolled = ctx
            .step(self.classes.classes_for_student(student_id))
            .await?;
        Ok(enrolled.iter().any(|class_id| owned.contains(class_id)))
    }
}
