use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::status::{ActivationStatus, ApprovalStatus};
use crate::domain::users::SchoolId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    SchoolWide,
    ClassRestricted,
    Private,
}

/// Lesson material that questions are asked about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: Uuid,
    pub title: String,
    pub school_id: Option<SchoolId>,
    pub status: ActivationStatus,
    pub approval: ApprovalStatus,
    pub visibility: Visibility,
    pub created_by: Uuid,
}

impl ContentItem {
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn is_approved(&self) -> bool {
        matches!(self.approval, ApprovalStatus::Approved)
    }

    /// An item without a school is not bound to any tenant.
    pub fn belongs_to_school(&self, school_id: Option<SchoolId>) -> bool {
        match self.school_id {
            None => true,
            Some(own) => school_id == Some(own),
        }
    }
}
