use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::status::ActivationStatus;

/// Flat comment record. `parent_comment_id` set means this is a reply to a
/// top-level comment of the same question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub question_id: Uuid,
    pub parent_comment_id: Option<Uuid>,
    pub created_by: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub last_modified_at: Option<DateTime<Utc>>,
    pub status: ActivationStatus,
}

impl Comment {
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }

    pub fn is_reply(&self) -> bool {
        self.parent_comment_id.is_some()
    }
}
