use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::status::ActivationStatus;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: Uuid,
    pub content_item_id: Uuid,
    pub created_by: Uuid,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub last_modified_at: Option<DateTime<Utc>>,
    pub status: ActivationStatus,
}

impl Question {
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}
