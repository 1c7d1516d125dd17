use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::role::Role;

pub type SchoolId = i64;

/// Identity record as stored by the user directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub school_id: Option<SchoolId>,
}

/// A user together with the role it resolved to for the current request.
#[derive(Debug, Clone)]
pub struct Actor {
    pub user: User,
    pub role: Role,
}

impl Actor {
    pub fn new(user: User, role: Role) -> Self {
        Self { user, role }
    }

    pub fn id(&self) -> Uuid {
        self.user.id
    }

    pub fn school_id(&self) -> Option<SchoolId> {
        self.user.school_id
    }

    pub fn is(&self, user_id: Uuid) -> bool {
        self.user.id == user_id
    }

    /// Both sides must be affiliated with a school, and with the same one.
    pub fn shares_school_with(&self, other: Option<SchoolId>) -> bool {
        matches!((self.user.school_id, other), (Some(a), Some(b)) if a == b)
    }
}
