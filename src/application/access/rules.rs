//! Ownership and moderation rules shared by the guard and the comment tree.
//!
//! Everything here is pure: callers gather the facts (child counts, creator
//! role and school, teacher authority) and these functions decide.

use uuid::Uuid;

use crate::application::error::ErrorCode;
use crate::domain::users::{Actor, Role, SchoolId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    Question,
    Comment,
}

impl Subject {
    fn update_denied(&self) -> ErrorCode {
        match self {
            Subject::Question => ErrorCode::InsufficientPermissionToUpdateQuestion,
            Subject::Comment => ErrorCode::InsufficientPermissionToUpdateComment,
        }
    }

    fn delete_denied(&self) -> ErrorCode {
        match self {
            Subject::Question => ErrorCode::InsufficientPermissionToDeleteQuestion,
            Subject::Comment => ErrorCode::InsufficientPermissionToDeleteComment,
        }
    }

    fn has_children(&self) -> ErrorCode {
        match self {
            Subject::Question => ErrorCode::CannotDeleteQuestionWithComments,
            Subject::Comment => ErrorCode::CannotDeleteCommentWithReplies,
        }
    }
}

/// A question or comment as seen by the ownership rules.
#[derive(Debug, Clone, Copy)]
pub struct OwnedNode {
    pub subject: Subject,
    pub created_by: Uuid,
    /// Active comments of a question, or active replies of a comment.
    pub active_children: u64,
}

/// What the delete rule needs to know about the author of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatorFacts {
    pub role: Role,
    pub school_id: Option<SchoolId>,
    /// Whether the acting teacher shares an active class with the creator.
    pub under_actor_authority: bool,
}

impl CreatorFacts {
    pub fn unknown() -> Self {
        Self {
            role: Role::Unknown,
            school_id: None,
            under_actor_authority: false,
        }
    }
}

pub fn can_update(actor: &Actor, node: &OwnedNode) -> Result<(), ErrorCode> {
    if actor.role == Role::SystemAdmin || actor.is(node.created_by) {
        Ok(())
    } else {
        Err(node.subject.update_denied())
    }
}

/// Whether the delete decision depends on facts about the creator.
pub fn needs_creator_facts(actor: &Actor, node: &OwnedNode) -> bool {
    !(actor.role == Role::SystemAdmin
        || student_blocked_by_children(actor, node)
        || actor.is(node.created_by))
}

/// Whether the acting staff member may moderate the creator given its role
/// and school; teacher authority is only worth resolving when this holds.
pub fn staff_may_moderate(actor: &Actor, creator_role: Role, creator_school: Option<SchoolId>) -> bool {
    actor.role.is_staff() && creator_role == Role::Student && actor.shares_school_with(creator_school)
}

pub fn can_delete(
    actor: &Actor,
    node: &OwnedNode,
    creator: Option<&CreatorFacts>,
) -> Result<(), ErrorCode> {
    if actor.role == Role::SystemAdmin {
        return Ok(());
    }
    if student_blocked_by_children(actor, node) {
        return Err(node.subject.has_children());
    }
    if actor.is(node.created_by) {
        return Ok(());
    }
    let Some(creator) = creator else {
        return Err(node.subject.delete_denied());
    };
    let allowed = match actor.role {
        Role::SchoolAdmin => actor.shares_school_with(creator.school_id),
        Role::Teacher | Role::ContentModerator => {
            staff_may_moderate(actor, creator.role, creator.school_id)
                && creator.under_actor_authority
        }
        Role::SystemAdmin | Role::Student | Role::Unknown => false,
    };
    if allowed {
        Ok(())
    } else {
        Err(node.subject.delete_denied())
    }
}

fn student_blocked_by_children(actor: &Actor, node: &OwnedNode) -> bool {
    actor.role == Role::Student && node.active_children > 0
}
