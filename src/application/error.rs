//! Typed errors raised by the discussion engine.
//!
//! Every guard violation carries a stable [`ErrorCode`]. Collaborator
//! failures are wrapped untouched in [`DiscussionError::Store`].

use std::fmt;
use std::str::FromStr;

use http::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category of a guard violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    NotFound,
    InvalidState,
    TenantIsolation,
    AccessDenied,
    ConflictWithChildren,
}

impl ErrorKind {
    /// Status hint for the transport layer.
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::InvalidState => StatusCode::CONFLICT,
            ErrorKind::TenantIsolation => StatusCode::FORBIDDEN,
            ErrorKind::AccessDenied => StatusCode::FORBIDDEN,
            ErrorKind::ConflictWithChildren => StatusCode::CONFLICT,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::NotFound => write!(f, "NOT_FOUND"),
            ErrorKind::InvalidState => write!(f, "INVALID_STATE"),
            ErrorKind::TenantIsolation => write!(f, "TENANT_ISOLATION"),
            ErrorKind::AccessDenied => write!(f, "ACCESS_DENIED"),
            ErrorKind::ConflictWithChildren => write!(f, "CONFLICT_WITH_CHILDREN"),
        }
    }
}

/// Stable error codes. The string form is part of the public contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    UserNotFound,
    QuestionNotFound,
    CommentNotFound,
    LessonMaterialNotFound,

    LessonMaterialNotActive,
    CannotCreateQuestionForPendingLesson,
    QuestionNotActive,
    CommentNotActive,
    InvalidContent,

    UserNotPartOfSchool,
    CannotCreateQuestionForLessonNotInYourSchool,

    InsufficientPermission,
    InsufficientPermissionToCreateQuestion,
    InsufficientPermissionToDeleteQuestion,
    InsufficientPermissionToUpdateQuestion,
    InsufficientPermissionToDeleteComment,
    InsufficientPermissionToUpdateComment,
    CannotCreateQuestionForLessonNotAccessible,
    StudentNotEnrolledInAnyClass,
    TeacherMustHaveActiveClass,
    TeacherNotHaveAccessToMaterial,

    CannotDeleteQuestionWithComments,
    CannotDeleteCommentWithReplies,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 23] = [
        ErrorCode::UserNotFound,
        ErrorCode::QuestionNotFound,
        ErrorCode::CommentNotFound,
        ErrorCode::LessonMaterialNotFound,
        ErrorCode::LessonMaterialNotActive,
        ErrorCode::CannotCreateQuestionForPendingLesson,
        ErrorCode::QuestionNotActive,
        ErrorCode::CommentNotActive,
        ErrorCode::InvalidContent,
        ErrorCode::UserNotPartOfSchool,
        ErrorCode::CannotCreateQuestionForLessonNotInYourSchool,
        ErrorCode::InsufficientPermission,
        ErrorCode::InsufficientPermissionToCreateQuestion,
        ErrorCode::InsufficientPermissionToDeleteQuestion,
        ErrorCode::InsufficientPermissionToUpdateQuestion,
        ErrorCode::InsufficientPermissionToDeleteComment,
        ErrorCode::InsufficientPermissionToUpdateComment,
        ErrorCode::CannotCreateQuestionForLessonNotAccessible,
        ErrorCode::StudentNotEnrolledInAnyClass,
        ErrorCode::TeacherMustHaveActiveClass,
        ErrorCode::TeacherNotHaveAccessToMaterial,
        ErrorCode::CannotDeleteQuestionWithComments,
        ErrorCode::CannotDeleteCommentWithReplies,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::UserNotFound => "UserNotFound",
            ErrorCode::QuestionNotFound => "QuestionNotFound",
            ErrorCode::CommentNotFound => "CommentNotFound",
            ErrorCode::LessonMaterialNotFound => "LessonMaterialNotFound",
            ErrorCode::LessonMaterialNotActive => "LessonMaterialNotActive",
            ErrorCode::CannotCreateQuestionForPendingLesson => {
                "CannotCreateQuestionForPendingLesson"
            }
            ErrorCode::QuestionNotActive => "QuestionNotActive",
            ErrorCode::CommentNotActive => "CommentNotActive",
            ErrorCode::InvalidContent => "InvalidContent",
            ErrorCode::UserNotPartOfSchool => "UserNotPartOfSchool",
            ErrorCode::CannotCreateQuestionForLessonNotInYourSchool => {
                "CannotCreateQuestionForLessonNotInYourSchool"
            }
            ErrorCode::InsufficientPermission => "InsufficientPermission",
            ErrorCode::InsufficientPermissionToCreateQuestion => {
                "InsufficientPermissionToCreateQuestion"
            }
            ErrorCode::InsufficientPermissionToDeleteQuestion => {
                "InsufficientPermissionToDeleteQuestion"
            }
            ErrorCode::InsufficientPermissionToUpdateQuestion => {
                "InsufficientPermissionToUpdateQuestion"
            }
            ErrorCode::InsufficientPermissionToDeleteComment => {
                "InsufficientPermissionToDeleteComment"
            }
            ErrorCode::InsufficientPermissionToUpdateComment => {
                "InsufficientPermissionToUpdateComment"
            }
            ErrorCode::CannotCreateQuestionForLessonNotAccessible => {
                "CannotCreateQuestionForLessonNotAccessible"
            }
            ErrorCode::StudentNotEnrolledInAnyClass => "StudentNotEnrolledInAnyClass",
            ErrorCode::TeacherMustHaveActiveClass => "TeacherMustHaveActiveClass",
            ErrorCode::TeacherNotHaveAccessToMaterial => "TeacherNotHaveAccessToMaterial",
            ErrorCode::CannotDeleteQuestionWithComments => "CannotDeleteQuestionWithComments",
            ErrorCode::CannotDeleteCommentWithReplies => "CannotDeleteCommentWithReplies",
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ErrorCode::UserNotFound
            | ErrorCode::QuestionNotFound
            | ErrorCode::CommentNotFound
            | ErrorCode::LessonMaterialNotFound => ErrorKind::NotFound,
            ErrorCode::LessonMaterialNotActive
            | ErrorCode::CannotCreateQuestionForPendingLesson
            | ErrorCode::QuestionNotActive
            | ErrorCode::CommentNotActive
            | ErrorCode::InvalidContent => ErrorKind::InvalidState,
            ErrorCode::UserNotPartOfSchool
            | ErrorCode::CannotCreateQuestionForLessonNotInYourSchool => {
                ErrorKind::TenantIsolation
            }
            ErrorCode::InsufficientPermission
            | ErrorCode::InsufficientPermissionToCreateQuestion
            | ErrorCode::InsufficientPermissionToDeleteQuestion
            | ErrorCode::InsufficientPermissionToUpdateQuestion
            | ErrorCode::InsufficientPermissionToDeleteComment
            | ErrorCode::InsufficientPermissionToUpdateComment
            | ErrorCode::CannotCreateQuestionForLessonNotAccessible
            | ErrorCode::StudentNotEnrolledInAnyClass
            | ErrorCode::TeacherMustHaveActiveClass
            | ErrorCode::TeacherNotHaveAccessToMaterial => ErrorKind::AccessDenied,
            ErrorCode::CannotDeleteQuestionWithComments
            | ErrorCode::CannotDeleteCommentWithReplies => ErrorKind::ConflictWithChildren,
        }
    }

    fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::UserNotFound => "user not found",
            ErrorCode::QuestionNotFound => "question not found",
            ErrorCode::CommentNotFound => "comment not found",
            ErrorCode::LessonMaterialNotFound => "lesson material not found",
            ErrorCode::LessonMaterialNotActive => "lesson material is not active",
            ErrorCode::CannotCreateQuestionForPendingLesson => {
                "lesson material has not been approved"
            }
            ErrorCode::QuestionNotActive => "question is not active",
            ErrorCode::CommentNotActive => "comment is not active",
            ErrorCode::InvalidContent => "title and content must not be blank",
            ErrorCode::UserNotPartOfSchool => "user is not affiliated with a school",
            ErrorCode::CannotCreateQuestionForLessonNotInYourSchool => {
                "lesson material belongs to another school"
            }
            ErrorCode::InsufficientPermission => "insufficient permission",
            ErrorCode::InsufficientPermissionToCreateQuestion => {
                "insufficient permission to create a question"
            }
            ErrorCode::InsufficientPermissionToDeleteQuestion => {
                "insufficient permission to delete this question"
            }
            ErrorCode::InsufficientPermissionToUpdateQuestion => {
                "insufficient permission to update this question"
            }
            ErrorCode::InsufficientPermissionToDeleteComment => {
                "insufficient permission to delete this comment"
            }
            ErrorCode::InsufficientPermissionToUpdateComment => {
                "insufficient permission to update this comment"
            }
            ErrorCode::CannotCreateQuestionForLessonNotAccessible => {
                "lesson material is not reachable from any of your classes"
            }
            ErrorCode::StudentNotEnrolledInAnyClass => "student is not enrolled in any class",
            ErrorCode::TeacherMustHaveActiveClass => "teacher has no active class",
            ErrorCode::TeacherNotHaveAccessToMaterial => {
                "teacher has no class with access to this material"
            }
            ErrorCode::CannotDeleteQuestionWithComments => {
                "question has comments and cannot be deleted"
            }
            ErrorCode::CannotDeleteCommentWithReplies => {
                "comment has replies and cannot be deleted"
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorCode::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("unknown error code '{s}'"))
    }
}

#[derive(Debug, Error)]
pub enum DiscussionError {
    /// A guard rejected the operation. Nothing was persisted.
    #[error("{code}: {message}")]
    Rule { code: ErrorCode, message: String },

    /// A collaborator (store, role provider, class directory) failed.
    #[error(transparent)]
    Store(#[from] anyhow::Error),

    #[error("operation cancelled")]
    Cancelled,
}

impl DiscussionError {
    pub fn rule(code: ErrorCode) -> Self {
        Self::Rule {
            code,
            message: code.default_message().to_string(),
        }
    }

    pub fn rule_with(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Rule {
            code,
            message: message.into(),
        }
    }

    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Self::Rule { code, .. } => Some(*code),
            _ => None,
        }
    }

    pub fn kind(&self) -> Option<ErrorKind> {
        self.code().map(|c| c.kind())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Rule { code, .. } => code.kind().status(),
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            // 499 is not registered; the connection is usually gone anyway.
            Self::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl From<ErrorCode> for DiscussionError {
    fn from(code: ErrorCode) -> Self {
        Self::rule(code)
    }
}

pub type DiscussionResult<T> = Result<T, DiscussionError>;
