use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::discussions::{Comment, Question};
use crate::domain::status::ActivationStatus;
use crate::domain::users::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionResponse {
    pub id: Uuid,
    pub content_item_id: Uuid,
    pub title: String,
    pub content: String,
    pub created_by: Uuid,
    pub creator_role: Role,
    pub created_at: DateTime<Utc>,
    pub last_modified_at: Option<DateTime<Utc>>,
    pub status: ActivationStatus,
    /// Top-level comments plus every reply.
    pub comment_count: u64,
    pub can_update: bool,
    pub can_delete: bool,
}

impl QuestionResponse {
    pub fn from_question(question: &Question, creator_role: Role) -> Self {
        Self {
            id: question.id,
            content_item_id: question.content_item_id,
            title: question.title.clone(),
            content: question.content.clone(),
            created_by: question.created_by,
            creator_role,
            created_at: question.created_at,
            last_modified_at: question.last_modified_at,
            status: question.status,
            comment_count: 0,
            can_update: false,
            can_delete: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub question_id: Uuid,
    pub parent_comment_id: Option<Uuid>,
    pub content: String,
    pub created_by: Uuid,
    pub creator_role: Role,
    pub created_at: DateTime<Utc>,
    pub last_modified_at: Option<DateTime<Utc>>,
    pub reply_count: u64,
    pub can_update: bool,
    pub can_delete: bool,
    /// Always empty on reply nodes.
    pub replies: Vec<CommentResponse>,
}

impl CommentResponse {
    pub fn from_comment(comment: &Comment, creator_role: Role) -> Self {
        Self {
            id: comment.id,
            question_id: comment.question_id,
            parent_comment_id: comment.parent_comment_id,
            content: comment.content.clone(),
            created_by: comment.created_by,
            creator_role,
            created_at: comment.created_at,
            last_modified_at: comment.last_modified_at,
            reply_count: 0,
            can_update: false,
            can_delete: false,
            replies: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentTree {
    pub comments: Vec<CommentResponse>,
    pub comment_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionDetail {
    pub question: QuestionResponse,
    pub comments: Vec<CommentResponse>,
}
