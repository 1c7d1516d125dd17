pub mod create_comment;
pub mod delete_comment;
pub mod get_comments;
pub mod update_comment;
