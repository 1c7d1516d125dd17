pub mod cascade_delete;
pub mod comment_tree;
pub mod notifier;
pub mod transaction;
pub mod visibility;
