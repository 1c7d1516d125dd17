pub mod class_membership_port;
pub mod clock;
pub mod comment_repository;
pub mod content_item_repository;
pub mod notification_port;
pub mod question_repository;
pub mod role_provider;
pub mod unit_of_work;
pub mod user_repository;
