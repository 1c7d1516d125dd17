pub mod comments;
pub mod questions;
pub mod support;
