pub mod content_item;

pub use content_item::{ContentItem, Visibility};
