pub mod broadcast;

pub use broadcast::{BroadcastNotificationDispatcher, DiscussionEvent};
