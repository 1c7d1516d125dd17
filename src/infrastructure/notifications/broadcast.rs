use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::broadcast;

use crate::application::ports::notification_port::{
    CommentNotice, NotificationDispatcher, QuestionNotice,
};

/// What subscribers of the broadcast dispatcher receive.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum DiscussionEvent {
    QuestionCreated(QuestionNotice),
    QuestionUpdated(QuestionNotice),
    QuestionDeleted(QuestionNotice),
    CommentCreated(CommentNotice),
    CommentUpdated(CommentNotice),
    CommentDeleted(CommentNotice),
}

#[derive(Clone)]
pub struct BroadcastNotificationDispatcher {
    sender: broadcast::Sender<DiscussionEvent>,
}

impl BroadcastNotificationDispatcher {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DiscussionEvent> {
        self.sender.subscribe()
    }

    fn publish(&self, event: DiscussionEvent) -> anyhow::Result<()> {
        match self.sender.send(event) {
            Ok(_) => Ok(()),
            // Nobody listening is not a failure.
            Err(broadcast::error::SendError(_)) => Ok(()),
        }
    }
}

#[async_trait]
impl NotificationDispatcher for BroadcastNotificationDispatcher {
    async fn question_created(&self, notice: &QuestionNotice) -> anyhow::Result<()> {
        self.publish(DiscussionEvent::QuestionCreated(notice.clone()))
    }

    async fn question_updated(&self, notice: &QuestionNotice) -> anyhow::Result<()> {
        self.publish(DiscussionEvent::QuestionUpdated(notice.clone()))
    }

    async fn question_deleted(&self, notice: &QuestionNotice) -> anyhow::Result<()> {
        self.publish(DiscussionEvent::QuestionDeleted(notice.clone()))
    }

    async fn comment_created(&self, notice: &CommentNotice) -> anyhow::Result<()> {
        self.publish(DiscussionEvent::CommentCreated(notice.clone()))
    }

    async fn comment_updated(&self, notice: &CommentNotice) -> anyhow::Result<()> {
        self.publish(DiscussionEvent::CommentUpdated(notice.clone()))
    }

    async fn comment_deleted(&self, notice: &CommentNotice) -> anyhow::Result<()> {
        self.publish(DiscussionEvent::CommentDeleted(notice.clone()))
    }
}
