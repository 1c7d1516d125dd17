use crate::application::ports::notification_port::{
    CommentNotice, NotificationDispatcher, QuestionNotice,
};

#[derive(Debug, Clone)]
pub enum Notice {
    QuestionCreated(QuestionNotice),
    QuestionUpdated(QuestionNotice),
    QuestionDeleted(QuestionNotice),
    CommentCreated(CommentNotice),
    CommentUpdated(CommentNotice),
    CommentDeleted(CommentNotice),
}

impl Notice {
    pub fn event(&self) -> &'static str {
        match self {
            Notice::QuestionCreated(_) => "question_created",
            Notice::QuestionUpdated(_) => "question_updated",
            Notice::QuestionDeleted(_) => "question_deleted",
            Notice::CommentCreated(_) => "comment_created",
            Notice::CommentUpdated(_) => "comment_updated",
            Notice::CommentDeleted(_) => "comment_deleted",
        }
    }
}

/// Best-effort post-commit fan-out. Failures are logged and dropped.
pub async fn dispatch<N>(notifier: &N, notice: &Notice)
where
    N: NotificationDispatcher + ?Sized,
{
    let res = match notice {
        Notice::QuestionCreated(n) => notifier.question_created(n).await,
        Notice::QuestionUpdated(n) => notifier.question_updated(n).await,
        Notice::QuestionDeleted(n) => notifier.question_deleted(n).await,
        Notice::CommentCreated(n) => notifier.comment_created(n).await,
        Notice::CommentUpdated(n) => notifier.comment_updated(n).await,
        Notice::CommentDeleted(n) => notifier.comment_deleted(n).await,
    };
    if let Err(e) = res {
        tracing::warn!(event = notice.event(), error = ?e, "notification_dispatch_failed");
    }
}
