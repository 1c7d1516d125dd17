//! Removal of a question or comment together with its descendants.
//!
//! The executor runs after the guard has accepted the delete. Descendants are
//! staged one by one ahead of the node they hang off, everything is committed
//! once, and only a successful commit is followed by a notification.

use std::fmt;

use crate::application::context::RequestContext;
use crate::application::error::DiscussionResult;
use crate::application::ports::notification_port::NotificationDispatcher;
use crate::application::ports::unit_of_work::UnitOfWorkFactory;
use crate::application::services::notifier::{self, Notice};
use crate::application::services::transaction::{self, StagedWrite};
use crate::domain::discussions::{Comment, Question};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeState {
    Validated,
    DescendantsRemoved,
    NodeRemoved,
    Committed,
    Notified,
    /// The guard refused the delete; the executor never ran.
    Rejected,
    /// The write failed or the request was cancelled; nothing was committed.
    Aborted,
}

impl fmt::Display for CascadeState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CascadeState::Validated => "validated",
            CascadeState::DescendantsRemoved => "descendants_removed",
            CascadeState::NodeRemoved => "node_removed",
            CascadeState::Committed => "committed",
            CascadeState::Notified => "notified",
            CascadeState::Rejected => "rejected",
            CascadeState::Aborted => "aborted",
        };
        f.write_str(s)
    }
}

/// The node to delete and everything stored beneath it.
#[derive(Debug, Clone, Copy)]
pub enum CascadeTarget<'a> {
    /// A question with every comment and reply it owns.
    Question(&'a Question, &'a [Comment]),
    /// A comment with its replies.
    Comment(&'a Comment, &'a [Comment]),
}

impl CascadeTarget<'_> {
    fn label(&self) -> &'static str {
        match self {
            CascadeTarget::Question(..) => "question",
            CascadeTarget::Comment(..) => "comment",
        }
    }

    fn node_id(&self) -> uuid::Uuid {
        match self {
            CascadeTarget::Question(q, _) => q.id,
            CascadeTarget::Comment(c, _) => c.id,
        }
    }
}

/// Removal order: replies, then top-level comments, then the node.
pub fn plan_removals(target: CascadeTarget<'_>) -> Vec<StagedWrite> {
    match target {
        CascadeTarget::Question(question, comments) => {
            let (replies, top_level): (Vec<&Comment>, Vec<&Comment>) =
                comments.iter().partition(|c| c.is_reply());
            replies
                .into_iter()
                .chain(top_level)
                .map(|c| StagedWrite::RemoveComment(c.id))
                .chain(std::iter::once(StagedWrite::RemoveQuestion(question.id)))
                .collect()
        }
        CascadeTarget::Comment(comment, replies) => replies
            .iter()
            .filter(|r| r.parent_comment_id == Some(comment.id))
            .map(|r| StagedWrite::RemoveComment(r.id))
            .chain(std::iter::once(StagedWrite::RemoveComment(comment.id)))
            .collect(),
    }
}

pub struct CascadeDeletion<'a, W, N>
where
    W: UnitOfWorkFactory + ?Sized,
    N: NotificationDispatcher + ?Sized,
{
    pub uow: &'a W,
    pub notifier: &'a N,
}

impl<'a, W, N> CascadeDeletion<'a, W, N>
where
    W: UnitOfWorkFactory + ?Sized,
    N: NotificationDispatcher + ?Sized,
{
    /// Returns the number of removals staged and committed.
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        target: CascadeTarget<'_>,
        notice: Notice,
    ) -> DiscussionResult<usize> {
        let node_id = target.node_id();
        let kind = target.label();
        trace_state(kind, node_id, CascadeState::Validated);

        let writes = plan_removals(target);
        let removals = writes.len();
        if let Err(e) = transaction::commit_writes(ctx, self.uow, &writes).await {
            tracing::debug!(node = kind, node_id = %node_id, error = %e, "cascade_delete_aborted");
            trace_state(kind, node_id, CascadeState::Aborted);
            return Err(e);
        }
        trace_state(kind, node_id, CascadeState::DescendantsRemoved);
        trace_state(kind, node_id, CascadeState::NodeRemoved);
        trace_state(kind, node_id, CascadeState::Committed);
        tracing::info!(node = kind, node_id = %node_id, removals, "cascade_delete_committed");

        notifier::dispatch(self.notifier, &notice).await;
        trace_state(kind, node_id, CascadeState::Notified);
        Ok(removals)
    }
}

pub(crate) fn trace_state(kind: &'static str, node_id: uuid::Uuid, state: CascadeState) {
    tracing::trace!(node = kind, node_id = %node_id, state = %state, "cascade_state");
}
