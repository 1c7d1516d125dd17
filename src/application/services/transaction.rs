use uuid::Uuid;

use crate::application::context::RequestContext;
use crate::application::error::{DiscussionError, DiscussionResult};
use crate::application::ports::unit_of_work::{UnitOfWork, UnitOfWorkFactory};
use crate::domain::discussions::{Comment, Question};

/// One write to stage inside a unit of work.
#[derive(Debug, Clone)]
pub enum StagedWrite {
    AddQuestion(Question),
    UpdateQuestion(Question),
    RemoveQuestion(Uuid),
    AddComment(Comment),
    UpdateComment(Comment),
    RemoveComment(Uuid),
}

impl StagedWrite {
    pub fn is_removal(&self) -> bool {
        matches!(
            self,
            StagedWrite::RemoveQuestion(_) | StagedWrite::RemoveComment(_)
        )
    }
}

/// Stages `writes` in order and commits them once.
///
/// A failed or cancelled staging step rolls the unit of work back and nothing
/// becomes visible. Cancellation is checked one last time right before the
/// commit; once the commit has been issued it runs to completion.
pub async fn commit_writes<W>(
    ctx: &RequestContext,
    factory: &W,
    writes: &[StagedWrite],
) -> DiscussionResult<u64>
where
    W: UnitOfWorkFactory + ?Sized,
{
    let mut uow = ctx.step(factory.begin()).await?;
    let staged = stage(ctx, uow.as_mut(), writes)
        .await
        .and_then(|()| ctx.ensure_active());
    if let Err(e) = staged {
        rollback(uow, &e).await;
        return Err(e);
    }
    let rows = uow.commit().await.map_err(DiscussionError::Store)?;
    tracing::debug!(writes = writes.len(), rows, "unit_of_work_committed");
    Ok(rows)
}

async fn stage(
    ctx: &RequestContext,
    uow: &mut dyn UnitOfWork,
    writes: &[StagedWrite],
) -> DiscussionResult<()> {
    for write in writes {
        match write {
            StagedWrite::AddQuestion(q) => ctx.step(uow.add_question(q)).await?,
            StagedWrite::UpdateQuestion(q) => ctx.step(uow.update_question(q)).await?,
            StagedWrite::RemoveQuestion(id) => ctx.step(uow.remove_question(*id)).await?,
            StagedWrite::AddComment(c) => ctx.step(uow.add_comment(c)).await?,
            StagedWrite::UpdateComment(c) => ctx.step(uow.update_comment(c)).await?,
            StagedWrite::RemoveComment(id) => ctx.step(uow.remove_comment(*id)).await?,
        }
    }
    Ok(())
}

async fn rollback(uow: Box<dyn UnitOfWork>, cause: &DiscussionError) {
    match uow.rollback().await {
        Ok(()) => tracing::debug!(cause = %cause, "unit_of_work_rolled_back"),
        Err(e) => tracing::warn!(cause = %cause, error = ?e, "unit_of_work_rollback_failed"),
    }
}
