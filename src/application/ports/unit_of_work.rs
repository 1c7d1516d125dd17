use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::discussions::{Comment, Question};

/// Staged writes against the discussion store. Nothing is visible to other
/// readers until `commit`; dropping or rolling back discards every change.
#[async_trait]
pub trait UnitOfWork: Send {
    async fn add_question(&mut self, question: &Question) -> anyhow::Result<()>;
    async fn update_question(&mut self, question: &Question) -> anyhow::Result<()>;
    async fn remove_question(&mut self, id: Uuid) -> anyhow::Result<()>;

    async fn add_comment(&mut self, comment: &Comment) -> anyhow::Result<()>;
    async fn update_comment(&mut self, comment: &Comment) -> anyhow::Result<()>;
    async fn remove_comment(&mut self, id: Uuid) -> anyhow::Result<()>;

    /// Returns the number of rows affected.
    async fn commit(self: Box<Self>) -> anyhow::Result<u64>;
    async fn rollback(self: Box<Self>) -> anyhow::Result<()>;
}

#[async_trait]
pub trait UnitOfWorkFactory: Send + Sync {
    async fn begin(&self) -> anyhow::Result<Box<dyn UnitOfWork>>;
}
