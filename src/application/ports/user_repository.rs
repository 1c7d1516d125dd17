use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::users::User;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>>;
}
