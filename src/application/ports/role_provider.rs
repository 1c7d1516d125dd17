use async_trait::async_trait;
use uuid::Uuid;

/// Identity-side role storage. Returns raw labels; resolution to a single
/// role happens in the domain.
#[async_trait]
pub trait RoleProvider: Send + Sync {
    async fn roles_for(&self, user_id: Uuid) -> anyhow::Result<Vec<String>>;
}
