use crate::identity::User;
use crate::CoreResult;
use async_trait::async_trait;
use uuid::Uuid;

/// Repository trait for account data access.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: User) -> CoreResult<()>;

    async fn get(&self, id: Uuid) -> CoreResult<User>;

    async fn find_by_email(&self, email: &str) -> CoreResult<Option<User>>;

    async fn list(&self) -> CoreResult<Vec<User>>;
}
