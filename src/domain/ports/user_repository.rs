//! User repository port.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::errors::DomainResult;
use crate::domain::models::User;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> DomainResult<()>;

    async fn get(&self, id: Uuid) -> DomainResult<Option<User>>;

    /// Look up a user by normalized email.
    async fn get_by_email(&self, email: &str) -> DomainResult<Option<User>>;

    async fn list(&self) -> DomainResult<Vec<User>>;

    async fn update(&self, user: &User) -> DomainResult<()>;

    async fn delete(&self, id: Uuid) -> DomainResult<()>;

    /// Delete every account except admins. Returns the number removed.
    async fn delete_non_admins(&self) -> DomainResult<u64>;
}
