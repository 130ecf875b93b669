//! User accounts.

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Caller, User, UserRole, UserUpdate};
use crate::domain::ports::UserRepository;
use crate::services::require_admin;

pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        role: UserRole,
        image: Option<String>,
    ) -> DomainResult<User> {
        let mut user = User::new(username.trim(), email.trim().to_lowercase(), role);
        if let Some(image) = image {
            user = user.with_image(image);
        }
        user.validate().map_err(DomainError::ValidationFailed)?;
        self.repository.create(&user).await?;
        Ok(user)
    }

    pub async fn get_user(&self, id: Uuid) -> DomainResult<User> {
        self.repository.get(id).await?.ok_or(DomainError::UserNotFound(id))
    }

    pub async fn list_users(&self) -> DomainResult<Vec<User>> {
        self.repository.list().await
    }

    /// Update an account. Users may edit themselves; only admins may edit
    /// others or change a role.
    pub async fn update_user(&self, caller: Caller, id: Uuid, update: UserUpdate) -> DomainResult<User> {
        if caller.user_id != id {
            require_admin(caller, "edit other accounts")?;
        }
        if update.role.is_some() {
            require_admin(caller, "change roles")?;
        }

        let mut user = self.get_user(id).await?;
        if update.is_empty() {
            return Ok(user);
        }
        update.apply(&mut user);
        user.validate().map_err(DomainError::ValidationFailed)?;
        self.repository.update(&user).await?;
        Ok(user)
    }

    /// Delete an account with everything it owns. Users may delete
    /// themselves; admins may delete anyone.
    pub async fn delete_user(&self, caller: Caller, id: Uuid) -> DomainResult<()> {
        if caller.user_id != id {
            require_admin(caller, "delete other accounts")?;
        }
        self.repository.delete(id).await?;
        info!(user_id = %id, "user deleted");
        Ok(())
    }

    /// Delete every non-admin account.
    pub async fn delete_all_users(&self, caller: Caller) -> DomainResult<u64> {
        require_admin(caller, "delete all accounts")?;
        let removed = self.repository.delete_non_admins().await?;
        info!(removed, "non-admin users deleted");
        Ok(removed)
    }

    /// Resolve a user id to the identity requests run under.
    pub async fn resolve_caller(&self, id: Uuid) -> DomainResult<Caller> {
        Ok(self.get_user(id).await?.caller())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{create_migrated_test_pool, SqliteUserRepository};

    async fn setup() -> UserService<SqliteUserRepository> {
        let pool = create_migrated_test_pool().await.unwrap();
        UserService::new(Arc::new(SqliteUserRepository::new(pool)))
    }

    #[tokio::test]
    async fn test_create_and_resolve_caller() {
        let service = setup().await;
        let user = service
            .create_user(" lina ", "Lina@Example.com", UserRole::Couple, None)
            .await
            .unwrap();
        assert_eq!(user.username, "lina");
        assert_eq!(user.email, "lina@example.com");

        let caller = service.resolve_caller(user.id).await.unwrap();
        assert_eq!(caller, Caller::new(user.id, UserRole::Couple));
    }

    #[tokio::test]
    async fn test_invalid_email_rejected() {
        let service = setup().await;
        assert!(matches!(
            service.create_user("x", "nope", UserRole::Normal, None).await,
            Err(DomainError::ValidationFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_users_edit_themselves_but_not_their_role() {
        let service = setup().await;
        let lina = service.create_user("lina", "lina@example.com", UserRole::Couple, None).await.unwrap();
        let omar = service.create_user("omar", "omar@example.com", UserRole::Normal, None).await.unwrap();

        let renamed = service
            .update_user(
                lina.caller(),
                lina.id,
                UserUpdate {
                    username: Some("lina k".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.username, "lina k");
        assert_eq!(service.get_user(lina.id).await.unwrap().username, "lina k");

        let promote = UserUpdate {
            role: Some(UserRole::Admin),
            ..Default::default()
        };
        assert!(matches!(
            service.update_user(lina.caller(), lina.id, promote).await,
            Err(DomainError::Forbidden(_))
        ));
        assert!(matches!(
            service.update_user(lina.caller(), omar.id, UserUpdate::default()).await,
            Err(DomainError::Forbidden(_))
        ));

        let bad_email = UserUpdate {
            email: Some("nope".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            service.update_user(lina.caller(), lina.id, bad_email).await,
            Err(DomainError::ValidationFailed(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_rules() {
        let service = setup().await;
        let admin = service.create_user("root", "root@example.com", UserRole::Admin, None).await.unwrap();
        let lina = service.create_user("lina", "lina@example.com", UserRole::Couple, None).await.unwrap();
        let omar = service.create_user("omar", "omar@example.com", UserRole::Normal, None).await.unwrap();

        assert!(matches!(
            service.delete_user(lina.caller(), omar.id).await,
            Err(DomainError::Forbidden(_))
        ));
        assert!(matches!(
            service.delete_all_users(lina.caller()).await,
            Err(DomainError::Forbidden(_))
        ));

        service.delete_user(lina.caller(), lina.id).await.unwrap();
        assert!(matches!(service.get_user(lina.id).await, Err(DomainError::UserNotFound(_))));

        assert_eq!(service.delete_all_users(admin.caller()).await.unwrap(), 1);
        let remaining: Vec<_> = service.list_users().await.unwrap().into_iter().map(|u| u.id).collect();
        assert_eq!(remaining, vec![admin.id]);
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let service = setup().await;
        assert!(matches!(
            service.resolve_caller(Uuid::new_v4()).await,
            Err(DomainError::UserNotFound(_))
        ));
    }
}
