//! Wiring shared by the commands that talk to the database.

use anyhow::{bail, Context, Result};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;

use crate::adapters::oracle::build_oracle;
use crate::adapters::sqlite::{
    initialize_from_config, SqliteCategoryRepository, SqliteEventRepository, SqliteGiftCardRepository,
    SqliteInviteRepository, SqliteInviteTemplateRepository, SqliteNotificationRepository, SqliteServiceRepository,
    SqliteUserRepository, SqliteVendorRepository,
};
use crate::cli::id_resolver::resolve_user_id;
use crate::domain::models::{Caller, Config};
use crate::services::{
    CatalogService, EventService, GiftCardService, InviteService, NotificationService, SuggestionService,
    UserService,
};

pub type SqliteCatalogService =
    CatalogService<SqliteServiceRepository, SqliteCategoryRepository, SqliteVendorRepository, SqliteUserRepository>;
pub type SqliteSuggestionService = SuggestionService<SqliteEventRepository, SqliteServiceRepository>;
pub type SqliteInviteService =
    InviteService<SqliteInviteRepository, SqliteInviteTemplateRepository, SqliteEventRepository>;
pub type SqliteNotificationService =
    NotificationService<SqliteNotificationRepository, SqliteUserRepository, SqliteVendorRepository>;

/// Open database plus the settings needed to build services on demand.
pub struct AppContext {
    pub config: Config,
    pub pool: SqlitePool,
    acting_user: Option<String>,
}

impl AppContext {
    /// Open (and migrate) the configured database.
    pub async fn open(config: Config, acting_user: Option<String>) -> Result<Self> {
        let pool = initialize_from_config(&config.database)
            .await
            .context("Failed to initialize database. Run 'planora init' first.")?;
        Ok(Self {
            config,
            pool,
            acting_user,
        })
    }

    pub fn users(&self) -> UserService<SqliteUserRepository> {
        UserService::new(Arc::new(SqliteUserRepository::new(self.pool.clone())))
    }

    pub fn catalog(&self) -> SqliteCatalogService {
        CatalogService::new(
            Arc::new(SqliteServiceRepository::new(self.pool.clone())),
            Arc::new(SqliteCategoryRepository::new(self.pool.clone())),
            Arc::new(SqliteVendorRepository::new(self.pool.clone())),
            Arc::new(SqliteUserRepository::new(self.pool.clone())),
        )
    }

    pub fn events(&self) -> EventService<SqliteEventRepository> {
        EventService::new(Arc::new(SqliteEventRepository::new(self.pool.clone())))
    }

    pub fn suggestions(&self) -> SqliteSuggestionService {
        SuggestionService::new(
            Arc::new(SqliteEventRepository::new(self.pool.clone())),
            Arc::new(SqliteServiceRepository::new(self.pool.clone())),
            build_oracle(&self.config.oracle),
            self.config.selection,
            Duration::from_secs(self.config.oracle.timeout_secs),
        )
    }

    pub fn invites(&self) -> SqliteInviteService {
        InviteService::new(
            Arc::new(SqliteInviteRepository::new(self.pool.clone())),
            Arc::new(SqliteInviteTemplateRepository::new(self.pool.clone())),
            Arc::new(SqliteEventRepository::new(self.pool.clone())),
        )
    }

    pub fn gift_cards(&self) -> GiftCardService<SqliteGiftCardRepository, SqliteUserRepository> {
        GiftCardService::new(
            Arc::new(SqliteGiftCardRepository::new(self.pool.clone())),
            Arc::new(SqliteUserRepository::new(self.pool.clone())),
        )
    }

    pub fn notifications(&self) -> SqliteNotificationService {
        NotificationService::new(
            Arc::new(SqliteNotificationRepository::new(self.pool.clone())),
            Arc::new(SqliteUserRepository::new(self.pool.clone())),
            Arc::new(SqliteVendorRepository::new(self.pool.clone())),
        )
    }

    /// Identity for commands that act on behalf of a user (`--as`).
    pub async fn caller(&self) -> Result<Caller> {
        let Some(prefix) = self.acting_user.as_deref() else {
            bail!("This command needs a user. Pass --as <user-id> or set PLANORA_USER.");
        };
        let user_id = resolve_user_id(&self.pool, prefix).await?;
        Ok(self.users().resolve_caller(user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{OracleProvider, UserRole};

    async fn open(dir: &tempfile::TempDir, acting_user: Option<String>) -> AppContext {
        let mut config = Config::default();
        config.database.path = dir.path().join("planora.db").display().to_string();
        config.oracle.provider = OracleProvider::Disabled;
        AppContext::open(config, acting_user).await.unwrap()
    }

    #[tokio::test]
    async fn test_caller_requires_acting_user() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = open(&dir, None).await;
        let err = ctx.caller().await.unwrap_err();
        assert!(err.to_string().contains("--as"));
    }

    #[tokio::test]
    async fn test_caller_resolves_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let setup = open(&dir, None).await;
        let user = setup
            .users()
            .create_user("huda", "huda@example.com", UserRole::Couple, None)
            .await
            .unwrap();
        setup.pool.close().await;

        let ctx = open(&dir, Some(user.id.to_string()[..8].to_string())).await;
        let caller = ctx.caller().await.unwrap();
        assert_eq!(caller, user.caller());
    }
}
