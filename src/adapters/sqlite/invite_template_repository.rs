//! SQLite implementation of the InviteTemplateRepository.
//!
//! Tags are kept as a JSON array in a single text column.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{parse_datetime, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::InviteTemplate;
use crate::domain::ports::InviteTemplateRepository;

const TEMPLATE_COLUMNS: &str = "id, background, event_id, title, subtitle, tags, created_at, updated_at";

#[derive(Clone)]
pub struct SqliteInviteTemplateRepository {
    pool: SqlitePool,
}

impl SqliteInviteTemplateRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InviteTemplateRepository for SqliteInviteTemplateRepository {
    async fn create(&self, template: &InviteTemplate) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO invite_templates (id, background, event_id, title, subtitle, tags, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(template.id.to_string())
        .bind(&template.background)
        .bind(template.event_id.map(|id| id.to_string()))
        .bind(&template.title)
        .bind(&template.subtitle)
        .bind(serde_json::to_string(&template.tags)?)
        .bind(template.created_at.to_rfc3339())
        .bind(template.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| match (e, template.event_id) {
            (sqlx::Error::Database(db), Some(event_id)) if db.is_foreign_key_violation() => {
                DomainError::EventNotFound(event_id)
            }
            (other, _) => other.into(),
        })?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<InviteTemplate>> {
        let row: Option<TemplateRow> =
            sqlx::query_as(&format!("SELECT {TEMPLATE_COLUMNS} FROM invite_templates WHERE id = ?"))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn first(&self) -> DomainResult<Option<InviteTemplate>> {
        let row: Option<TemplateRow> = sqlx::query_as(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM invite_templates ORDER BY created_at, rowid LIMIT 1"
        ))
        .fetch_optional(&self.pool)
        .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list(&self) -> DomainResult<Vec<InviteTemplate>> {
        let rows: Vec<TemplateRow> = sqlx::query_as(&format!(
            "SELECT {TEMPLATE_COLUMNS} FROM invite_templates ORDER BY created_at, rowid"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn update(&self, template: &InviteTemplate) -> DomainResult<()> {
        let result = sqlx::query(
            r#"UPDATE invite_templates SET background = ?, event_id = ?, title = ?, subtitle = ?, tags = ?, updated_at = ?
               WHERE id = ?"#,
        )
        .bind(&template.background)
        .bind(template.event_id.map(|id| id.to_string()))
        .bind(&template.title)
        .bind(&template.subtitle)
        .bind(serde_json::to_string(&template.tags)?)
        .bind(template.updated_at.to_rfc3339())
        .bind(template.id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::InviteTemplateNotFound(template.id));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM invite_templates WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::InviteTemplateNotFound(id));
        }
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct TemplateRow {
    id: String,
    background: String,
    event_id: Option<String>,
    title: Option<String>,
    subtitle: Option<String>,
    tags: String,
    created_at: String,
    updated_at: String,
}

impl TryFrom<TemplateRow> for InviteTemplate {
    type Error = DomainError;

    fn try_from(row: TemplateRow) -> Result<Self, Self::Error> {
        Ok(InviteTemplate {
            id: parse_uuid(&row.id)?,
            background: row.background,
            event_id: row.event_id.as_deref().map(parse_uuid).transpose()?,
            title: row.title,
            subtitle: row.subtitle,
            tags: serde_json::from_str(&row.tags)?,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
        })
    }
}
