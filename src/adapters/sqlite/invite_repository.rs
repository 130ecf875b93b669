//! SQLite implementation of the InviteRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{parse_datetime, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Invite, RsvpStatus};
use crate::domain::ports::InviteRepository;

const INVITE_COLUMNS: &str =
    "id, event_id, guest_name, guest_email, rsvp_status, token, template_id, created_at, updated_at";

#[derive(Clone)]
pub struct SqliteInviteRepository {
    pool: SqlitePool,
}

impl SqliteInviteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Map constraint failures on write to the domain errors they stand for.
    /// SQLite does not name the failing foreign key; the template is checked
    /// by the service before writing, so a violation here means the event.
    fn write_error(invite: &Invite, err: sqlx::Error) -> DomainError {
        match err {
            sqlx::Error::Database(db) if db.is_unique_violation() => DomainError::DuplicateInvite {
                event_id: invite.event_id,
                guest_email: invite.guest_email.clone(),
            },
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => DomainError::EventNotFound(invite.event_id),
            other => other.into(),
        }
    }
}

#[async_trait]
impl InviteRepository for SqliteInviteRepository {
    async fn create(&self, invite: &Invite) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO invites (id, event_id, guest_name, guest_email, rsvp_status, token, template_id, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(invite.id.to_string())
        .bind(invite.event_id.to_string())
        .bind(&invite.guest_name)
        .bind(&invite.guest_email)
        .bind(invite.rsvp_status.as_str())
        .bind(&invite.token)
        .bind(invite.template_id.map(|id| id.to_string()))
        .bind(invite.created_at.to_rfc3339())
        .bind(invite.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| Self::write_error(invite, e))?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<Invite>> {
        let row: Option<InviteRow> = sqlx::query_as(&format!("SELECT {INVITE_COLUMNS} FROM invites WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn get_by_token(&self, token: &str) -> DomainResult<Option<Invite>> {
        let row: Option<InviteRow> =
            sqlx::query_as(&format!("SELECT {INVITE_COLUMNS} FROM invites WHERE token = ?"))
                .bind(token.trim())
                .fetch_optional(&self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list(&self) -> DomainResult<Vec<Invite>> {
        let rows: Vec<InviteRow> =
            sqlx::query_as(&format!("SELECT {INVITE_COLUMNS} FROM invites ORDER BY created_at, rowid"))
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn list_by_event(&self, event_id: Uuid) -> DomainResult<Vec<Invite>> {
        let rows: Vec<InviteRow> = sqlx::query_as(&format!(
            "SELECT {INVITE_COLUMNS} FROM invites WHERE event_id = ? ORDER BY created_at, rowid"
        ))
        .bind(event_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn update(&self, invite: &Invite) -> DomainResult<()> {
        let result = sqlx::query(
            r#"UPDATE invites SET guest_name = ?, guest_email = ?, rsvp_status = ?, template_id = ?, updated_at = ?
               WHERE id = ?"#,
        )
        .bind(&invite.guest_name)
        .bind(&invite.guest_email)
        .bind(invite.rsvp_status.as_str())
        .bind(invite.template_id.map(|id| id.to_string()))
        .bind(invite.updated_at.to_rfc3339())
        .bind(invite.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| Self::write_error(invite, e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::InviteNotFound(invite.id));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM invites WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::InviteNotFound(id));
        }
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct InviteRow {
    id: String,
    event_id: String,
    guest_name: String,
    guest_email: String,
    rsvp_status: String,
    token: String,
    template_id: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<InviteRow> for Invite {
    type Error = DomainError;

    fn try_from(row: InviteRow) -> Result<Self, Self::Error> {
        let rsvp_status = RsvpStatus::from_str(&row.rsvp_status)
            .ok_or_else(|| DomainError::SerializationError(format!("Invalid RSVP status: {}", row.rsvp_status)))?;

        Ok(Invite {
            id: parse_uuid(&row.id)?,
            event_id: parse_uuid(&row.event_id)?,
            guest_name: row.guest_name,
            guest_email: row.guest_email,
            rsvp_status,
            token: row.token,
            template_id: row.template_id.as_deref().map(parse_uuid).transpose()?,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
        })
    }
}
