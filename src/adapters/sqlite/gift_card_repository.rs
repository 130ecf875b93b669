//! SQLite implementation of the GiftCardRepository.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{format_sortable, parse_datetime, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{GiftCard, GiftCardStatus, Money};
use crate::domain::ports::GiftCardRepository;

const GIFT_CARD_COLUMNS: &str =
    "id, sender_id, couple_id, event_id, amount_cents, status, expires_at, created_at, updated_at";

#[derive(Clone)]
pub struct SqliteGiftCardRepository {
    pool: SqlitePool,
}

impl SqliteGiftCardRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GiftCardRepository for SqliteGiftCardRepository {
    async fn create(&self, card: &GiftCard) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO gift_cards (id, sender_id, couple_id, event_id, amount_cents, status, expires_at, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(card.id.to_string())
        .bind(card.sender_id.to_string())
        .bind(card.couple_id.to_string())
        .bind(card.event_id.map(|id| id.to_string()))
        .bind(card.amount.cents())
        .bind(card.status.as_str())
        .bind(card.expires_at.as_ref().map(format_sortable))
        .bind(format_sortable(&card.created_at))
        .bind(card.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(|e| event_reference_error(card, e))?;
        Ok(())
    }

    async fn get(&self, id: Uuid) -> DomainResult<Option<GiftCard>> {
        let row: Option<GiftCardRow> =
            sqlx::query_as(&format!("SELECT {GIFT_CARD_COLUMNS} FROM gift_cards WHERE id = ?"))
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(TryInto::try_into).transpose()
    }

    async fn list(&self) -> DomainResult<Vec<GiftCard>> {
        let rows: Vec<GiftCardRow> = sqlx::query_as(&format!(
            "SELECT {GIFT_CARD_COLUMNS} FROM gift_cards ORDER BY created_at DESC, rowid DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn list_by_couple(&self, couple_id: Uuid) -> DomainResult<Vec<GiftCard>> {
        let rows: Vec<GiftCardRow> = sqlx::query_as(&format!(
            "SELECT {GIFT_CARD_COLUMNS} FROM gift_cards WHERE couple_id = ? ORDER BY created_at DESC, rowid DESC"
        ))
        .bind(couple_id.to_string())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }

    async fn update(&self, card: &GiftCard) -> DomainResult<()> {
        let result = sqlx::query(
            r#"UPDATE gift_cards SET event_id = ?, amount_cents = ?, status = ?, expires_at = ?, updated_at = ?
               WHERE id = ?"#,
        )
        .bind(card.event_id.map(|id| id.to_string()))
        .bind(card.amount.cents())
        .bind(card.status.as_str())
        .bind(card.expires_at.as_ref().map(format_sortable))
        .bind(card.updated_at.to_rfc3339())
        .bind(card.id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| event_reference_error(card, e))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::GiftCardNotFound(card.id));
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> DomainResult<()> {
        let result = sqlx::query("DELETE FROM gift_cards WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DomainError::GiftCardNotFound(id));
        }
        Ok(())
    }
}

/// Sender and couple are checked by the service, so a foreign key failure
/// with an event set points at the event.
fn event_reference_error(card: &GiftCard, err: sqlx::Error) -> DomainError {
    match (err, card.event_id) {
        (sqlx::Error::Database(db), Some(event_id)) if db.is_foreign_key_violation() => {
            DomainError::EventNotFound(event_id)
        }
        (other, _) => other.into(),
    }
}

#[derive(sqlx::FromRow)]
struct GiftCardRow {
    id: String,
    sender_id: String,
    couple_id: String,
    event_id: Option<String>,
    amount_cents: i64,
    status: String,
    expires_at: Option<String>,
    created_at: String,
    updated_at: String,
}

impl TryFrom<GiftCardRow> for GiftCard {
    type Error = DomainError;

    fn try_from(row: GiftCardRow) -> Result<Self, Self::Error> {
        let status = GiftCardStatus::from_str(&row.status)
            .ok_or_else(|| DomainError::SerializationError(format!("Invalid gift card status: {}", row.status)))?;

        Ok(GiftCard {
            id: parse_uuid(&row.id)?,
            sender_id: parse_uuid(&row.sender_id)?,
            couple_id: parse_uuid(&row.couple_id)?,
            event_id: row.event_id.as_deref().map(parse_uuid).transpose()?,
            amount: Money::from_cents(row.amount_cents),
            status,
            expires_at: row.expires_at.as_deref().map(parse_datetime).transpose()?,
            created_at: parse_datetime(&row.created_at)?,
            updated_at: parse_datetime(&row.updated_at)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sqlite::{create_migrated_test_pool, SqliteUserRepository};
    use crate::domain::models::{User, UserRole};
    use crate::domain::ports::UserRepository;

    async fn setup() -> (SqliteGiftCardRepository, SqliteUserRepository, User, User) {
        let pool = create_migrated_test_pool().await.unwrap();
        let users = SqliteUserRepository::new(pool.clone());
        let sender = User::new("guest", "guest@example.com", UserRole::Normal);
        let couple = User::new("lina", "lina@example.com", UserRole::Couple);
        users.create(&sender).await.unwrap();
        users.create(&couple).await.unwrap();
        (SqliteGiftCardRepository::new(pool), users, sender, couple)
    }

    #[tokio::test]
    async fn test_gift_card_lifecycle() {
        let (repo, _users, sender, couple) = setup().await;
        let card = GiftCard::new(sender.id, couple.id, Money::from_units(150));
        repo.create(&card).await.unwrap();

        let loaded = repo.get(card.id).await.unwrap().unwrap();
        assert_eq!(loaded.amount, Money::from_units(150));
        assert_eq!(loaded.status, GiftCardStatus::Active);

        let mut expired = loaded;
        expired.status = GiftCardStatus::Expired;
        repo.update(&expired).await.unwrap();
        assert_eq!(repo.get(card.id).await.unwrap().unwrap().status, GiftCardStatus::Expired);

        assert_eq!(repo.list_by_couple(couple.id).await.unwrap().len(), 1);
        assert!(repo.list_by_couple(sender.id).await.unwrap().is_empty());

        repo.delete(card.id).await.unwrap();
        assert!(matches!(repo.delete(card.id).await, Err(DomainError::GiftCardNotFound(_))));
    }

    #[tokio::test]
    async fn test_cards_go_with_their_couple() {
        let (repo, users, sender, couple) = setup().await;
        repo.create(&GiftCard::new(sender.id, couple.id, Money::from_units(20))).await.unwrap();

        users.delete(couple.id).await.unwrap();
        assert!(repo.list().await.unwrap().is_empty());
    }
}
