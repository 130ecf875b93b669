//! Gift cards sent to couples.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{GiftCard, GiftCardStatus, GiftCardUpdate, Money, User, UserRole};
use crate::domain::ports::{GiftCardRepository, UserRepository};

/// Fields for a new gift card. Sender and couple are named by email.
#[derive(Debug, Clone)]
pub struct NewGiftCard {
    pub sender_email: String,
    pub couple_email: String,
    pub amount: Money,
    pub event_id: Option<Uuid>,
    pub expires_at: Option<DateTime<Utc>>,
}

pub struct GiftCardService<G: GiftCardRepository, U: UserRepository> {
    cards: Arc<G>,
    users: Arc<U>,
}

impl<G: GiftCardRepository, U: UserRepository> GiftCardService<G, U> {
    pub fn new(cards: Arc<G>, users: Arc<U>) -> Self {
        Self { cards, users }
    }

    pub async fn create_gift_card(&self, new: NewGiftCard) -> DomainResult<GiftCard> {
        let sender = self.user_by_email(&new.sender_email).await?;
        let couple = self.user_by_email(&new.couple_email).await?;
        if couple.role != UserRole::Couple {
            return Err(DomainError::ValidationFailed(format!(
                "{} is not a couple account",
                couple.email
            )));
        }

        let mut card = GiftCard::new(sender.id, couple.id, new.amount);
        if let Some(event_id) = new.event_id {
            card = card.with_event(event_id);
        }
        if let Some(expires_at) = new.expires_at {
            if expires_at <= card.created_at {
                return Err(DomainError::ValidationFailed("expiry must be in the future".to_string()));
            }
            card = card.with_expiry(expires_at);
        }

        card.validate().map_err(DomainError::ValidationFailed)?;
        self.cards.create(&card).await?;
        info!(gift_card_id = %card.id, amount = %card.amount, "gift card created");
        Ok(card)
    }

    pub async fn get_gift_card(&self, id: Uuid) -> DomainResult<GiftCard> {
        self.cards.get(id).await?.ok_or(DomainError::GiftCardNotFound(id))
    }

    pub async fn list_gift_cards(&self) -> DomainResult<Vec<GiftCard>> {
        self.cards.list().await
    }

    /// Cards addressed to a couple, newest first. Empty when there are none.
    pub async fn list_for_couple(&self, couple_id: Uuid) -> DomainResult<Vec<GiftCard>> {
        if self.users.get(couple_id).await?.is_none() {
            return Err(DomainError::UserNotFound(couple_id));
        }
        self.cards.list_by_couple(couple_id).await
    }

    /// Edit amount, event, expiry or status. Cards cannot be marked redeemed
    /// through an edit.
    pub async fn update_gift_card(&self, id: Uuid, update: GiftCardUpdate) -> DomainResult<GiftCard> {
        if update.status == Some(GiftCardStatus::Redeemed) {
            return Err(DomainError::ValidationFailed(
                "gift cards cannot be marked redeemed".to_string(),
            ));
        }

        let mut card = self.get_gift_card(id).await?;
        if update.is_empty() {
            return Ok(card);
        }
        update.apply(&mut card);
        card.validate().map_err(DomainError::ValidationFailed)?;
        self.cards.update(&card).await?;
        Ok(card)
    }

    pub async fn delete_gift_card(&self, id: Uuid) -> DomainResult<()> {
        self.cards.delete(id).await
    }

    async fn user_by_email(&self, email: &str) -> DomainResult<User> {
        self.users
            .get_by_email(email)
            .await?
            .ok_or_else(|| DomainError::UserEmailNotFound(email.trim().to_lowercase()))
    }
}
