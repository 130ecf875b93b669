//! A couple's event from the guests' side: invites and answers, gift cards
//! and vendor notifications, and what survives deleting the event.

mod common;

use std::sync::Arc;

use common::Marketplace;
use planora::adapters::sqlite::{
    SqliteGiftCardRepository, SqliteInviteRepository, SqliteInviteTemplateRepository, SqliteNotificationRepository,
    SqliteUserRepository, SqliteVendorRepository,
};
use planora::domain::errors::DomainError;
use planora::domain::models::{Money, NotificationKind, RsvpStatus, User, UserRole};
use planora::domain::ports::UserRepository;
use planora::services::{
    EventService, GiftCardService, InviteService, NewGiftCard, NewInviteTemplate, NotificationService,
};

#[tokio::test]
async fn test_guests_answer_and_gifts_outlive_the_event() {
    let market = Marketplace::in_memory().await;
    let event = market.event(3000).await;
    let host = market.planner.caller();

    let users = Arc::new(SqliteUserRepository::new(market.pool.clone()));
    let guest = User::new("sami", "sami@example.com", UserRole::Normal);
    users.create(&guest).await.unwrap();

    let invites = InviteService::new(
        Arc::new(SqliteInviteRepository::new(market.pool.clone())),
        Arc::new(SqliteInviteTemplateRepository::new(market.pool.clone())),
        market.events.clone(),
    );
    let template = invites
        .create_template(NewInviteTemplate {
            background: "olive.png".to_string(),
            event_id: Some(event.id),
            title: Some("Noor & Sami".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let sami = invites
        .create_invite(host, event.id, "Sami", "sami@example.com", None)
        .await
        .unwrap();
    let reem = invites
        .create_invite(host, event.id, "Reem", "reem@example.com", None)
        .await
        .unwrap();
    assert_eq!(sami.template_id, Some(template.id));

    invites.respond(&sami.token, RsvpStatus::Attending).await.unwrap();
    invites.respond(&reem.token, RsvpStatus::NotAttending).await.unwrap();
    let answers: Vec<_> = invites
        .list_event_invites(host, event.id)
        .await
        .unwrap()
        .into_iter()
        .map(|i| (i.guest_name, i.rsvp_status))
        .collect();
    assert_eq!(
        answers,
        vec![
            ("Sami".to_string(), RsvpStatus::Attending),
            ("Reem".to_string(), RsvpStatus::NotAttending)
        ]
    );

    let gifts = GiftCardService::new(
        Arc::new(SqliteGiftCardRepository::new(market.pool.clone())),
        users.clone(),
    );
    let card = gifts
        .create_gift_card(NewGiftCard {
            sender_email: "sami@example.com".to_string(),
            couple_email: "noor@example.com".to_string(),
            amount: Money::from_units(200),
            event_id: Some(event.id),
            expires_at: None,
        })
        .await
        .unwrap();

    let vendor_owner = users.get(market.vendor.user_id).await.unwrap().unwrap();
    let notifications = NotificationService::new(
        Arc::new(SqliteNotificationRepository::new(market.pool.clone())),
        users.clone(),
        Arc::new(SqliteVendorRepository::new(market.pool.clone())),
    );
    notifications
        .notify(
            vendor_owner.caller(),
            market.vendor.id,
            market.planner.id,
            "Venue confirmed",
            "See you on the day",
            NotificationKind::Success,
        )
        .await
        .unwrap();
    assert_eq!(notifications.list_mine(host).await.unwrap().len(), 1);

    EventService::new(market.events.clone()).delete_event(host, event.id).await.unwrap();

    assert!(matches!(
        invites.invite_by_token(&sami.token).await,
        Err(DomainError::InviteTokenNotFound(_))
    ));
    let kept = gifts.get_gift_card(card.id).await.unwrap();
    assert_eq!(kept.event_id, None);
    assert_eq!(kept.amount, Money::from_units(200));
    assert_eq!(invites.get_template(template.id).await.unwrap().event_id, None);
    assert_eq!(notifications.list_mine(host).await.unwrap().len(), 1);
}
