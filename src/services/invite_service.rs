//! Guest invitations and the card templates they are rendered with.
//!
//! Event owners manage the guest list. Guests never sign in: they look up
//! and answer their invite with the token it was issued with.

use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    Caller, Event, Invite, InviteTemplate, InviteTemplateUpdate, InviteUpdate, RsvpStatus,
};
use crate::domain::ports::{EventRepository, InviteRepository, InviteTemplateRepository};
use crate::services::require_admin;

/// Fields for a new invite template.
#[derive(Debug, Clone, Default)]
pub struct NewInviteTemplate {
    pub background: String,
    pub event_id: Option<Uuid>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub tags: Vec<String>,
}

pub struct InviteService<I, T, E>
where
    I: InviteRepository,
    T: InviteTemplateRepository,
    E: EventRepository,
{
    invites: Arc<I>,
    templates: Arc<T>,
    events: Arc<E>,
}

impl<I, T, E> InviteService<I, T, E>
where
    I: InviteRepository,
    T: InviteTemplateRepository,
    E: EventRepository,
{
    pub fn new(invites: Arc<I>, templates: Arc<T>, events: Arc<E>) -> Self {
        Self {
            invites,
            templates,
            events,
        }
    }

    /// Invite a guest to one of the caller's events. Without a template the
    /// oldest one on file is used, if any.
    pub async fn create_invite(
        &self,
        caller: Caller,
        event_id: Uuid,
        guest_name: &str,
        guest_email: &str,
        template_id: Option<Uuid>,
    ) -> DomainResult<Invite> {
        self.managed_event(caller, event_id).await?;

        let template_id = match template_id {
            Some(id) => Some(self.get_template(id).await?.id),
            None => self.templates.first().await?.map(|t| t.id),
        };

        let mut invite = Invite::new(event_id, guest_name, guest_email);
        if let Some(id) = template_id {
            invite = invite.with_template(id);
        }
        invite.validate().map_err(DomainError::ValidationFailed)?;
        self.invites.create(&invite).await?;

        info!(invite_id = %invite.id, event_id = %event_id, "invite created");
        Ok(invite)
    }

    pub async fn get_invite(&self, caller: Caller, id: Uuid) -> DomainResult<Invite> {
        let invite = self.invites.get(id).await?.ok_or(DomainError::InviteNotFound(id))?;
        self.managed_event(caller, invite.event_id).await?;
        Ok(invite)
    }

    /// Every invite across all events.
    pub async fn list_invites(&self, caller: Caller) -> DomainResult<Vec<Invite>> {
        require_admin(caller, "list every invite")?;
        self.invites.list().await
    }

    /// The guest list of one of the caller's events.
    pub async fn list_event_invites(&self, caller: Caller, event_id: Uuid) -> DomainResult<Vec<Invite>> {
        self.managed_event(caller, event_id).await?;
        self.invites.list_by_event(event_id).await
    }

    pub async fn update_invite(&self, caller: Caller, id: Uuid, update: InviteUpdate) -> DomainResult<Invite> {
        let mut invite = self.get_invite(caller, id).await?;
        if update.is_empty() {
            return Ok(invite);
        }
        if let Some(template_id) = update.template_id {
            self.get_template(template_id).await?;
        }

        update.apply(&mut invite);
        invite.validate().map_err(DomainError::ValidationFailed)?;
        self.invites.update(&invite).await?;
        Ok(invite)
    }

    pub async fn delete_invite(&self, caller: Caller, id: Uuid) -> DomainResult<()> {
        self.get_invite(caller, id).await?;
        self.invites.delete(id).await?;
        info!(invite_id = %id, "invite deleted");
        Ok(())
    }

    /// What a guest sees when opening their invite.
    pub async fn invite_by_token(&self, token: &str) -> DomainResult<Invite> {
        self.invites
            .get_by_token(token)
            .await?
            .ok_or_else(|| DomainError::InviteTokenNotFound(token.trim().to_string()))
    }

    /// Record a guest's answer. Guests may change their mind.
    pub async fn respond(&self, token: &str, status: RsvpStatus) -> DomainResult<Invite> {
        if !status.is_answer() {
            return Err(DomainError::ValidationFailed(
                "RSVP must be attending or not_attending".to_string(),
            ));
        }

        let mut invite = self.invite_by_token(token).await?;
        InviteUpdate {
            rsvp_status: Some(status),
            ..Default::default()
        }
        .apply(&mut invite);
        self.invites.update(&invite).await?;

        info!(invite_id = %invite.id, rsvp = status.as_str(), "rsvp recorded");
        Ok(invite)
    }

    pub async fn create_template(&self, new: NewInviteTemplate) -> DomainResult<InviteTemplate> {
        let mut template = InviteTemplate::new(&new.background).with_tags(new.tags);
        if let Some(event_id) = new.event_id {
            self.events.get(event_id).await?.ok_or(DomainError::EventNotFound(event_id))?;
            template = template.with_event(event_id);
        }
        if let Some(title) = new.title {
            template = template.with_title(title);
        }
        if let Some(subtitle) = new.subtitle {
            template = template.with_subtitle(subtitle);
        }

        template.validate().map_err(DomainError::ValidationFailed)?;
        self.templates.create(&template).await?;
        Ok(template)
    }

    pub async fn get_template(&self, id: Uuid) -> DomainResult<InviteTemplate> {
        self.templates.get(id).await?.ok_or(DomainError::InviteTemplateNotFound(id))
    }

    pub async fn list_templates(&self) -> DomainResult<Vec<InviteTemplate>> {
        self.templates.list().await
    }

    pub async fn update_template(&self, id: Uuid, update: InviteTemplateUpdate) -> DomainResult<InviteTemplate> {
        let mut template = self.get_template(id).await?;
        if update.is_empty() {
            return Ok(template);
        }
        if let Some(event_id) = update.event_id {
            self.events.get(event_id).await?.ok_or(DomainError::EventNotFound(event_id))?;
        }

        update.apply(&mut template);
        template.validate().map_err(DomainError::ValidationFailed)?;
        self.templates.update(&template).await?;
        Ok(template)
    }

    pub async fn delete_template(&self, id: Uuid) -> DomainResult<()> {
        self.templates.delete(id).await
    }

    /// The event, provided the caller owns it or is an admin.
    async fn managed_event(&self, caller: Caller, event_id: Uuid) -> DomainResult<Event> {
        let event = self.events.get(event_id).await?.ok_or(DomainError::EventNotFound(event_id))?;
        if !event.is_owned_by(caller.user_id) && !caller.is_admin() {
            return Err(DomainError::Forbidden(format!(
                "event {event_id} does not belong to the caller"
            )));
        }
        Ok(event)
    }
}
