//! Invitation card designs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A card design invites can be rendered with. The background is a
/// reference into external image storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InviteTemplate {
    pub id: Uuid,
    pub background: String,
    pub event_id: Option<Uuid>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl InviteTemplate {
    pub fn new(background: impl AsRef<str>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            background: background.as_ref().trim().to_string(),
            event_id: None,
            title: None,
            subtitle: None,
            tags: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_event(mut self, event_id: Uuid) -> Self {
        self.event_id = Some(event_id);
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = non_blank(title.into());
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = non_blank(subtitle.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = clean_tags(tags);
        self
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.background.is_empty() {
            return Err("background image is required".to_string());
        }
        Ok(())
    }
}

/// Partial update for a template. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct InviteTemplateUpdate {
    pub background: Option<String>,
    pub event_id: Option<Uuid>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl InviteTemplateUpdate {
    pub fn is_empty(&self) -> bool {
        self.background.is_none()
            && self.event_id.is_none()
            && self.title.is_none()
            && self.subtitle.is_none()
            && self.tags.is_none()
    }

    pub fn apply(self, template: &mut InviteTemplate) {
        if let Some(background) = self.background {
            template.background = background.trim().to_string();
        }
        if let Some(event_id) = self.event_id {
            template.event_id = Some(event_id);
        }
        if let Some(title) = self.title {
            template.title = non_blank(title);
        }
        if let Some(subtitle) = self.subtitle {
            template.subtitle = non_blank(subtitle);
        }
        if let Some(tags) = self.tags {
            template.tags = clean_tags(tags);
        }
        template.updated_at = Utc::now();
    }
}

fn non_blank(s: String) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Trimmed, non-empty tags in first-seen order.
fn clean_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_are_cleaned() {
        let t = InviteTemplate::new("/uploads/gold.png").with_tags([" floral", "", "gold ", "floral"]);
        assert_eq!(t.tags, vec!["floral", "gold"]);
    }

    #[test]
    fn test_blank_optional_text_is_dropped() {
        let t = InviteTemplate::new("bg.png").with_title("  ").with_subtitle(" Save the date ");
        assert_eq!(t.title, None);
        assert_eq!(t.subtitle.as_deref(), Some("Save the date"));
    }

    #[test]
    fn test_background_required() {
        assert!(InviteTemplate::new("   ").validate().is_err());
        assert!(InviteTemplate::new("bg.png").validate().is_ok());
    }
}
