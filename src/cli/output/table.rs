//! Table output formatting for CLI commands
//!
//! Renders catalog entries, events, guest lists and suggestions with
//! comfy-table.
//! Colors are dropped when `NO_COLOR` is set or the terminal is dumb.

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use std::env;

use super::{short_id, truncate};
use crate::domain::models::{
    Category, EventSummary, GiftCard, Invite, InviteTemplate, Notification, RsvpStatus, Selection, Service, User,
    Vendor,
};

/// Table formatter for CLI output
pub struct TableFormatter {
    /// Whether to use colors in output
    use_colors: bool,
    /// Maximum width for tables (None = auto)
    max_width: Option<u16>,
}

impl TableFormatter {
    pub fn new() -> Self {
        Self {
            use_colors: supports_color(),
            max_width: None,
        }
    }

    pub fn with_config(use_colors: bool, max_width: Option<u16>) -> Self {
        Self { use_colors, max_width }
    }

    pub fn format_users(&self, users: &[User]) -> String {
        let mut table = self.create_base_table(&["ID", "Username", "Email", "Role"]);
        for user in users {
            table.add_row(vec![
                Cell::new(short_id(&user.id)),
                Cell::new(&user.username),
                Cell::new(&user.email),
                Cell::new(user.role.as_str()),
            ]);
        }
        table.to_string()
    }

    pub fn format_categories(&self, categories: &[Category]) -> String {
        let mut table = self.create_base_table(&["ID", "Name"]);
        for category in categories {
            table.add_row(vec![Cell::new(short_id(&category.id)), Cell::new(&category.name)]);
        }
        table.to_string()
    }

    pub fn format_vendors(&self, vendors: &[Vendor]) -> String {
        let mut table = self.create_base_table(&["ID", "Business", "Bio", "Owner"]);
        for vendor in vendors {
            table.add_row(vec![
                Cell::new(short_id(&vendor.id)),
                Cell::new(&vendor.business_name),
                Cell::new(truncate(&vendor.bio, 40)),
                Cell::new(short_id(&vendor.user_id)),
            ]);
        }
        table.to_string()
    }

    pub fn format_services(&self, services: &[Service]) -> String {
        let mut table = self.create_base_table(&["ID", "Name", "Type", "Duration", "Price", "Vendor"]);
        for service in services {
            table.add_row(vec![
                Cell::new(short_id(&service.id)),
                Cell::new(truncate(&service.name, 32)),
                Cell::new(&service.service_type),
                Cell::new(&service.duration),
                self.price_cell(service.price.to_string()),
                Cell::new(short_id(&service.vendor_id)),
            ]);
        }
        table.to_string()
    }

    pub fn format_events(&self, events: &[EventSummary]) -> String {
        let mut table = self.create_base_table(&["ID", "Date", "Location", "Budget", "Services"]);
        for summary in events {
            let event = &summary.event;
            table.add_row(vec![
                Cell::new(short_id(&event.id)),
                Cell::new(event.date.format("%Y-%m-%d %H:%M").to_string()),
                Cell::new(truncate(&event.location, 32)),
                self.price_cell(event.budget.to_string()),
                Cell::new(summary.service_count.to_string()),
            ]);
        }
        table.to_string()
    }

    pub fn format_invites(&self, invites: &[Invite]) -> String {
        let mut table = self.create_base_table(&["ID", "Guest", "Email", "RSVP", "Event", "Token"]);
        for invite in invites {
            table.add_row(vec![
                Cell::new(short_id(&invite.id)),
                Cell::new(truncate(&invite.guest_name, 24)),
                Cell::new(&invite.guest_email),
                self.rsvp_cell(invite.rsvp_status),
                Cell::new(short_id(&invite.event_id)),
                Cell::new(&invite.token),
            ]);
        }
        table.to_string()
    }

    pub fn format_templates(&self, templates: &[InviteTemplate]) -> String {
        let mut table = self.create_base_table(&["ID", "Title", "Background", "Tags"]);
        for template in templates {
            table.add_row(vec![
                Cell::new(short_id(&template.id)),
                Cell::new(template.title.as_deref().unwrap_or("-")),
                Cell::new(truncate(&template.background, 32)),
                Cell::new(template.tags.join(", ")),
            ]);
        }
        table.to_string()
    }

    pub fn format_gift_cards(&self, cards: &[GiftCard]) -> String {
        let mut table = self.create_base_table(&["ID", "Amount", "Status", "Sender", "Couple", "Expires"]);
        for card in cards {
            table.add_row(vec![
                Cell::new(short_id(&card.id)),
                self.price_cell(card.amount.to_string()),
                Cell::new(card.status.as_str()),
                Cell::new(short_id(&card.sender_id)),
                Cell::new(short_id(&card.couple_id)),
                Cell::new(
                    card.expires_at
                        .map_or_else(|| "-".to_string(), |at| at.format("%Y-%m-%d").to_string()),
                ),
            ]);
        }
        table.to_string()
    }

    pub fn format_notifications(&self, notifications: &[Notification]) -> String {
        let mut table = self.create_base_table(&["ID", "", "Kind", "Title", "Message", "Sent"]);
        for n in notifications {
            let marker = if n.read { Cell::new("") } else { Cell::new("*").add_attribute(Attribute::Bold) };
            table.add_row(vec![
                Cell::new(short_id(&n.id)),
                marker,
                Cell::new(n.kind.as_str()),
                Cell::new(truncate(&n.title, 24)),
                Cell::new(truncate(&n.message, 48)),
                Cell::new(n.created_at.format("%Y-%m-%d %H:%M").to_string()),
            ]);
        }
        table.to_string()
    }

    /// One row per selected item, followed by a bold total row.
    pub fn format_selection(&self, selection: &Selection) -> String {
        let mut table = self.create_base_table(&["ID", "Name", "Type", "Price", "Reason"]);
        for item in &selection.items {
            table.add_row(vec![
                Cell::new(short_id(&item.id)),
                Cell::new(truncate(&item.name, 32)),
                Cell::new(&item.service_type),
                self.price_cell(item.price.to_string()),
                Cell::new(truncate(&item.reason, 48)),
            ]);
        }

        let total = Cell::new(selection.total_price.to_string()).add_attribute(Attribute::Bold);
        let total = if self.use_colors && !selection.within_budget() {
            total.fg(Color::Red)
        } else {
            total
        };
        table.add_row(vec![
            Cell::new(""),
            Cell::new("Total").add_attribute(Attribute::Bold),
            Cell::new(""),
            total,
            Cell::new(""),
        ]);
        table.to_string()
    }

    fn rsvp_cell(&self, status: RsvpStatus) -> Cell {
        let cell = Cell::new(status.as_str());
        if !self.use_colors {
            return cell;
        }
        match status {
            RsvpStatus::Attending => cell.fg(Color::Green),
            RsvpStatus::NotAttending => cell.fg(Color::Red),
            RsvpStatus::Pending => cell,
        }
    }

    fn price_cell(&self, text: String) -> Cell {
        if self.use_colors {
            Cell::new(text).fg(Color::Green)
        } else {
            Cell::new(text)
        }
    }

    fn create_base_table(&self, headers: &[&str]) -> Table {
        let mut table = Table::new();
        table
            .load_preset(presets::UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic)
            .set_header(headers.iter().map(|h| Cell::new(h).add_attribute(Attribute::Bold)));

        if let Some(width) = self.max_width {
            table.set_width(width);
        }
        table
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if color output is supported
fn supports_color() -> bool {
    if env::var("NO_COLOR").is_ok() {
        return false;
    }
    !matches!(env::var("TERM").as_deref(), Ok("dumb"))
}
