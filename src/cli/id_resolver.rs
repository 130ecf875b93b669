//! Short ID prefix resolution for CLI commands.
//!
//! Any unique prefix of a UUID is accepted in place of the full id, similar
//! to git short hashes.

use anyhow::{bail, Result};
use sqlx::SqlitePool;
use uuid::Uuid;

pub async fn resolve_user_id(pool: &SqlitePool, prefix: &str) -> Result<Uuid> {
    resolve_prefix(pool, prefix, "user", USER_QUERY).await
}

pub async fn resolve_category_id(pool: &SqlitePool, prefix: &str) -> Result<Uuid> {
    resolve_prefix(pool, prefix, "category", CATEGORY_QUERY).await
}

pub async fn resolve_vendor_id(pool: &SqlitePool, prefix: &str) -> Result<Uuid> {
    resolve_prefix(pool, prefix, "vendor", VENDOR_QUERY).await
}

pub async fn resolve_service_id(pool: &SqlitePool, prefix: &str) -> Result<Uuid> {
    resolve_prefix(pool, prefix, "service", SERVICE_QUERY).await
}

pub async fn resolve_event_id(pool: &SqlitePool, prefix: &str) -> Result<Uuid> {
    resolve_prefix(pool, prefix, "event", EVENT_QUERY).await
}

pub async fn resolve_invite_id(pool: &SqlitePool, prefix: &str) -> Result<Uuid> {
    resolve_prefix(pool, prefix, "invite", INVITE_QUERY).await
}

pub async fn resolve_template_id(pool: &SqlitePool, prefix: &str) -> Result<Uuid> {
    resolve_prefix(pool, prefix, "invite template", TEMPLATE_QUERY).await
}

pub async fn resolve_gift_card_id(pool: &SqlitePool, prefix: &str) -> Result<Uuid> {
    resolve_prefix(pool, prefix, "gift card", GIFT_CARD_QUERY).await
}

pub async fn resolve_notification_id(pool: &SqlitePool, prefix: &str) -> Result<Uuid> {
    resolve_prefix(pool, prefix, "notification", NOTIFICATION_QUERY).await
}

/// Resolve every prefix in `prefixes`, preserving order.
pub async fn resolve_category_ids(pool: &SqlitePool, prefixes: &[String]) -> Result<Vec<Uuid>> {
    let mut ids = Vec::with_capacity(prefixes.len());
    for prefix in prefixes {
        ids.push(resolve_category_id(pool, prefix).await?);
    }
    Ok(ids)
}

const USER_QUERY: &str = "SELECT id FROM users WHERE id LIKE ? ORDER BY id";
const CATEGORY_QUERY: &str = "SELECT id FROM categories WHERE id LIKE ? ORDER BY id";
const VENDOR_QUERY: &str = "SELECT id FROM vendors WHERE id LIKE ? ORDER BY id";
const SERVICE_QUERY: &str = "SELECT id FROM services WHERE id LIKE ? ORDER BY id";
const EVENT_QUERY: &str = "SELECT id FROM events WHERE id LIKE ? ORDER BY id";
const INVITE_QUERY: &str = "SELECT id FROM invites WHERE id LIKE ? ORDER BY id";
const TEMPLATE_QUERY: &str = "SELECT id FROM invite_templates WHERE id LIKE ? ORDER BY id";
const GIFT_CARD_QUERY: &str = "SELECT id FROM gift_cards WHERE id LIKE ? ORDER BY id";
const NOTIFICATION_QUERY: &str = "SELECT id FROM notifications WHERE id LIKE ? ORDER BY id";

fn validate_prefix(prefix: &str) -> Result<()> {
    if prefix.is_empty() {
        bail!("ID prefix must not be empty");
    }
    if !prefix.chars().all(|c| c.is_ascii_hexdigit() || c == '-') {
        bail!("Invalid ID prefix '{prefix}': must contain only hex characters and dashes");
    }
    Ok(())
}

async fn resolve_prefix(pool: &SqlitePool, prefix: &str, entity: &str, query: &str) -> Result<Uuid> {
    // Full UUIDs skip the lookup
    if let Ok(uuid) = Uuid::parse_str(prefix) {
        return Ok(uuid);
    }

    validate_prefix(prefix)?;

    let pattern = format!("{}%", prefix.to_lowercase());
    let rows: Vec<(String,)> = sqlx::query_as(query).bind(&pattern).fetch_all(pool).await?;

    match rows.as_slice() {
        [] => bail!("No {entity} found matching '{prefix}'"),
        [(id,)] => Ok(Uuid::parse_str(id)?),
        _ => {
            let mut msg = format!("Ambiguous prefix '{prefix}': matches {} {entity}s:", rows.len());
            for (id,) in &rows {
                msg.push_str(&format!("\n  {id}"));
            }
            bail!("{msg}")
        }
    }
}
