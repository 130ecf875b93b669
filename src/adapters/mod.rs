//! Infrastructure adapters for external systems.

pub mod oracle;
pub mod sqlite;
