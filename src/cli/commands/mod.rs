//! Command implementations, one module per top-level subcommand.

pub mod category;
pub mod event;
pub mod gift_card;
pub mod init;
pub mod invite;
pub mod notification;
pub mod service;
pub mod template;
pub mod user;
pub mod vendor;
