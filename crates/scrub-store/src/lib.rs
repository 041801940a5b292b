//! # scrub-store
//!
//! Local durable storage for the scrub client, backed by SQLite.
//!
//! The crate exposes a synchronous `Database` handle that wraps a
//! `rusqlite::Connection`.  Every read and write happens inside a
//! [`Transaction`], which carries typed helpers for peers, messages, chat
//! state, cached metadata, the per-peer operation logs and the sticker cache.

pub mod chat_states;
pub mod database;
pub mod messages;
pub mod migrations;
pub mod models;
pub mod operations;
pub mod peers;
pub mod stickers;

mod error;

pub use database::{Database, Transaction};
pub use error::{Result, StoreError};
pub use models::*;
