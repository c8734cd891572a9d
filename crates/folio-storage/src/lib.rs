//! Storage layer for folio
//!
//! This crate provides:
//! - SQLite database operations (users, magic links, sessions)
//! - Votes, comments and comment likes
//! - Migrations

pub mod db;
pub mod error;
pub mod models;
mod social;

pub use db::Storage;
pub use error::{Result, StorageError};
pub use models::{CommentRecord, MagicLinkRecord};
