#![warn(clippy::pedantic)]
//! Persistent, full-text-searchable storage for indexed help topics,
//! backed by SQLite's FTS5 extension.

pub mod error;
pub mod store;

pub use error::IndexError;
pub use store::{IndexStore, SearchHit, Topic};
