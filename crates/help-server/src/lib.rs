#![warn(clippy::pedantic)]
//! Lifecycle controller and `rmcp` tool dispatcher for the 1C help server:
//! discovers the installed platform, decides whether the existing index
//! is current, drives indexing in the background, and answers tool calls
//! concurrently.

pub mod dispatcher;
pub mod lifecycle;
pub mod messages;
pub mod state;
pub mod status;

pub use dispatcher::HelpServer;
pub use lifecycle::startup;
pub use state::{AppState, Phase};
