// Discord layer - commands, event handlers and reusable UI pieces.

#[path = "commands/command_catalog.rs"]
pub mod commands;

#[path = "events/gateway.rs"]
pub mod events;

#[path = "ui/components.rs"]
pub mod ui;

// Re-export command types for convenience
pub use commands::moderation::{Data, Error};
