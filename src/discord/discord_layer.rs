// Discord layer - commands and event handlers.

#[path = "commands/command_catalog.rs"]
pub mod commands;

#[path = "humor/reaction_trigger.rs"]
pub mod reaction_trigger;

// Re-export the shared framework types for convenience
pub use commands::general::{Context, Data, Error};
