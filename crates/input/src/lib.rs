//! Terminal input module.
//!
//! This crate is independent of the renderer. It maps `crossterm` key events
//! into [`crate::types::GameAction`] and session commands, and tracks the
//! soft drop hold for terminals with or without key-release events.

pub mod handler;
pub mod map;

pub use blockfall_types as types;

pub use handler::{InputHandler, DEFAULT_KEY_RELEASE_TIMEOUT_MS};
pub use map::{handle_key_event, is_soft_drop_key, session_command, should_quit, SessionCommand};
