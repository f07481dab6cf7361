//! Input handler for terminal environments.
//!
//! Soft drop is a held input: the core speeds up while it is held and
//! restores the baseline on release. Many terminals never report key
//! releases, so a hold also ends when no press or repeat has arrived
//! within a timeout.

use std::time::{Duration, Instant};

use crossterm::event::{KeyEvent, KeyEventKind};

use crate::map::{handle_key_event, is_soft_drop_key};
use crate::types::GameAction;

/// Time without a press or repeat after which a soft drop hold ends
pub const DEFAULT_KEY_RELEASE_TIMEOUT_MS: u32 = 300;

/// Tracks the soft drop hold across key events.
#[derive(Debug, Clone)]
pub struct InputHandler {
    soft_drop_held: bool,
    last_soft_drop_key: Option<Instant>,
    key_release_timeout: Duration,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            soft_drop_held: false,
            last_soft_drop_key: None,
            key_release_timeout: Duration::from_millis(u64::from(DEFAULT_KEY_RELEASE_TIMEOUT_MS)),
        }
    }

    pub fn with_key_release_timeout_ms(mut self, timeout_ms: u32) -> Self {
        self.key_release_timeout = Duration::from_millis(u64::from(timeout_ms));
        self
    }

    pub fn key_release_timeout_ms(&self) -> u32 {
        self.key_release_timeout.as_millis() as u32
    }

    pub fn soft_drop_held(&self) -> bool {
        self.soft_drop_held
    }

    /// Translate one key event into a game action
    ///
    /// Presses and repeats of the soft drop key each yield `SoftDrop`; the
    /// core treats repeats as no-ops. A release yields `SoftDropRelease` once.
    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Option<GameAction> {
        match key.kind {
            KeyEventKind::Release => {
                if is_soft_drop_key(key.code) && self.soft_drop_held {
                    self.release()
                } else {
                    None
                }
            }
            KeyEventKind::Press | KeyEventKind::Repeat => {
                let action = handle_key_event(key)?;
                if action == GameAction::SoftDrop {
                    self.soft_drop_held = true;
                    self.last_soft_drop_key = Some(now);
                }
                Some(action)
            }
        }
    }

    /// Auto-release a soft drop hold that has gone quiet
    pub fn update(&mut self, now: Instant) -> Option<GameAction> {
        if !self.soft_drop_held {
            return None;
        }
        let last = self.last_soft_drop_key?;
        if now.saturating_duration_since(last) > self.key_release_timeout {
            self.release()
        } else {
            None
        }
    }

    /// End any hold immediately (focus loss, pause, load)
    pub fn reset(&mut self) {
        self.soft_drop_held = false;
        self.last_soft_drop_key = None;
    }

    fn release(&mut self) -> Option<GameAction> {
        self.reset();
        Some(GameAction::SoftDropRelease)
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
