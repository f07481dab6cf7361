//! Key mapping from terminal events to game actions.

use crate::types::GameAction;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Requests handled by the session around the game rather than the core
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Save,
    Load,
}

/// Map keyboard input to game actions.
pub fn handle_key_event(key: KeyEvent) -> Option<GameAction> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }

    match key.code {
        // Movement
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(GameAction::MoveLeft),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(GameAction::MoveRight),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(GameAction::SoftDrop),

        // Rotation
        KeyCode::Up
        | KeyCode::Char('e')
        | KeyCode::Char('E')
        | KeyCode::Char('w')
        | KeyCode::Char('W') => Some(GameAction::RotateCw),
        KeyCode::Char('q')
        | KeyCode::Char('Q')
        | KeyCode::Char('z')
        | KeyCode::Char('Z') => Some(GameAction::RotateCcw),

        // Lifecycle
        KeyCode::Char('p') | KeyCode::Char('P') => Some(GameAction::Pause),
        KeyCode::Enter => Some(GameAction::NewGame),

        _ => None,
    }
}

/// Whether the key belongs to the soft drop binding
pub fn is_soft_drop_key(code: KeyCode) -> bool {
    matches!(
        code,
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S')
    )
}

/// Map save/load keys.
pub fn session_command(key: KeyEvent) -> Option<SessionCommand> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return None;
    }
    match key.code {
        KeyCode::Char('g') | KeyCode::Char('G') => Some(SessionCommand::Save),
        KeyCode::Char('c') | KeyCode::Char('C') => Some(SessionCommand::Load),
        _ => None,
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    key.code == KeyCode::Esc
        || (matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
            && key.modifiers.contains(KeyModifiers::CONTROL))
}
