use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::game::{Heading, InputSnapshot};

/// Control action a key event resolved to, beyond updating the snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    None,
}

/// Maintains the persistent held-key map the engine samples each frame.
///
/// Press and repeat events mark a key held, release events clear it. On
/// terminals that never report releases the map degrades to latched
/// presses: held directions are indistinguishable from tapped ones and the
/// pause key edge-triggers once per observed press.
pub struct InputHandler {
    snapshot: InputSnapshot,
}

impl InputHandler {
    pub fn new() -> Self {
        Self {
            snapshot: InputSnapshot::new(),
        }
    }

    /// The current held-key state
    pub fn snapshot(&self) -> &InputSnapshot {
        &self.snapshot
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        let held = key.kind != KeyEventKind::Release;

        match key.code {
            // Movement - Arrow keys
            KeyCode::Up => self.snapshot.set_held(Heading::Up, held),
            KeyCode::Down => self.snapshot.set_held(Heading::Down, held),
            KeyCode::Left => self.snapshot.set_held(Heading::Left, held),
            KeyCode::Right => self.snapshot.set_held(Heading::Right, held),

            // Movement - WASD
            KeyCode::Char('w') | KeyCode::Char('W') => self.snapshot.set_held(Heading::Up, held),
            KeyCode::Char('s') | KeyCode::Char('S') => self.snapshot.set_held(Heading::Down, held),
            KeyCode::Char('a') | KeyCode::Char('A') => self.snapshot.set_held(Heading::Left, held),
            KeyCode::Char('d') | KeyCode::Char('D') => self.snapshot.set_held(Heading::Right, held),

            // Pause toggle key; the engine does the edge detection
            KeyCode::Char(' ') => self.snapshot.pause = held,

            // Controls
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                if key.kind == KeyEventKind::Press {
                    return KeyAction::Quit;
                }
            }

            _ => {}
        }

        KeyAction::None
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
