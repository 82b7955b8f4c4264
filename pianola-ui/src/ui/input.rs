use std::time::{Duration, Instant};

use pianola_core::input::Key;

/// Mouse button identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Types of mouse events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseEventKind {
    Down(MouseButton),
    Up(MouseButton),
    Drag(MouseButton),
    ScrollUp,
    ScrollDown,
}

/// Mouse event with position and type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub kind: MouseEventKind,
    pub column: u16,
    pub row: u16,
    pub modifiers: Modifiers,
}

/// Top-level input event: keyboard, mouse, or resize
#[derive(Debug, Clone, Copy)]
pub enum AppEvent {
    Key(InputEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
}

/// Key codes for keyboard input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Enter,
    Escape,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
    F(u8),
    Other,
}

/// Modifier key state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub alt: bool,
    pub shift: bool,
}

/// Press, auto-repeat, or release. Releases only arrive when the terminal
/// supports the kitty keyboard protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPhase {
    Press,
    Repeat,
    Release,
}

/// Input event from the user
#[derive(Debug, Clone, Copy)]
pub struct InputEvent {
    pub key: KeyCode,
    pub modifiers: Modifiers,
    pub phase: KeyPhase,
    pub timestamp: Instant,
}

impl InputEvent {
    pub fn new(key: KeyCode, phase: KeyPhase) -> Self {
        Self {
            key,
            modifiers: Modifiers::default(),
            phase,
            timestamp: Instant::now(),
        }
    }

    pub fn is_ctrl_char(&self, ch: char) -> bool {
        self.modifiers.ctrl && matches!(self.key, KeyCode::Char(c) if c.eq_ignore_ascii_case(&ch))
    }

    /// The key as the note controller sees it.
    pub fn piano_key(&self) -> Key {
        match self.key {
            KeyCode::Char(' ') => Key::Space,
            KeyCode::Char(c) => Key::Char(c),
            KeyCode::Enter => Key::Enter,
            KeyCode::Tab => Key::Tab,
            KeyCode::Escape => Key::Escape,
            _ => Key::Other,
        }
    }
}

/// Trait for reading input events
pub trait InputSource {
    /// Poll for an input event with a timeout
    /// Returns None if no event is available within the timeout
    fn poll_event(&mut self, timeout: Duration) -> Option<AppEvent>;
}
