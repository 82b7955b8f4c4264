use serde::{Deserialize, Serialize};

/// Canonical identifier for a computer key bound to a note.
///
/// Printable keys are stored lowercased. Enter is its own variant so a named
/// key can never collide with a printable character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriggerKey {
    Char(char),
    Enter,
}

impl TriggerKey {
    /// Short label drawn on the key cap.
    pub fn label(&self) -> String {
        match self {
            TriggerKey::Char(c) => c.to_uppercase().collect(),
            TriggerKey::Enter => "↵".to_string(),
        }
    }
}

impl std::fmt::Display for TriggerKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TriggerKey::Char(c) => write!(f, "{}", c),
            TriggerKey::Enter => write!(f, "Enter"),
        }
    }
}
