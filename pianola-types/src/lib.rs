//! # pianola-types
//!
//! Immutable data model shared by the pianola crates: note identities, the
//! two-octave key layout, the trigger-key lookup table, and key geometry.

pub mod geometry;
pub mod keyboard_map;
pub mod note;
pub mod trigger;

pub use geometry::{KeyGeometry, KeyRect};
pub use keyboard_map::{DuplicateTrigger, KeyboardMap};
pub use note::{base_octave, two_octave_layout, KeyColor, NoteDefinition, NoteId, PitchClass};
pub use trigger::TriggerKey;
