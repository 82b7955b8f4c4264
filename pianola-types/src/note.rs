use serde::{Deserialize, Serialize};

use crate::trigger::TriggerKey;

/// One of the twelve chromatic pitch classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PitchClass {
    C,
    Cs,
    D,
    Ds,
    E,
    F,
    Fs,
    G,
    Gs,
    A,
    As,
    B,
}

impl PitchClass {
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::Cs,
        PitchClass::D,
        PitchClass::Ds,
        PitchClass::E,
        PitchClass::F,
        PitchClass::Fs,
        PitchClass::G,
        PitchClass::Gs,
        PitchClass::A,
        PitchClass::As,
        PitchClass::B,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::Cs => "C#",
            PitchClass::D => "D",
            PitchClass::Ds => "D#",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::Fs => "F#",
            PitchClass::G => "G",
            PitchClass::Gs => "G#",
            PitchClass::A => "A",
            PitchClass::As => "A#",
            PitchClass::B => "B",
        }
    }

    /// Semitones above C (0..=11).
    pub fn semitone(&self) -> u8 {
        *self as u8
    }

    /// Sharps sit on black keys.
    pub fn key_color(&self) -> KeyColor {
        match self {
            PitchClass::Cs | PitchClass::Ds | PitchClass::Fs | PitchClass::Gs | PitchClass::As => {
                KeyColor::Black
            }
            _ => KeyColor::White,
        }
    }
}

/// Pitch class plus octave number, e.g. `C#4`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NoteId {
    pub pitch: PitchClass,
    pub octave: i8,
}

impl NoteId {
    pub const fn new(pitch: PitchClass, octave: i8) -> Self {
        Self { pitch, octave }
    }

    /// Same pitch class, `octaves` higher.
    pub fn transposed(self, octaves: i8) -> Self {
        Self {
            pitch: self.pitch,
            octave: self.octave + octaves,
        }
    }

    /// MIDI note number (C4 = 60), clamped to 0..=127.
    pub fn midi_number(&self) -> u8 {
        let n = (self.octave as i16 + 1) * 12 + self.pitch.semitone() as i16;
        n.clamp(0, 127) as u8
    }
}

impl std::fmt::Display for NoteId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.pitch.name(), self.octave)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyColor {
    White,
    Black,
}

/// A playable key: its note, pitch, placement and the computer key bound to it.
///
/// Black keys share `position` with the white key they sit after.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteDefinition {
    pub note: NoteId,
    pub frequency: f64,
    pub color: KeyColor,
    pub position: u8,
    pub trigger: TriggerKey,
}

impl NoteDefinition {
    pub fn is_black(&self) -> bool {
        self.color == KeyColor::Black
    }

    /// Copy of this key one octave up: double frequency, seven white keys right.
    pub fn octave_up(&self, trigger: TriggerKey) -> Self {
        Self {
            note: self.note.transposed(1),
            frequency: self.frequency * 2.0,
            color: self.color,
            position: self.position + 7,
            trigger,
        }
    }
}

// (pitch, Hz, white-key position, trigger) for C4..B4
const BASE_OCTAVE: [(PitchClass, f64, u8, char); 12] = [
    (PitchClass::C, 261.63, 0, 'a'),
    (PitchClass::Cs, 277.18, 0, 'w'),
    (PitchClass::D, 293.66, 1, 's'),
    (PitchClass::Ds, 311.13, 1, 'e'),
    (PitchClass::E, 329.63, 2, 'd'),
    (PitchClass::F, 349.23, 3, 'f'),
    (PitchClass::Fs, 369.99, 3, 't'),
    (PitchClass::G, 392.0, 4, 'g'),
    (PitchClass::Gs, 415.3, 4, 'y'),
    (PitchClass::A, 440.0, 5, 'h'),
    (PitchClass::As, 466.16, 5, 'u'),
    (PitchClass::B, 493.88, 6, 'j'),
];

/// Trigger for the second octave, keyed by the base octave's trigger.
fn upper_trigger(base: char) -> TriggerKey {
    match base {
        'a' => TriggerKey::Char('k'),
        'w' => TriggerKey::Char('o'),
        's' => TriggerKey::Char('l'),
        'e' => TriggerKey::Char('p'),
        'd' => TriggerKey::Char(';'),
        'f' => TriggerKey::Char('\''),
        't' => TriggerKey::Char(']'),
        'g' => TriggerKey::Enter,
        'y' => TriggerKey::Char('\\'),
        'h' => TriggerKey::Char('z'),
        'u' => TriggerKey::Char('x'),
        'j' => TriggerKey::Char('c'),
        other => TriggerKey::Char(other),
    }
}

/// The single octave C4..B4 on the home and top rows.
pub fn base_octave() -> Vec<NoteDefinition> {
    BASE_OCTAVE
        .iter()
        .map(|&(pitch, frequency, position, key)| NoteDefinition {
            note: NoteId::new(pitch, 4),
            frequency,
            color: pitch.key_color(),
            position,
            trigger: TriggerKey::Char(key),
        })
        .collect()
}

/// C4..B5: the base octave followed by its transposition one octave up.
pub fn two_octave_layout() -> Vec<NoteDefinition> {
    let lower = base_octave();
    let upper: Vec<NoteDefinition> = lower
        .iter()
        .map(|n| {
            let base_key = match n.trigger {
                TriggerKey::Char(c) => c,
                TriggerKey::Enter => '\n',
            };
            n.octave_up(upper_trigger(base_key))
        })
        .collect();
    lower.into_iter().chain(upper).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn note_id_display() {
        assert_eq!(NoteId::new(PitchClass::Cs, 4).to_string(), "C#4");
        assert_eq!(NoteId::new(PitchClass::B, 5).to_string(), "B5");
    }

    #[test]
    fn midi_number_middle_c() {
        assert_eq!(NoteId::new(PitchClass::C, 4).midi_number(), 60);
        assert_eq!(NoteId::new(PitchClass::A, 4).midi_number(), 69);
        assert_eq!(NoteId::new(PitchClass::C, -1).midi_number(), 0);
    }

    #[test]
    fn layout_has_24_keys() {
        let notes = two_octave_layout();
        assert_eq!(notes.len(), 24);
        assert_eq!(notes.iter().filter(|n| n.is_black()).count(), 10);
    }

    #[test]
    fn c5_is_exact_double_of_c4() {
        let notes = two_octave_layout();
        let c4 = notes.iter().find(|n| n.note.to_string() == "C4").unwrap();
        let c5 = notes.iter().find(|n| n.note.to_string() == "C5").unwrap();
        assert_eq!(c5.frequency, c4.frequency * 2.0);
        assert_eq!(c5.frequency, 523.26);
        assert_eq!(c5.position, c4.position + 7);
    }

    #[test]
    fn enter_plays_g5() {
        let notes = two_octave_layout();
        let g5 = notes.iter().find(|n| n.trigger == TriggerKey::Enter).unwrap();
        assert_eq!(g5.note, NoteId::new(PitchClass::G, 5));
    }

    #[test]
    fn black_keys_share_position_with_preceding_white() {
        let notes = base_octave();
        let cs = notes.iter().find(|n| n.note.pitch == PitchClass::Cs).unwrap();
        assert_eq!(cs.position, 0);
        let as_ = notes.iter().find(|n| n.note.pitch == PitchClass::As).unwrap();
        assert_eq!(as_.position, 5);
    }
}
