use std::collections::HashMap;

use crate::note::{KeyColor, NoteDefinition};
use crate::trigger::TriggerKey;

/// Two notes were bound to the same trigger key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateTrigger {
    pub trigger: TriggerKey,
    pub first: String,
    pub second: String,
}

impl std::fmt::Display for DuplicateTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "trigger key {:?} bound to both {} and {}",
            self.trigger, self.first, self.second
        )
    }
}

impl std::error::Error for DuplicateTrigger {}

/// Read-only lookup from trigger key to note, built once from the full note list.
///
/// Notes keep their construction order; `index_of` hands out indices into it.
#[derive(Debug, Clone)]
pub struct KeyboardMap {
    notes: Vec<NoteDefinition>,
    by_trigger: HashMap<TriggerKey, usize>,
}

impl KeyboardMap {
    pub fn new(notes: Vec<NoteDefinition>) -> Result<Self, DuplicateTrigger> {
        let mut by_trigger = HashMap::with_capacity(notes.len());
        for (i, def) in notes.iter().enumerate() {
            if let Some(&prev) = by_trigger.get(&def.trigger) {
                let prev: &NoteDefinition = &notes[prev];
                return Err(DuplicateTrigger {
                    trigger: def.trigger,
                    first: prev.note.to_string(),
                    second: def.note.to_string(),
                });
            }
            by_trigger.insert(def.trigger, i);
        }
        Ok(Self { notes, by_trigger })
    }

    pub fn get(&self, trigger: &TriggerKey) -> Option<&NoteDefinition> {
        self.by_trigger.get(trigger).map(|&i| &self.notes[i])
    }

    pub fn index_of(&self, trigger: &TriggerKey) -> Option<usize> {
        self.by_trigger.get(trigger).copied()
    }

    pub fn note(&self, index: usize) -> Option<&NoteDefinition> {
        self.notes.get(index)
    }

    pub fn notes(&self) -> &[NoteDefinition] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn triggers(&self) -> impl Iterator<Item = &TriggerKey> {
        self.by_trigger.keys()
    }

    pub fn white_keys(&self) -> impl Iterator<Item = (usize, &NoteDefinition)> {
        self.notes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.color == KeyColor::White)
    }

    pub fn black_keys(&self) -> impl Iterator<Item = (usize, &NoteDefinition)> {
        self.notes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.color == KeyColor::Black)
    }

    /// Number of white keys, i.e. the keyboard's width in white-key slots.
    pub fn white_count(&self) -> usize {
        self.white_keys().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::note::{two_octave_layout, NoteId, PitchClass};

    #[test]
    fn two_octaves_register_disjoint_triggers() {
        let map = KeyboardMap::new(two_octave_layout()).unwrap();
        assert_eq!(map.len(), 24);
        assert_eq!(map.triggers().count(), 24);
    }

    #[test]
    fn lookup_by_trigger() {
        let map = KeyboardMap::new(two_octave_layout()).unwrap();
        let def = map.get(&TriggerKey::Char(';')).unwrap();
        assert_eq!(def.note, NoteId::new(PitchClass::E, 5));
        assert!(map.get(&TriggerKey::Char('q')).is_none());
    }

    #[test]
    fn duplicate_trigger_rejected() {
        let mut notes = two_octave_layout();
        notes[13].trigger = TriggerKey::Char('a');
        let err = KeyboardMap::new(notes).unwrap_err();
        assert_eq!(err.trigger, TriggerKey::Char('a'));
        assert_eq!(err.first, "C4");
    }

    #[test]
    fn white_count_is_fourteen() {
        let map = KeyboardMap::new(two_octave_layout()).unwrap();
        assert_eq!(map.white_count(), 14);
        assert_eq!(map.black_keys().count(), 10);
    }
}
