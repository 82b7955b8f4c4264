use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use pianola_types::{two_octave_layout, KeyboardMap, NoteDefinition, NoteId, TriggerKey};

use crate::error::Result;
use crate::input::{self, Key, KeyboardLayout};
use crate::sink::NoteSink;

/// How key-up is detected for the physical keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseMode {
    /// The host delivers key-up events.
    Reported,
    /// The host only delivers presses and repeats; a key is released once no
    /// event for it has arrived within the timeout.
    Timeout(Duration),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerSource {
    #[default]
    Mouse,
    Touch,
}

/// Pointer/touch drag. `last_note` is the only record of which note a
/// slide or release has to stop.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DragState {
    pub is_dragging: bool,
    pub dragged_trigger: Option<TriggerKey>,
    pub last_note: Option<NoteId>,
    pub source: PointerSource,
}

/// Result of a physical key-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyDown {
    /// Note that started, if this press started one.
    pub note_on: Option<NoteId>,
    /// The host must not run its own handling for this key.
    pub suppress_default: bool,
}

/// Turns keyboard, mouse and touch input into one note-on/note-off stream.
///
/// The physical keyboard and the pointer are tracked independently: held
/// keys live in the pressed set, the pointer in [`DragState`]. Every
/// transition happens synchronously inside the call that caused it.
pub struct NoteController {
    map: KeyboardMap,
    layout: KeyboardLayout,
    release_mode: ReleaseMode,
    // pressed set; the instant is the last press/repeat seen for the key
    pressed: HashMap<TriggerKey, Instant>,
    drag: DragState,
}

impl NoteController {
    pub fn new(map: KeyboardMap) -> Self {
        Self {
            map,
            layout: KeyboardLayout::Qwerty,
            release_mode: ReleaseMode::Reported,
            pressed: HashMap::new(),
            drag: DragState::default(),
        }
    }

    /// Controller over the standard C4..B5 layout.
    pub fn two_octaves() -> Result<Self> {
        Ok(Self::new(KeyboardMap::new(two_octave_layout())?))
    }

    pub fn with_layout(mut self, layout: KeyboardLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn with_release_mode(mut self, mode: ReleaseMode) -> Self {
        self.release_mode = mode;
        self
    }

    pub fn set_release_mode(&mut self, mode: ReleaseMode) {
        self.release_mode = mode;
    }

    pub fn release_mode(&self) -> ReleaseMode {
        self.release_mode
    }

    pub fn map(&self) -> &KeyboardMap {
        &self.map
    }

    pub fn drag(&self) -> &DragState {
        &self.drag
    }

    pub fn pressed_keys(&self) -> impl Iterator<Item = &TriggerKey> {
        self.pressed.keys()
    }

    pub fn is_key_held(&self, trigger: &TriggerKey) -> bool {
        self.pressed.contains_key(trigger)
    }

    /// Whether a key should render as pressed: held on the keyboard or under
    /// the dragging pointer.
    pub fn is_pressed(&self, trigger: &TriggerKey) -> bool {
        self.pressed.contains_key(trigger) || self.drag.dragged_trigger.as_ref() == Some(trigger)
    }

    /// The note a host key plays under the current layout, if any.
    pub fn resolve(&self, key: Key) -> Option<&NoteDefinition> {
        self.map.get(&input::normalize(key, self.layout)?)
    }

    // ── Physical keyboard ─────────────────────────────────────────

    /// Press of a physical key (including auto-repeat).
    pub fn key_down(&mut self, key: Key, now: Instant, sink: &mut dyn NoteSink) -> KeyDown {
        let suppress_default = input::suppresses_default(key);
        let Some(trigger) = input::normalize(key, self.layout) else {
            return KeyDown { note_on: None, suppress_default };
        };
        let Some(def) = self.map.get(&trigger) else {
            return KeyDown { note_on: None, suppress_default };
        };

        match self.pressed.entry(trigger) {
            Entry::Occupied(mut held) => {
                // Repeat: keep sounding, refresh for timeout release
                held.insert(now);
                KeyDown { note_on: None, suppress_default }
            }
            Entry::Vacant(slot) => {
                slot.insert(now);
                play(sink, def, "key");
                KeyDown {
                    note_on: Some(def.note),
                    suppress_default,
                }
            }
        }
    }

    /// Release of a physical key. Removal is idempotent: a mapped key always
    /// produces a note-off, held or not.
    pub fn key_up(&mut self, key: Key, sink: &mut dyn NoteSink) -> Option<NoteId> {
        let trigger = input::normalize(key, self.layout)?;
        let def = self.map.get(&trigger)?;
        self.pressed.remove(&trigger);
        stop(sink, &def.note, "key");
        Some(def.note)
    }

    /// Release keys that have gone quiet. Only acts in [`ReleaseMode::Timeout`].
    pub fn check_releases(&mut self, now: Instant, sink: &mut dyn NoteSink) -> Vec<NoteId> {
        let ReleaseMode::Timeout(timeout) = self.release_mode else {
            return Vec::new();
        };

        let mut expired: Vec<TriggerKey> = self
            .pressed
            .iter()
            .filter(|(_, last)| now.saturating_duration_since(**last) > timeout)
            .map(|(t, _)| *t)
            .collect();
        expired.sort_by_key(|t| self.map.index_of(t));

        let mut released = Vec::with_capacity(expired.len());
        for trigger in expired {
            self.pressed.remove(&trigger);
            if let Some(def) = self.map.get(&trigger) {
                stop(sink, &def.note, "timeout");
                released.push(def.note);
            }
        }
        released
    }

    // ── Pointer / touch ───────────────────────────────────────────

    /// Pointer or touch pressed on a key: start a drag and sound the key.
    pub fn pointer_down(
        &mut self,
        trigger: TriggerKey,
        source: PointerSource,
        sink: &mut dyn NoteSink,
    ) -> Option<NoteId> {
        let def = self.map.get(&trigger)?;
        // A press without a release in between (lost up event) must not
        // leave the earlier note sounding.
        if let Some(prev) = self.drag.last_note.take() {
            stop(sink, &prev, "pointer");
        }
        play(sink, def, "pointer");
        self.drag = DragState {
            is_dragging: true,
            dragged_trigger: Some(trigger),
            last_note: Some(def.note),
            source,
        };
        Some(def.note)
    }

    /// Pointer moved onto a key. While dragging onto a different note, the
    /// previous note is stopped before the new one starts.
    pub fn pointer_enter(&mut self, trigger: TriggerKey, sink: &mut dyn NoteSink) -> Option<NoteId> {
        if !self.drag.is_dragging {
            return None;
        }
        let def = self.map.get(&trigger)?;
        if self.drag.last_note == Some(def.note) {
            return None;
        }
        if let Some(prev) = self.drag.last_note.take() {
            stop(sink, &prev, "slide");
        }
        play(sink, def, "slide");
        self.drag.last_note = Some(def.note);
        self.drag.dragged_trigger = Some(trigger);
        Some(def.note)
    }

    /// Pointer or touch released anywhere. Stops the dragged note and clears
    /// the drag entirely.
    pub fn pointer_release(&mut self, sink: &mut dyn NoteSink) -> Option<NoteId> {
        if !self.drag.is_dragging {
            return None;
        }
        let last = self.drag.last_note.take();
        if let Some(note) = &last {
            stop(sink, note, "release");
        }
        self.drag = DragState::default();
        last
    }

    /// Stop everything that is sounding and return to the empty state.
    pub fn release_all(&mut self, sink: &mut dyn NoteSink) -> Vec<NoteId> {
        let mut held: Vec<TriggerKey> = self.pressed.drain().map(|(t, _)| t).collect();
        held.sort_by_key(|t| self.map.index_of(t));

        let mut released = Vec::with_capacity(held.len() + 1);
        for trigger in held {
            if let Some(def) = self.map.get(&trigger) {
                stop(sink, &def.note, "teardown");
                released.push(def.note);
            }
        }
        released.extend(self.pointer_release(sink));
        released
    }
}

fn play(sink: &mut dyn NoteSink, def: &NoteDefinition, via: &str) {
    log::debug!(target: "controller", "note on {} ({:.2} Hz) via {}", def.note, def.frequency, via);
    sink.note_on(def.frequency, &def.note);
}

fn stop(sink: &mut dyn NoteSink, note: &NoteId, via: &str) {
    log::debug!(target: "controller", "note off {} via {}", note, via);
    sink.note_off(note);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{NoteEvent, RecordingSink};
    use pianola_types::PitchClass;

    fn controller() -> NoteController {
        NoteController::two_octaves().unwrap()
    }

    fn note(p: PitchClass, o: i8) -> NoteId {
        NoteId::new(p, o)
    }

    #[test]
    fn key_repeat_is_suppressed() {
        let mut c = controller();
        let mut sink = RecordingSink::new();
        let now = Instant::now();
        let first = c.key_down(Key::Char('a'), now, &mut sink);
        let second = c.key_down(Key::Char('a'), now, &mut sink);
        assert_eq!(first.note_on, Some(note(PitchClass::C, 4)));
        assert_eq!(second.note_on, None);
        assert_eq!(sink.note_ons(), 1);
    }

    #[test]
    fn shifted_key_counts_as_same_key() {
        let mut c = controller();
        let mut sink = RecordingSink::new();
        let now = Instant::now();
        c.key_down(Key::Char(';'), now, &mut sink);
        c.key_down(Key::Char(':'), now, &mut sink);
        assert_eq!(sink.note_ons(), 1);
        c.key_up(Key::Char(':'), &mut sink);
        assert!(!c.is_key_held(&TriggerKey::Char(';')));
    }

    #[test]
    fn key_up_without_down_still_stops() {
        let mut c = controller();
        let mut sink = RecordingSink::new();
        assert_eq!(c.key_up(Key::Char('s'), &mut sink), Some(note(PitchClass::D, 4)));
        assert_eq!(sink.note_offs(), 1);
    }

    #[test]
    fn unmapped_key_up_is_ignored() {
        let mut c = controller();
        let mut sink = RecordingSink::new();
        assert_eq!(c.key_up(Key::Char('q'), &mut sink), None);
        assert!(sink.is_empty());
    }

    #[test]
    fn enter_plays_and_suppresses_default() {
        let mut c = controller();
        let mut sink = RecordingSink::new();
        let out = c.key_down(Key::Enter, Instant::now(), &mut sink);
        assert_eq!(out.note_on, Some(note(PitchClass::G, 5)));
        assert!(out.suppress_default);
    }

    #[test]
    fn space_suppresses_default_without_note() {
        let mut c = controller();
        let mut sink = RecordingSink::new();
        let out = c.key_down(Key::Space, Instant::now(), &mut sink);
        assert_eq!(out, KeyDown { note_on: None, suppress_default: true });
        assert!(sink.is_empty());
    }

    #[test]
    fn slide_onto_same_note_is_noop() {
        let mut c = controller();
        let mut sink = RecordingSink::new();
        c.pointer_down(TriggerKey::Char('a'), PointerSource::Mouse, &mut sink);
        assert_eq!(c.pointer_enter(TriggerKey::Char('a'), &mut sink), None);
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn enter_without_drag_is_ignored() {
        let mut c = controller();
        let mut sink = RecordingSink::new();
        assert_eq!(c.pointer_enter(TriggerKey::Char('s'), &mut sink), None);
        assert!(sink.is_empty());
    }

    #[test]
    fn second_press_without_release_stops_first() {
        let mut c = controller();
        let mut sink = RecordingSink::new();
        c.pointer_down(TriggerKey::Char('a'), PointerSource::Touch, &mut sink);
        c.pointer_down(TriggerKey::Char('s'), PointerSource::Touch, &mut sink);
        let events: Vec<_> = sink.events().cloned().collect();
        assert_eq!(events[1], NoteEvent::Off { note: note(PitchClass::C, 4) });
        assert_eq!(c.drag().source, PointerSource::Touch);
    }

    #[test]
    fn pressed_query_covers_both_channels() {
        let mut c = controller();
        let mut sink = RecordingSink::new();
        c.key_down(Key::Char('a'), Instant::now(), &mut sink);
        c.pointer_down(TriggerKey::Char('k'), PointerSource::Mouse, &mut sink);
        assert!(c.is_pressed(&TriggerKey::Char('a')));
        assert!(c.is_pressed(&TriggerKey::Char('k')));
        assert!(!c.is_pressed(&TriggerKey::Char('s')));
        c.pointer_release(&mut sink);
        assert!(!c.is_pressed(&TriggerKey::Char('k')));
    }

    #[test]
    fn timeout_release_after_quiet_period() {
        let timeout = Duration::from_millis(150);
        let mut c = controller().with_release_mode(ReleaseMode::Timeout(timeout));
        let mut sink = RecordingSink::new();
        let t0 = Instant::now();
        c.key_down(Key::Char('a'), t0, &mut sink);

        assert!(c.check_releases(t0 + Duration::from_millis(100), &mut sink).is_empty());
        // Repeat refreshes the hold
        c.key_down(Key::Char('a'), t0 + Duration::from_millis(140), &mut sink);
        assert!(c.check_releases(t0 + Duration::from_millis(200), &mut sink).is_empty());

        let released = c.check_releases(t0 + Duration::from_millis(400), &mut sink);
        assert_eq!(released, vec![note(PitchClass::C, 4)]);
        assert_eq!(sink.note_ons(), 1);
        assert_eq!(sink.note_offs(), 1);
        assert!(!c.is_key_held(&TriggerKey::Char('a')));
    }

    #[test]
    fn reported_mode_never_times_out() {
        let mut c = controller();
        let mut sink = RecordingSink::new();
        let t0 = Instant::now();
        c.key_down(Key::Char('a'), t0, &mut sink);
        assert!(c.check_releases(t0 + Duration::from_secs(10), &mut sink).is_empty());
        assert!(c.is_key_held(&TriggerKey::Char('a')));
    }

    #[test]
    fn release_all_stops_everything_in_order() {
        let mut c = controller();
        let mut sink = RecordingSink::new();
        let now = Instant::now();
        c.key_down(Key::Char('d'), now, &mut sink);
        c.key_down(Key::Char('a'), now, &mut sink);
        c.pointer_down(TriggerKey::Char('k'), PointerSource::Mouse, &mut sink);
        sink.clear();

        let released = c.release_all(&mut sink);
        assert_eq!(
            released,
            vec![note(PitchClass::C, 4), note(PitchClass::E, 4), note(PitchClass::C, 5)]
        );
        assert_eq!(sink.note_offs(), 3);
        assert_eq!(c.pressed_keys().count(), 0);
        assert_eq!(c.drag(), &DragState::default());
    }

    #[test]
    fn colemak_layout_maps_physical_position() {
        let mut c = controller().with_layout(KeyboardLayout::Colemak);
        let mut sink = RecordingSink::new();
        // Colemak 'r' is the QWERTY 's' key: D4
        let out = c.key_down(Key::Char('r'), Instant::now(), &mut sink);
        assert_eq!(out.note_on, Some(note(PitchClass::D, 4)));
    }
}
