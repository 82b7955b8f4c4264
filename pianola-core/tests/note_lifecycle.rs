//! End-to-end note sequences through the controller, observed at the sink.

use std::time::Instant;

use pianola_core::controller::{NoteController, PointerSource};
use pianola_core::input::Key;
use pianola_core::sink::{NoteEvent, RecordingSink};
use pianola_types::{NoteId, PitchClass, TriggerKey};

fn piano() -> NoteController {
    NoteController::two_octaves().expect("standard layout builds")
}

/// The host key that produces `trigger`.
fn host_key(trigger: TriggerKey) -> Key {
    match trigger {
        TriggerKey::Char(c) => Key::Char(c),
        TriggerKey::Enter => Key::Enter,
    }
}

fn events(sink: &RecordingSink) -> Vec<NoteEvent> {
    sink.events().cloned().collect()
}

#[test]
fn double_key_down_yields_one_note_on_for_every_key() {
    let triggers: Vec<TriggerKey> = piano().map().triggers().copied().collect();
    for trigger in triggers {
        let mut c = piano();
        let mut sink = RecordingSink::new();
        let now = Instant::now();
        c.key_down(host_key(trigger), now, &mut sink);
        c.key_down(host_key(trigger), now, &mut sink);
        assert_eq!(sink.note_ons(), 1, "trigger {:?}", trigger);
        assert_eq!(sink.note_offs(), 0);
    }
}

#[test]
fn key_down_then_up_is_one_on_then_one_off_for_every_key() {
    let defs = piano().map().notes().to_vec();
    for def in defs {
        let mut c = piano();
        let mut sink = RecordingSink::new();
        c.key_down(host_key(def.trigger), Instant::now(), &mut sink);
        c.key_up(host_key(def.trigger), &mut sink);
        assert_eq!(
            events(&sink),
            vec![
                NoteEvent::On { note: def.note, frequency: def.frequency },
                NoteEvent::Off { note: def.note },
            ]
        );
        assert!(!c.is_pressed(&def.trigger));
    }
}

#[test]
fn drag_across_keys_stops_before_starting() {
    let mut c = piano();
    let mut sink = RecordingSink::new();
    let c4 = NoteId::new(PitchClass::C, 4);
    let d4 = NoteId::new(PitchClass::D, 4);

    c.pointer_down(TriggerKey::Char('a'), PointerSource::Mouse, &mut sink);
    c.pointer_enter(TriggerKey::Char('s'), &mut sink);

    assert_eq!(
        events(&sink),
        vec![
            NoteEvent::On { note: c4, frequency: 261.63 },
            NoteEvent::Off { note: c4 },
            NoteEvent::On { note: d4, frequency: 293.66 },
        ]
    );
    assert_eq!(c.drag().dragged_trigger, Some(TriggerKey::Char('s')));
    assert_eq!(c.drag().last_note, Some(d4));
}

#[test]
fn release_anywhere_stops_last_note_and_resets() {
    let mut c = piano();
    let mut sink = RecordingSink::new();
    let e4 = NoteId::new(PitchClass::E, 4);

    c.pointer_down(TriggerKey::Char('a'), PointerSource::Touch, &mut sink);
    c.pointer_enter(TriggerKey::Char('s'), &mut sink);
    c.pointer_enter(TriggerKey::Char('d'), &mut sink);
    sink.clear();

    assert_eq!(c.pointer_release(&mut sink), Some(e4));
    assert_eq!(events(&sink), vec![NoteEvent::Off { note: e4 }]);
    assert!(!c.drag().is_dragging);
    assert_eq!(c.drag().dragged_trigger, None);
    assert_eq!(c.drag().last_note, None);

    // A second release is a no-op
    assert_eq!(c.pointer_release(&mut sink), None);
    assert_eq!(sink.len(), 1);

    // Next press starts a fresh sequence with no stray note-off
    sink.clear();
    c.pointer_down(TriggerKey::Char('g'), PointerSource::Mouse, &mut sink);
    assert_eq!(sink.note_ons(), 1);
    assert_eq!(sink.note_offs(), 0);
}

#[test]
fn triggers_are_disjoint_across_octaves() {
    let c = piano();
    let lower: Vec<TriggerKey> = c.map().notes()[..12].iter().map(|n| n.trigger).collect();
    let upper: Vec<TriggerKey> = c.map().notes()[12..].iter().map(|n| n.trigger).collect();
    for t in &upper {
        assert!(!lower.contains(t), "{:?} used in both octaves", t);
    }
    for t in c.map().triggers() {
        let def = c.map().get(t).unwrap();
        assert_eq!(&def.trigger, t);
    }
}

#[test]
fn transposed_c5_doubles_c4() {
    let c = piano();
    let c4 = c.map().get(&TriggerKey::Char('a')).unwrap();
    let c5 = c.map().get(&TriggerKey::Char('k')).unwrap();
    assert_eq!(c4.frequency, 261.63);
    assert_eq!(c5.frequency, 523.26);
    assert_eq!(c5.position, c4.position + 7);
    assert_eq!(c5.note, NoteId::new(PitchClass::C, 5));
}

#[test]
fn unmapped_key_down_changes_nothing() {
    let mut c = piano();
    let mut sink = RecordingSink::new();
    for key in [Key::Char('q'), Key::Char('1'), Key::Char('/'), Key::Tab, Key::Other] {
        let out = c.key_down(key, Instant::now(), &mut sink);
        assert_eq!(out.note_on, None);
    }
    assert!(sink.is_empty());
    assert_eq!(c.pressed_keys().count(), 0);
}

#[test]
fn rapid_clicks_on_one_key_are_not_coalesced() {
    let mut c = piano();
    let mut sink = RecordingSink::new();
    for _ in 0..3 {
        c.pointer_down(TriggerKey::Char('h'), PointerSource::Mouse, &mut sink);
        c.pointer_release(&mut sink);
    }
    assert_eq!(sink.note_ons(), 3);
    assert_eq!(sink.note_offs(), 3);
}

#[test]
fn keyboard_and_pointer_channels_are_independent() {
    let mut c = piano();
    let mut sink = RecordingSink::new();
    c.key_down(Key::Char('a'), Instant::now(), &mut sink);
    c.pointer_down(TriggerKey::Char('s'), PointerSource::Mouse, &mut sink);
    c.pointer_release(&mut sink);
    // Releasing the pointer leaves the held key sounding
    assert!(c.is_pressed(&TriggerKey::Char('a')));
    assert_eq!(sink.note_offs(), 1);
}
