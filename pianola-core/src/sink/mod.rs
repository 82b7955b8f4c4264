//! Note output: the boundary between the keyboard and whatever makes sound.

mod midi;
mod osc;

pub use midi::{control_change_message, note_off_message, note_on_message, MidiOutSink, MidiPortSelector};
pub use osc::OscSink;

use std::collections::VecDeque;

use pianola_types::NoteId;

use crate::config::{Config, SinkKind};
use crate::error::Result;

/// Receiver of note transitions and parameter changes.
///
/// Calls are infallible: implementations log and swallow their own send errors.
pub trait NoteSink {
    fn note_on(&mut self, frequency: f64, note: &NoteId);
    fn note_off(&mut self, note: &NoteId);
    fn param_changed(&mut self, _label: &str, _value: f64) {}
    fn name(&self) -> &'static str;
}

impl<S: NoteSink + ?Sized> NoteSink for Box<S> {
    fn note_on(&mut self, frequency: f64, note: &NoteId) {
        (**self).note_on(frequency, note)
    }

    fn note_off(&mut self, note: &NoteId) {
        (**self).note_off(note)
    }

    fn param_changed(&mut self, label: &str, value: f64) {
        (**self).param_changed(label, value)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// A single call made on a sink.
#[derive(Debug, Clone, PartialEq)]
pub enum NoteEvent {
    On { note: NoteId, frequency: f64 },
    Off { note: NoteId },
    Param { label: String, value: f64 },
}

impl std::fmt::Display for NoteEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoteEvent::On { note, frequency } => write!(f, "on  {} {:.2} Hz", note, frequency),
            NoteEvent::Off { note } => write!(f, "off {}", note),
            NoteEvent::Param { label, value } => write!(f, "{} = {:.1}", label, value),
        }
    }
}

/// Writes every event to the log. Used when no synth is configured.
#[derive(Debug, Default)]
pub struct LogSink;

impl NoteSink for LogSink {
    fn note_on(&mut self, frequency: f64, note: &NoteId) {
        log::info!(target: "sink", "note on {} ({:.2} Hz)", note, frequency);
    }

    fn note_off(&mut self, note: &NoteId) {
        log::info!(target: "sink", "note off {}", note);
    }

    fn param_changed(&mut self, label: &str, value: f64) {
        log::info!(target: "sink", "{} = {:.2}", label, value);
    }

    fn name(&self) -> &'static str {
        "log"
    }
}

/// Keeps the most recent events in memory, oldest first.
#[derive(Debug)]
pub struct RecordingSink {
    events: VecDeque<NoteEvent>,
    limit: usize,
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::with_limit(usize::MAX)
    }

    /// Retain at most `limit` events, dropping the oldest.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            events: VecDeque::new(),
            limit: limit.max(1),
        }
    }

    pub fn events(&self) -> impl Iterator<Item = &NoteEvent> {
        self.events.iter()
    }

    pub fn last(&self) -> Option<&NoteEvent> {
        self.events.back()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn note_ons(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, NoteEvent::On { .. }))
            .count()
    }

    pub fn note_offs(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, NoteEvent::Off { .. }))
            .count()
    }

    fn push(&mut self, event: NoteEvent) {
        if self.events.len() == self.limit {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

impl NoteSink for RecordingSink {
    fn note_on(&mut self, frequency: f64, note: &NoteId) {
        self.push(NoteEvent::On {
            note: *note,
            frequency,
        });
    }

    fn note_off(&mut self, note: &NoteId) {
        self.push(NoteEvent::Off { note: *note });
    }

    fn param_changed(&mut self, label: &str, value: f64) {
        self.push(NoteEvent::Param {
            label: label.to_string(),
            value,
        });
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Forwards every call to two sinks, `primary` first.
pub struct Tee<A, B> {
    pub primary: A,
    pub secondary: B,
}

impl<A: NoteSink, B: NoteSink> NoteSink for Tee<A, B> {
    fn note_on(&mut self, frequency: f64, note: &NoteId) {
        self.primary.note_on(frequency, note);
        self.secondary.note_on(frequency, note);
    }

    fn note_off(&mut self, note: &NoteId) {
        self.primary.note_off(note);
        self.secondary.note_off(note);
    }

    fn param_changed(&mut self, label: &str, value: f64) {
        self.primary.param_changed(label, value);
        self.secondary.param_changed(label, value);
    }

    fn name(&self) -> &'static str {
        self.primary.name()
    }
}

/// Open the output selected in config.
pub fn open_sink(config: &Config) -> Result<Box<dyn NoteSink>> {
    match config.sink_kind() {
        SinkKind::Log => Ok(Box::new(LogSink)),
        SinkKind::Osc => Ok(Box::new(OscSink::new(config.osc_addr())?)),
        SinkKind::Midi => {
            let mut sink = MidiOutSink::open(
                config.midi_port().as_ref(),
                config.midi_channel(),
                config.velocity(),
            )?;
            for knob in config.knobs() {
                if let Some(cc) = knob.cc {
                    sink.map_param(&knob.label, cc, knob.min, knob.max);
                }
            }
            Ok(Box::new(sink))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pianola_types::PitchClass;

    #[test]
    fn recording_sink_keeps_order() {
        let mut sink = RecordingSink::new();
        let c4 = NoteId::new(PitchClass::C, 4);
        sink.note_on(261.63, &c4);
        sink.note_off(&c4);
        let events: Vec<_> = sink.events().cloned().collect();
        assert_eq!(
            events,
            vec![
                NoteEvent::On { note: c4, frequency: 261.63 },
                NoteEvent::Off { note: c4 },
            ]
        );
        assert_eq!(sink.note_ons(), 1);
        assert_eq!(sink.note_offs(), 1);
    }

    #[test]
    fn recording_sink_limit_drops_oldest() {
        let mut sink = RecordingSink::with_limit(2);
        let c4 = NoteId::new(PitchClass::C, 4);
        let d4 = NoteId::new(PitchClass::D, 4);
        sink.note_on(261.63, &c4);
        sink.note_on(293.66, &d4);
        sink.note_off(&d4);
        assert_eq!(sink.len(), 2);
        assert_eq!(sink.last(), Some(&NoteEvent::Off { note: d4 }));
        assert_eq!(sink.note_ons(), 1);
    }

    #[test]
    fn tee_forwards_to_both() {
        let mut tee = Tee {
            primary: RecordingSink::new(),
            secondary: RecordingSink::new(),
        };
        tee.param_changed("Volume", 50.0);
        assert_eq!(tee.primary.len(), 1);
        assert_eq!(tee.secondary.len(), 1);
        assert_eq!(tee.name(), "recording");
    }

    #[test]
    fn event_display() {
        let a4 = NoteId::new(PitchClass::A, 4);
        let on = NoteEvent::On { note: a4, frequency: 440.0 };
        assert_eq!(on.to_string(), "on  A4 440.00 Hz");
        assert_eq!(NoteEvent::Off { note: a4 }.to_string(), "off A4");
    }
}
