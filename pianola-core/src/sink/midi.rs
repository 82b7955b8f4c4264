use std::collections::HashMap;

use midir::{MidiOutput, MidiOutputConnection};
use pianola_types::NoteId;

use super::NoteSink;
use crate::error::{Error, Result};

/// Which output port to open: by position in the port list or by name substring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MidiPortSelector {
    Index(usize),
    Name(String),
}

impl MidiPortSelector {
    pub fn parse(s: &str) -> Self {
        match s.trim().parse::<usize>() {
            Ok(i) => MidiPortSelector::Index(i),
            Err(_) => MidiPortSelector::Name(s.trim().to_string()),
        }
    }

    fn matches(&self, index: usize, name: &str) -> bool {
        match self {
            MidiPortSelector::Index(i) => *i == index,
            MidiPortSelector::Name(n) => name.to_lowercase().contains(&n.to_lowercase()),
        }
    }
}

impl std::fmt::Display for MidiPortSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MidiPortSelector::Index(i) => write!(f, "#{}", i),
            MidiPortSelector::Name(n) => write!(f, "{}", n),
        }
    }
}

pub fn note_on_message(channel: u8, note: u8, velocity: u8) -> [u8; 3] {
    [0x90 | (channel & 0x0F), note & 0x7F, velocity & 0x7F]
}

pub fn note_off_message(channel: u8, note: u8) -> [u8; 3] {
    [0x80 | (channel & 0x0F), note & 0x7F, 0]
}

pub fn control_change_message(channel: u8, controller: u8, value: u8) -> [u8; 3] {
    [0xB0 | (channel & 0x0F), controller & 0x7F, value & 0x7F]
}

/// Zero-based channel, limited to the 16 MIDI channels.
fn clamp_channel(channel: u8) -> u8 {
    channel.min(15)
}

/// Scale `value` in `[min, max]` onto a 7-bit controller value.
fn scale_to_cc(value: f64, min: f64, max: f64) -> u8 {
    if max <= min {
        return 0;
    }
    let norm = ((value - min) / (max - min)).clamp(0.0, 1.0);
    (norm * 127.0).round() as u8
}

#[derive(Debug, Clone, Copy)]
struct CcMapping {
    controller: u8,
    min: f64,
    max: f64,
}

/// Sends note events to a MIDI output port.
pub struct MidiOutSink {
    connection: MidiOutputConnection,
    port_name: String,
    channel: u8,
    velocity: u8,
    params: HashMap<String, CcMapping>,
}

impl MidiOutSink {
    /// Connect to the first port matching `selector`, or the first port at all.
    pub fn open(selector: Option<&MidiPortSelector>, channel: u8, velocity: u8) -> Result<Self> {
        let channel = clamp_channel(channel);
        let midi_out = MidiOutput::new("pianola").map_err(|e| Error::Midi(e.to_string()))?;
        let ports = midi_out.ports();

        let mut chosen = None;
        for (index, port) in ports.iter().enumerate() {
            let Ok(name) = midi_out.port_name(port) else {
                continue;
            };
            if selector.map_or(true, |s| s.matches(index, &name)) {
                chosen = Some((port.clone(), name));
                break;
            }
        }

        let Some((port, port_name)) = chosen else {
            let wanted = selector.map_or_else(|| "any".to_string(), |s| s.to_string());
            return Err(Error::NoMidiPort(wanted));
        };

        let connection = midi_out
            .connect(&port, "pianola-out")
            .map_err(|e| Error::Midi(e.to_string()))?;
        log::info!(target: "sink::midi", "connected to {} (channel {})", port_name, channel + 1);

        Ok(Self {
            connection,
            port_name,
            channel,
            velocity: velocity.clamp(1, 127),
            params: HashMap::new(),
        })
    }

    /// Route knob `label` to controller number `controller`.
    pub fn map_param(&mut self, label: &str, controller: u8, min: f64, max: f64) {
        self.params.insert(
            label.to_string(),
            CcMapping {
                controller: controller & 0x7F,
                min,
                max,
            },
        );
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    fn send(&mut self, message: &[u8]) {
        if let Err(e) = self.connection.send(message) {
            log::warn!(target: "sink::midi", "send to {} failed: {}", self.port_name, e);
        }
    }
}

impl NoteSink for MidiOutSink {
    fn note_on(&mut self, _frequency: f64, note: &NoteId) {
        let msg = note_on_message(self.channel, note.midi_number(), self.velocity);
        self.send(&msg);
    }

    fn note_off(&mut self, note: &NoteId) {
        let msg = note_off_message(self.channel, note.midi_number());
        self.send(&msg);
    }

    fn param_changed(&mut self, label: &str, value: f64) {
        let Some(mapping) = self.params.get(label).copied() else {
            return;
        };
        let msg = control_change_message(
            self.channel,
            mapping.controller,
            scale_to_cc(value, mapping.min, mapping.max),
        );
        self.send(&msg);
    }

    fn name(&self) -> &'static str {
        "midi"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_voice_messages() {
        assert_eq!(note_on_message(0, 60, 100), [0x90, 60, 100]);
        assert_eq!(note_off_message(9, 72), [0x89, 72, 0]);
        assert_eq!(control_change_message(1, 7, 127), [0xB1, 7, 127]);
    }

    #[test]
    fn out_of_range_channel_clamps_before_display() {
        assert_eq!(clamp_channel(3), 3);
        assert_eq!(clamp_channel(255), 15);
        assert_eq!(clamp_channel(255) + 1, 16);
    }

    #[test]
    fn cc_scaling_clamps() {
        assert_eq!(scale_to_cc(0.0, 0.0, 100.0), 0);
        assert_eq!(scale_to_cc(100.0, 0.0, 100.0), 127);
        assert_eq!(scale_to_cc(50.0, 0.0, 100.0), 64);
        assert_eq!(scale_to_cc(-10.0, -50.0, 50.0), 51);
        assert_eq!(scale_to_cc(500.0, 0.0, 100.0), 127);
        assert_eq!(scale_to_cc(1.0, 1.0, 1.0), 0);
    }

    #[test]
    fn selector_parse() {
        assert_eq!(MidiPortSelector::parse("2"), MidiPortSelector::Index(2));
        assert_eq!(
            MidiPortSelector::parse(" FluidSynth "),
            MidiPortSelector::Name("FluidSynth".to_string())
        );
    }

    #[test]
    fn selector_matches_case_insensitive_substring() {
        let sel = MidiPortSelector::Name("fluid".to_string());
        assert!(sel.matches(3, "FLUID Synth (1234)"));
        assert!(!sel.matches(0, "Midi Through"));
        assert!(MidiPortSelector::Index(1).matches(1, "whatever"));
    }
}
