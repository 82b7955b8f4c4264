use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::Result;
use crate::input::{parse_keyboard_layout, KeyboardLayout};
use crate::knob::Knob;
use crate::sink::MidiPortSelector;

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    keyboard: KeyboardConfig,
    #[serde(default)]
    output: OutputConfig,
    #[serde(default)]
    ui: UiConfig,
    knobs: Option<Vec<KnobConfig>>,
}

#[derive(Deserialize, Default)]
struct KeyboardConfig {
    layout: Option<String>,
    release_timeout_ms: Option<u64>,
}

#[derive(Deserialize, Default)]
struct OutputConfig {
    sink: Option<String>,
    osc_addr: Option<String>,
    midi_port: Option<String>,
    midi_channel: Option<u8>,
    velocity: Option<u8>,
}

#[derive(Deserialize, Default)]
struct UiConfig {
    knob_travel_rows: Option<u16>,
}

/// One `[[knobs]]` entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct KnobConfig {
    pub label: String,
    pub min: f64,
    pub max: f64,
    pub default: f64,
    #[serde(default)]
    pub unit: String,
    /// MIDI controller number for the MIDI output.
    pub cc: Option<u8>,
}

impl KnobConfig {
    pub fn build(&self, travel: f64) -> Knob {
        Knob::new(&self.label, self.min, self.max, self.default, &self.unit).with_travel(travel)
    }
}

/// Where note events go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SinkKind {
    #[default]
    Log,
    Osc,
    Midi,
}

pub fn parse_sink_kind(s: &str) -> Option<SinkKind> {
    match s.to_ascii_lowercase().as_str() {
        "log" => Some(SinkKind::Log),
        "osc" => Some(SinkKind::Osc),
        "midi" => Some(SinkKind::Midi),
        _ => None,
    }
}

pub struct Config {
    keyboard: KeyboardConfig,
    output: OutputConfig,
    ui: UiConfig,
    knobs: Vec<KnobConfig>,
}

impl Config {
    /// Embedded defaults merged with the user's config file, if any.
    pub fn load() -> Self {
        match user_config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::defaults(),
        }
    }

    /// Embedded defaults merged with the file at `path`. A missing, unreadable
    /// or malformed file leaves the defaults in place.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::defaults();
        }
        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => config,
                Err(e) => {
                    log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e);
                    Self::defaults()
                }
            },
            Err(e) => {
                log::warn!(target: "config", "could not read config {}: {}", path.display(), e);
                Self::defaults()
            }
        }
    }

    /// Embedded defaults with `user` merged over them.
    pub fn from_toml_str(user: &str) -> Result<Self> {
        let user: ConfigFile = toml::from_str(user)?;
        let mut config = Self::defaults();
        merge_keyboard(&mut config.keyboard, user.keyboard);
        merge_output(&mut config.output, user.output);
        if user.ui.knob_travel_rows.is_some() {
            config.ui.knob_travel_rows = user.ui.knob_travel_rows;
        }
        if let Some(knobs) = user.knobs {
            config.knobs = knobs;
        }
        Ok(config)
    }

    pub fn defaults() -> Self {
        let base: ConfigFile =
            toml::from_str(DEFAULT_CONFIG).expect("Failed to parse embedded config.toml");
        Config {
            keyboard: base.keyboard,
            output: base.output,
            ui: base.ui,
            knobs: base.knobs.unwrap_or_default(),
        }
    }

    pub fn keyboard_layout(&self) -> KeyboardLayout {
        self.keyboard
            .layout
            .as_deref()
            .and_then(parse_keyboard_layout)
            .unwrap_or_default()
    }

    /// Release timeout for terminals that do not report key-up (clamped to 20..2000 ms).
    pub fn release_timeout(&self) -> Duration {
        let ms = self.keyboard.release_timeout_ms.unwrap_or(150).clamp(20, 2000);
        Duration::from_millis(ms)
    }

    pub fn sink_kind(&self) -> SinkKind {
        self.output
            .sink
            .as_deref()
            .and_then(parse_sink_kind)
            .unwrap_or_default()
    }

    pub fn osc_addr(&self) -> &str {
        self.output.osc_addr.as_deref().unwrap_or("127.0.0.1:57120")
    }

    pub fn midi_port(&self) -> Option<MidiPortSelector> {
        self.output.midi_port.as_deref().map(MidiPortSelector::parse)
    }

    /// Zero-based MIDI channel (0..=15).
    pub fn midi_channel(&self) -> u8 {
        self.output.midi_channel.unwrap_or(0).min(15)
    }

    pub fn velocity(&self) -> u8 {
        self.output.velocity.unwrap_or(100).clamp(1, 127)
    }

    pub fn knobs(&self) -> &[KnobConfig] {
        &self.knobs
    }

    pub fn knob_travel_rows(&self) -> u16 {
        self.ui.knob_travel_rows.unwrap_or(20).max(1)
    }

    // Command-line overrides

    pub fn set_sink_kind(&mut self, kind: SinkKind) {
        self.output.sink = Some(
            match kind {
                SinkKind::Log => "log",
                SinkKind::Osc => "osc",
                SinkKind::Midi => "midi",
            }
            .to_string(),
        );
    }

    pub fn set_osc_addr(&mut self, addr: &str) {
        self.output.osc_addr = Some(addr.to_string());
    }

    pub fn set_midi_port(&mut self, port: &str) {
        self.output.midi_port = Some(port.to_string());
    }
}

pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("pianola").join("config.toml"))
}

fn merge_keyboard(base: &mut KeyboardConfig, user: KeyboardConfig) {
    if user.layout.is_some() {
        base.layout = user.layout;
    }
    if user.release_timeout_ms.is_some() {
        base.release_timeout_ms = user.release_timeout_ms;
    }
}

fn merge_output(base: &mut OutputConfig, user: OutputConfig) {
    if user.sink.is_some() {
        base.sink = user.sink;
    }
    if user.osc_addr.is_some() {
        base.osc_addr = user.osc_addr;
    }
    if user.midi_port.is_some() {
        base.midi_port = user.midi_port;
    }
    if user.midi_channel.is_some() {
        base.midi_channel = user.midi_channel;
    }
    if user.velocity.is_some() {
        base.velocity = user.velocity;
    }
}
