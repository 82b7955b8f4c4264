use pianola_types::DuplicateTrigger;

/// Errors raised while building the keyboard, loading config, or opening an output.
///
/// The note path itself never fails; see `controller`.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    DuplicateTrigger(#[from] DuplicateTrigger),
    #[error("invalid config: {0}")]
    Config(#[from] toml::de::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("osc: {0}")]
    Osc(String),
    #[error("midi: {0}")]
    Midi(String),
    #[error("no MIDI output port matching {0:?}")]
    NoMidiPort(String),
}

pub type Result<T> = std::result::Result<T, Error>;
