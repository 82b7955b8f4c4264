//! # pianola-core
//!
//! Note lifecycle for a computer-keyboard piano, independent of any UI.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::time::Instant;
//! use pianola_core::controller::NoteController;
//! use pianola_core::input::Key;
//! use pianola_core::sink::LogSink;
//!
//! let mut piano = NoteController::two_octaves()?;
//! let mut sink = LogSink;
//! piano.key_down(Key::Char('a'), Instant::now(), &mut sink); // C4 on
//! piano.key_up(Key::Char('a'), &mut sink);                   // C4 off
//! ```
//!
//! ## Module Overview
//!
//! - [`controller`]: `NoteController`, the keyboard / pointer state machine
//! - [`input`]: host key normalization and layout translation
//! - [`sink`]: the `NoteSink` boundary and its log, recording, OSC and MIDI outputs
//! - [`knob`]: drag/scroll parameter knob
//! - [`viewport`]: fullscreen toggle contract
//! - [`config`]: TOML configuration (embedded defaults + user override)

pub mod config;
pub mod controller;
pub mod error;
pub mod input;
pub mod knob;
pub mod sink;
pub mod viewport;

pub use error::{Error, Result};
