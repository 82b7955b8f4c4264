use std::net::UdpSocket;

use pianola_types::NoteId;
use rosc::{OscMessage, OscPacket, OscType};

use super::NoteSink;
use crate::error::{Error, Result};

/// Sends note events as OSC messages over UDP.
///
/// - `/note_on  <name:s> <freq:f>`
/// - `/note_off <name:s>`
/// - `/param    <label:s> <value:f>`
pub struct OscSink {
    socket: UdpSocket,
    target: String,
}

impl OscSink {
    pub fn new(target: &str) -> Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0")?;
        // resolve now; an unreachable address fails construction
        socket.connect(target)?;
        log::info!(target: "sink::osc", "sending to {}", target);
        Ok(Self {
            socket,
            target: target.to_string(),
        })
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    fn send(&self, msg: OscMessage) -> Result<()> {
        let addr = msg.addr.clone();
        let buf = rosc::encoder::encode(&OscPacket::Message(msg))
            .map_err(|e| Error::Osc(format!("{} encode: {}", addr, e)))?;
        self.socket.send(&buf)?;
        Ok(())
    }

    fn send_logged(&self, msg: OscMessage) {
        if let Err(e) = self.send(msg) {
            log::warn!(target: "sink::osc", "send to {} failed: {}", self.target, e);
        }
    }
}

pub(crate) fn note_on_msg(frequency: f64, note: &NoteId) -> OscMessage {
    OscMessage {
        addr: "/note_on".to_string(),
        args: vec![OscType::String(note.to_string()), OscType::Float(frequency as f32)],
    }
}

pub(crate) fn note_off_msg(note: &NoteId) -> OscMessage {
    OscMessage {
        addr: "/note_off".to_string(),
        args: vec![OscType::String(note.to_string())],
    }
}

pub(crate) fn param_msg(label: &str, value: f64) -> OscMessage {
    OscMessage {
        addr: "/param".to_string(),
        args: vec![OscType::String(label.to_string()), OscType::Float(value as f32)],
    }
}

impl NoteSink for OscSink {
    fn note_on(&mut self, frequency: f64, note: &NoteId) {
        self.send_logged(note_on_msg(frequency, note));
    }

    fn note_off(&mut self, note: &NoteId) {
        self.send_logged(note_off_msg(note));
    }

    fn param_changed(&mut self, label: &str, value: f64) {
        self.send_logged(param_msg(label, value));
    }

    fn name(&self) -> &'static str {
        "osc"
    }
}
