//! MIDI clock output.
//!
//! The clock only ever talks to a [`MidiSink`]; the real one wraps a midir
//! output connection, and [`NullSink`] stands in when no port matched.

use anyhow::Context;
use midir::{MidiOutput, MidiOutputConnection};

const MIDI_TIMING_CLOCK: u8 = 0xF8;
const MIDI_START: u8 = 0xFA;
const MIDI_CONTINUE: u8 = 0xFB;
const MIDI_STOP: u8 = 0xFC;

/// Fire-and-forget transport messages.
pub trait MidiSink {
    fn send_start(&mut self);
    fn send_stop(&mut self);
    fn send_clock_pulse(&mut self);

    fn send_continue(&mut self) {}
}

#[derive(Debug, Default)]
pub struct NullSink;

impl MidiSink for NullSink {
    fn send_start(&mut self) {}
    fn send_stop(&mut self) {}
    fn send_clock_pulse(&mut self) {}
}

pub struct MidirSink {
    connection: MidiOutputConnection,
    port_name: String,
}

impl MidirSink {
    /// Open the first output port whose name contains `device`.
    pub fn open(device: &str) -> anyhow::Result<Self> {
        let midi_out = MidiOutput::new("stepbox-clock")
            .map_err(|e| anyhow::anyhow!("failed to create MIDI output: {e}"))?;

        let ports = midi_out.ports();
        let (port, port_name) = ports
            .iter()
            .find_map(|p| {
                let name = midi_out.port_name(p).ok()?;
                name.contains(device).then(|| (p.clone(), name))
            })
            .with_context(|| format!("no MIDI output port matching {device:?}"))?;

        log::info!("Connecting MIDI clock to: {}", port_name);

        let connection = midi_out
            .connect(&port, "stepbox-clock-out")
            .map_err(|e| anyhow::anyhow!("failed to connect to {port_name}: {e}"))?;

        Ok(Self { connection, port_name })
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    fn send(&mut self, byte: u8) {
        if let Err(e) = self.connection.send(&[byte]) {
            log::debug!("MIDI send 0x{byte:02X} failed: {e}");
        }
    }
}

impl MidiSink for MidirSink {
    fn send_start(&mut self) {
        self.send(MIDI_START);
    }

    fn send_stop(&mut self) {
        self.send(MIDI_STOP);
    }

    fn send_clock_pulse(&mut self) {
        self.send(MIDI_TIMING_CLOCK);
    }

    fn send_continue(&mut self) {
        self.send(MIDI_CONTINUE);
    }
}

// Box<dyn MidiSink> is what main hands to the clock
impl<S: MidiSink + ?Sized> MidiSink for Box<S> {
    fn send_start(&mut self) {
        (**self).send_start();
    }

    fn send_stop(&mut self) {
        (**self).send_stop();
    }

    fn send_clock_pulse(&mut self) {
        (**self).send_clock_pulse();
    }

    fn send_continue(&mut self) {
        (**self).send_continue();
    }
}

/// Records every message; used by tests to observe the clock.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordingSink {
    pub starts: usize,
    pub stops: usize,
    pub pulses: usize,
    pub continues: usize,
}

impl MidiSink for RecordingSink {
    fn send_start(&mut self) {
        self.starts += 1;
    }

    fn send_stop(&mut self) {
        self.stops += 1;
    }

    fn send_clock_pulse(&mut self) {
        self.pulses += 1;
    }

    fn send_continue(&mut self) {
        self.continues += 1;
    }
}
