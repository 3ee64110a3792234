//! A 16-step drum machine: a polled, drift-free MIDI clock drives a pattern
//! and two periodic fills, and a mixer sums the triggered samples into the
//! audio device's callback.

pub mod audio;
pub mod audio_api;
pub mod clock;
pub mod error;
pub mod loader;
pub mod middle;
pub mod midi;
pub mod pipeline;
pub mod sequencer;
pub mod shared;
pub mod tui;
