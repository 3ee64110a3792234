// The middle layer owns the clock, the sequencer and the control-side mixer
// handle. main feeds it keys and calls tick() on every pass of the loop; the
// tui just draws whatever display_state() returns.

use std::time::Instant;

use crate::audio::SampleId;
use crate::audio_api::MixerHandle;
use crate::clock::Clock;
use crate::midi::MidiSink;
use crate::sequencer::{FillId, Sequencer};
use crate::shared::{Action, DisplayState, FillView, Key, NUM_STEPS};

pub struct Middle<M: MidiSink> {
    clock: Clock<M>,
    sequencer: Sequencer,
    mixer: MixerHandle,
    bpm: f64,
    online: bool,
}

impl<M: MidiSink> Middle<M> {
    pub fn new(bpm: f64, midi: M, sequencer: Sequencer, mixer: MixerHandle, now: Instant) -> Self {
        Self {
            clock: Clock::new(bpm, midi, now),
            sequencer,
            mixer,
            bpm,
            online: true,
        }
    }

    pub fn handle_key(&mut self, key: Key, now: Instant) {
        for action in self.sequencer.handle_key(key) {
            match action {
                Action::Play(id) => self.trigger(&id),
                Action::Start => self.clock.start_at(now),
                Action::Stop => self.clock.stop(),
                Action::Resume => self.clock.resume(),
                Action::Shutdown => {
                    if self.clock.is_running() {
                        self.clock.stop();
                    }
                    self.online = false;
                }
            }
        }
    }

    /// One pass of the control loop: run the clock up to `now` and trigger
    /// whatever each step it crossed calls for. Returns what was triggered.
    pub fn tick(&mut self, now: Instant) -> Vec<SampleId> {
        let tick = self.clock.update_at(now);
        let due = self.sequencer.advance(tick.boundaries);
        for id in &due {
            self.trigger(id);
        }
        due
    }

    // a bad sample costs one missed hit, nothing more
    fn trigger(&self, id: &SampleId) {
        if let Err(e) = self.mixer.trigger(id) {
            log::warn!("trigger dropped: {e}");
        }
    }

    pub fn is_online(&self) -> bool {
        self.online
    }

    pub fn clock(&self) -> &Clock<M> {
        &self.clock
    }

    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    pub fn display_state(&self) -> DisplayState {
        let seq = &self.sequencer;
        let fill_view = |id: FillId| {
            let fill = seq.fill(id);
            fill.sample.sample().map(|s| FillView {
                name: s.to_string(),
                interval: fill.interval,
            })
        };

        DisplayState {
            playing: self.clock.is_running(),
            muted: seq.is_muted(),
            // the cursor sits one past the step that just played
            step: (seq.cursor() + NUM_STEPS as u8 - 1) % NUM_STEPS as u8,
            pattern: seq.pattern().occupancy(),
            fills: [fill_view(FillId::Fill1), fill_view(FillId::Fill2)],
            fills_on: [seq.fill(FillId::Fill1).enabled, seq.fill(FillId::Fill2).enabled],
            taps: seq.banks().taps().map(|t| t.map(SampleId::to_string)),
            bank_index: seq.banks().index(),
            bank_count: seq.banks().len(),
            prompt: seq.mode().prompt(),
            bpm: self.bpm,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::audio::{Mixer, PcmBuffer};
    use crate::audio_api::command_queue;
    use crate::loader::MemorySource;
    use crate::midi::RecordingSink;
    use crate::sequencer::{Fill, Pattern, TapBanks};
    use crate::shared::CHANNELS;

    fn rig(seq: Sequencer, t0: Instant) -> (Middle<RecordingSink>, Mixer) {
        let src = MemorySource::new()
            .with("kick", PcmBuffer::from_interleaved(vec![100; 4000 * CHANNELS]))
            .with("hat", PcmBuffer::from_interleaved(vec![10; 4000 * CHANNELS]));
        let (tx, rx) = command_queue();
        let middle = Middle::new(120.0, RecordingSink::default(), seq, MixerHandle::new(tx, Arc::new(src)), t0);
        (middle, Mixer::new(rx))
    }

    fn at(t0: Instant, secs: f64) -> Instant {
        t0 + Duration::from_secs_f64(secs)
    }

    #[test]
    fn kick_and_hat_reach_the_mixer() {
        let mut pattern = Pattern::default();
        pattern.place(0, SampleId::new("kick"));
        pattern.place(4, SampleId::new("kick"));
        let seq = Sequencer::new(pattern, [Fill::new(SampleId::new("hat"), 4), Fill::default()], TapBanks::default());

        let t0 = Instant::now();
        let (mut middle, mut mixer) = rig(seq, t0);
        middle.handle_key(Key::Char(';'), t0);
        middle.handle_key(Key::Char('='), t0);

        let spp = middle.clock().seconds_per_pulse();
        let first = middle.tick(at(t0, spp * 1.1));
        assert_eq!(first, vec![SampleId::new("hat"), SampleId::new("kick")]);

        let mut out = vec![0i16; 64 * CHANNELS];
        mixer.render(&mut out);
        assert_eq!(mixer.active_voices(), 2);
        assert!(out.iter().all(|&s| s == 110));

        // steps 1..3 are empty, step 4 has both again
        let fourth = middle.tick(at(t0, spp * 25.1));
        assert_eq!(fourth, vec![SampleId::new("hat"), SampleId::new("kick")]);
    }

    #[test]
    fn stalled_loop_still_plays_every_step() {
        let mut pattern = Pattern::default();
        for step in 0..NUM_STEPS {
            pattern.place(step, SampleId::new("kick"));
        }
        let seq = Sequencer::new(pattern, Default::default(), TapBanks::default());

        let t0 = Instant::now();
        let (mut middle, _mixer) = rig(seq, t0);
        middle.handle_key(Key::Char('='), t0);
        let spp = middle.clock().seconds_per_pulse();

        // one poll after more than a bar: 97 pulses, 17 step boundaries
        let due = middle.tick(at(t0, spp * 97.5));
        assert_eq!(middle.clock().midi().pulses, 97);
        assert_eq!(due.len(), 17);
        assert_eq!(middle.sequencer().cursor(), 1);
    }

    #[test]
    fn stop_keeps_voices_and_suppresses_steps() {
        let mut pattern = Pattern::default();
        pattern.place(0, SampleId::new("kick"));
        let seq = Sequencer::new(pattern, Default::default(), TapBanks::default());

        let t0 = Instant::now();
        let (mut middle, mut mixer) = rig(seq, t0);
        middle.handle_key(Key::Char('='), t0);
        let spp = middle.clock().seconds_per_pulse();
        middle.tick(at(t0, spp * 1.5));

        middle.handle_key(Key::Char('-'), at(t0, spp * 2.0));
        // a whole bar passes while stopped
        assert!(middle.tick(at(t0, spp * 200.0)).is_empty());
        assert_eq!(middle.clock().midi().pulses, 1);

        // the kick already triggered still plays out
        let mut out = vec![0i16; 32 * CHANNELS];
        mixer.render(&mut out);
        assert_eq!(mixer.active_voices(), 1);
        assert!(out.iter().all(|&s| s == 100));
    }

    #[test]
    fn tap_goes_straight_to_the_mixer() {
        let banks = TapBanks::new(vec![vec![SampleId::new("hat"), SampleId::new("gone.wav")]]);
        let seq = Sequencer::new(Pattern::default(), Default::default(), banks);
        let t0 = Instant::now();
        let (mut middle, mut mixer) = rig(seq, t0);

        middle.handle_key(Key::Char('a'), t0);
        // missing sample is logged and skipped
        middle.handle_key(Key::Char('s'), t0);

        let mut out = vec![0i16; 8 * CHANNELS];
        mixer.render(&mut out);
        assert_eq!(mixer.active_voices(), 1);
        assert!(out.iter().all(|&s| s == 10));
    }

    #[test]
    fn shutdown_stops_clock() {
        let t0 = Instant::now();
        let (mut middle, _mixer) = rig(Sequencer::default(), t0);
        middle.handle_key(Key::Char('='), t0);
        middle.handle_key(Key::Char('\\'), t0);
        assert!(!middle.is_online());
        assert!(!middle.clock().is_running());
        assert_eq!(middle.clock().midi().stops, 1);
    }

    #[test]
    fn display_reflects_state() {
        let banks = TapBanks::new(vec![vec![SampleId::new("kick")], vec![]]);
        let seq = Sequencer::new(Pattern::default(), Default::default(), banks);
        let t0 = Instant::now();
        let (mut middle, _mixer) = rig(seq, t0);

        for c in "za3 ca'8".chars() {
            let key = if c == ' ' { Key::Space } else { Key::Char(c) };
            middle.handle_key(key, t0);
        }
        middle.handle_key(Key::Enter, t0);

        let ds = middle.display_state();
        assert!(!ds.playing);
        assert!(ds.pattern[2]);
        assert_eq!(ds.fills[0], None);
        assert_eq!(ds.fills[1], Some(FillView { name: "kick".into(), interval: 8 }));
        assert_eq!(ds.taps[0].as_deref(), Some("kick"));
        assert_eq!(ds.bank_count, 2);
        assert!(ds.prompt.is_empty());
    }
}
