//! Pulse/step clock driven by polling.
//!
//! There is no timer interrupt behind this: the control loop calls
//! [`Clock::update_at`] as often as it likes and the clock works out how many
//! 24-PPQN pulses fit into the time since the last call. Whatever is left over
//! (less than one pulse) is carried into the next call, so the pulse rate
//! never drifts no matter how irregular the polling is.

use std::time::Instant;

use crate::midi::MidiSink;
use crate::shared::{NUM_STEPS, PPQN, PULSES_PER_STEP};

pub fn seconds_per_pulse(bpm: f64) -> f64 {
    (60.0 / bpm) / PPQN as f64
}

/// What one call to [`Clock::update_at`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tick {
    pub step: u8,
    /// Step boundaries crossed during the call; more than 16 after a long stall.
    pub boundaries: u32,
}

pub struct Clock<M: MidiSink> {
    midi: M,
    seconds_per_pulse: f64,
    running: bool,
    pulse: u32, // 0..PPQN
    step: u8,   // 0..NUM_STEPS
    carry: f64, // always in [0, seconds_per_pulse)
    last_time: Instant,
    pulses_emitted: u64,
}

impl<M: MidiSink> Clock<M> {
    pub fn new(bpm: f64, midi: M, now: Instant) -> Self {
        Self {
            midi,
            seconds_per_pulse: seconds_per_pulse(bpm),
            running: false,
            pulse: 0,
            step: 0,
            carry: 0.0,
            last_time: now,
            pulses_emitted: 0,
        }
    }

    /// Realign so the very next pulse is a step boundary (step 0 plays there),
    /// then run.
    pub fn start_at(&mut self, now: Instant) {
        self.pulse = PPQN - 1;
        self.step = 0;
        self.carry = 0.0;
        self.last_time = now;
        self.running = true;
        self.midi.send_start();
        log::debug!("clock started, {:.6}s per pulse", self.seconds_per_pulse);
    }

    /// Pulse and step are left alone so `resume` picks up mid-pattern.
    pub fn stop(&mut self) {
        self.running = false;
        self.midi.send_stop();
        log::debug!("clock stopped at step {} pulse {}", self.step, self.pulse);
    }

    pub fn resume(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.midi.send_continue();
    }

    /// Consume the time since the last call, firing every whole pulse in it.
    /// The step in the result is current whether or not the clock is running.
    pub fn update_at(&mut self, now: Instant) -> Tick {
        let since_last = now.saturating_duration_since(self.last_time).as_secs_f64();
        let mut elapsed = since_last + self.carry;
        let mut boundaries = 0;

        while elapsed >= self.seconds_per_pulse {
            elapsed -= self.seconds_per_pulse;
            if self.running && self.advance_pulse() {
                boundaries += 1;
            }
        }

        self.carry = elapsed;
        self.last_time = now;
        Tick { step: self.step, boundaries }
    }

    // true when the pulse lands on a step boundary
    fn advance_pulse(&mut self) -> bool {
        self.pulse = (self.pulse + 1) % PPQN;
        self.pulses_emitted += 1;
        self.midi.send_clock_pulse();
        if self.pulse % PULSES_PER_STEP != 0 {
            return false;
        }
        self.step = (self.step + 1) % NUM_STEPS as u8;
        true
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn step(&self) -> u8 {
        self.step
    }

    pub fn pulse(&self) -> u32 {
        self.pulse
    }

    pub fn carry(&self) -> f64 {
        self.carry
    }

    pub fn seconds_per_pulse(&self) -> f64 {
        self.seconds_per_pulse
    }

    pub fn pulses_emitted(&self) -> u64 {
        self.pulses_emitted
    }

    pub fn midi(&self) -> &M {
        &self.midi
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::midi::RecordingSink;
    use std::time::Duration;

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    #[test]
    fn seconds_per_pulse_at_120() {
        let spp = seconds_per_pulse(120.0);
        assert!((spp - 0.0208333).abs() < 1e-6);
    }

    #[test]
    fn carry_stays_below_one_pulse() {
        let t0 = Instant::now();
        let mut clock = Clock::new(133.0, RecordingSink::default(), t0);
        clock.start_at(t0);

        let mut t = t0;
        // deliberately irregular polling, some gaps much longer than a pulse
        for i in 0..500u64 {
            t += Duration::from_micros(1_000 + (i * 7919) % 90_000);
            clock.update_at(t);
            let carry = clock.carry();
            assert!(carry >= 0.0);
            assert!(carry < clock.seconds_per_pulse());
        }
    }

    #[test]
    fn pulse_count_matches_elapsed_time() {
        let t0 = Instant::now();
        let mut clock = Clock::new(120.0, RecordingSink::default(), t0);
        clock.start_at(t0);

        let mut t = t0;
        let mut total = 0.0;
        for i in 0..1000u64 {
            let dt = 0.003 + ((i * 31) % 17) as f64 * 0.0011;
            total += dt;
            t = t0 + secs(total);
            clock.update_at(t);
        }

        let expected = (total / clock.seconds_per_pulse()).floor() as u64;
        assert_eq!(clock.pulses_emitted(), expected);
        assert_eq!(clock.midi().pulses as u64, expected);
    }

    #[test]
    fn first_pulse_after_start_is_a_step_boundary() {
        let t0 = Instant::now();
        let mut clock = Clock::new(120.0, RecordingSink::default(), t0);
        clock.start_at(t0);
        assert_eq!(clock.step(), 0);

        let spp = clock.seconds_per_pulse();
        assert_eq!(clock.update_at(t0 + secs(spp * 0.5)), Tick { step: 0, boundaries: 0 });
        assert_eq!(clock.update_at(t0 + secs(spp * 1.01)), Tick { step: 1, boundaries: 1 });
        assert_eq!(clock.pulse(), 0);
    }

    #[test]
    fn step_changes_every_sixth_of_a_beat() {
        let t0 = Instant::now();
        let mut clock = Clock::new(120.0, RecordingSink::default(), t0);
        clock.start_at(t0);
        let spp = clock.seconds_per_pulse();

        assert_eq!(clock.update_at(t0 + secs(spp * 1.01)).step, 1);
        // about 0.125s later, six pulses
        assert_eq!(clock.update_at(t0 + secs(spp * 1.01 + 0.12)).step, 1);
        assert_eq!(clock.update_at(t0 + secs(spp * 1.01 + 0.126)).step, 2);
    }

    #[test]
    fn long_gap_catches_up_every_pulse() {
        let t0 = Instant::now();
        let mut clock = Clock::new(120.0, RecordingSink::default(), t0);
        clock.start_at(t0);
        let spp = clock.seconds_per_pulse();

        // 3 whole steps plus the boundary pulse, in one call
        let tick = clock.update_at(t0 + secs(spp * 19.5));
        assert_eq!(clock.pulses_emitted(), 19);
        assert_eq!(tick, Tick { step: 4, boundaries: 4 });
    }

    #[test]
    fn stall_longer_than_a_bar_counts_every_boundary() {
        let t0 = Instant::now();
        let mut clock = Clock::new(120.0, RecordingSink::default(), t0);
        clock.start_at(t0);
        let spp = clock.seconds_per_pulse();

        // 97 pulses: the boundary pulse plus sixteen more steps
        let tick = clock.update_at(t0 + secs(spp * 97.5));
        assert_eq!(clock.pulses_emitted(), 97);
        assert_eq!(tick, Tick { step: 1, boundaries: 17 });

        // exactly one more bar lands on the same step number
        let tick = clock.update_at(t0 + secs(spp * 193.5));
        assert_eq!(tick, Tick { step: 1, boundaries: 16 });
    }

    #[test]
    fn stopped_clock_keeps_phase_and_sends_nothing() {
        let t0 = Instant::now();
        let mut clock = Clock::new(120.0, RecordingSink::default(), t0);
        clock.start_at(t0);
        let spp = clock.seconds_per_pulse();

        clock.update_at(t0 + secs(spp * 8.5));
        let (step, pulse) = (clock.step(), clock.pulse());
        clock.stop();

        let after = clock.update_at(t0 + secs(spp * 100.5));
        assert_eq!(after, Tick { step, boundaries: 0 });
        assert_eq!(clock.pulse(), pulse);
        assert_eq!(clock.midi().pulses, 8);
        assert!(clock.carry() < spp);

        clock.resume();
        clock.update_at(t0 + secs(spp * 101.6));
        assert_eq!(clock.pulse(), (pulse + 1) % PPQN);
        assert_eq!(clock.midi().stops, 1);
        assert_eq!(clock.midi().continues, 1);
    }

    #[test]
    fn restart_realigns_to_step_zero() {
        let t0 = Instant::now();
        let mut clock = Clock::new(120.0, RecordingSink::default(), t0);
        clock.start_at(t0);
        let spp = clock.seconds_per_pulse();
        clock.update_at(t0 + secs(spp * 40.5));
        assert_ne!(clock.step(), 0);

        clock.stop();
        let t1 = t0 + secs(spp * 45.0);
        clock.start_at(t1);
        assert_eq!(clock.update_at(t1 + secs(spp * 1.2)).step, 1);
        assert_eq!(clock.midi().starts, 2);
    }
}
