//! Pattern, fills and the key gestures that edit them.
//!
//! Everything here runs on the control thread. Keys come in through
//! [`Sequencer::handle_key`], which is one match over the current
//! [`CommandMode`]; clock steps come in through [`Sequencer::advance`],
//! which hands back the samples to trigger.

mod mode;
mod pattern;

pub use mode::CommandMode;
pub use pattern::{normalize_interval, Fill, FillId, Pattern, Slot, TapBanks};

use crate::audio::SampleId;
use crate::shared::{
    step_for_key, tap_for_key, Action, Key, KEY_ADD, KEY_BANK_NEXT, KEY_BANK_PREV, KEY_CHANGE_FILL,
    KEY_DELETE, KEY_FILL1, KEY_FILL2, KEY_MUTE, KEY_RESUME, KEY_SHUTDOWN, KEY_START, KEY_STOP,
    NUM_STEPS,
};

const MAX_INTERVAL_DIGITS: u32 = 2;

#[derive(Clone, Debug, Default)]
pub struct Sequencer {
    pattern: Pattern,
    fills: [Fill; 2],
    banks: TapBanks,
    muted: bool,
    mode: CommandMode,
    cursor: u8, // next step to evaluate
}

impl Sequencer {
    pub fn new(pattern: Pattern, fills: [Fill; 2], banks: TapBanks) -> Self {
        Self {
            pattern,
            fills,
            banks,
            ..Self::default()
        }
    }

    /// Samples due on `step`: fill1, fill2, then the pattern slot.
    pub fn play_step(&self, step: usize) -> Vec<SampleId> {
        let mut due = Vec::with_capacity(3);
        for fill in &self.fills {
            if let Some(id) = fill.fires_on(step) {
                due.push(id.clone());
            }
        }
        if !self.muted {
            if let Some(id) = self.pattern.get(step).sample() {
                due.push(id.clone());
            }
        }
        due
    }

    /// Evaluate one step per boundary the clock crossed, so a burst of pulses
    /// never skips a step, not even when it spans whole bars.
    pub fn advance(&mut self, boundaries: u32) -> Vec<SampleId> {
        let mut due = Vec::new();
        for _ in 0..boundaries {
            due.extend(self.play_step(self.cursor as usize));
            self.cursor = (self.cursor + 1) % NUM_STEPS as u8;
        }
        due
    }

    pub fn handle_key(&mut self, key: Key) -> Vec<Action> {
        let mut actions = Vec::new();

        // Esc gets out from anywhere
        if key == Key::Esc {
            self.mode = CommandMode::Default;
            actions.push(Action::Shutdown);
            return actions;
        }

        let mode = std::mem::take(&mut self.mode);
        self.mode = match (mode, key) {
            (_, Key::Space) => CommandMode::Default,

            (CommandMode::Default, Key::Char(c)) => self.default_key(c, &mut actions),

            (CommandMode::SelectingFillSample, Key::Char(c)) => match self.pick_sample(c) {
                Some(sample) => CommandMode::SelectingFillSlot { sample },
                None => CommandMode::SelectingFillSample,
            },

            (CommandMode::SelectingFillSlot { sample }, Key::Char(KEY_FILL1)) => {
                CommandMode::SelectingFillInterval { sample, fill: FillId::Fill1, entered: None }
            }
            (CommandMode::SelectingFillSlot { sample }, Key::Char(KEY_FILL2)) => {
                CommandMode::SelectingFillInterval { sample, fill: FillId::Fill2, entered: None }
            }

            (CommandMode::SelectingFillInterval { sample, fill, entered }, Key::Char(c)) => {
                match c.to_digit(10) {
                    Some(d) => {
                        let value = entered.unwrap_or(0) * 10 + d;
                        let digits = entered.map_or(1, |_| MAX_INTERVAL_DIGITS);
                        if digits >= MAX_INTERVAL_DIGITS {
                            self.install_fill(fill, sample, value)
                        } else {
                            CommandMode::SelectingFillInterval { sample, fill, entered: Some(value) }
                        }
                    }
                    None => CommandMode::SelectingFillInterval { sample, fill, entered },
                }
            }
            (CommandMode::SelectingFillInterval { sample, fill, entered: Some(value) }, Key::Enter) => {
                self.install_fill(fill, sample, value)
            }

            (CommandMode::SelectingPatternSample, Key::Char(c)) => match self.pick_sample(c) {
                Some(sample) => CommandMode::SelectingPatternSteps { sample },
                None => CommandMode::SelectingPatternSample,
            },

            (CommandMode::SelectingPatternSteps { sample }, Key::Char(c)) => {
                if let Some(step) = step_for_key(c) {
                    self.pattern.place(step, sample.clone());
                }
                CommandMode::SelectingPatternSteps { sample }
            }

            (CommandMode::SelectingRemovalSteps, Key::Char(c)) => {
                if let Some(step) = step_for_key(c) {
                    self.pattern.clear(step);
                }
                CommandMode::SelectingRemovalSteps
            }

            // anything else leaves the gesture where it was
            (mode, _) => mode,
        };

        actions
    }

    fn default_key(&mut self, c: char, actions: &mut Vec<Action>) -> CommandMode {
        match c {
            KEY_START => {
                self.cursor = 0;
                actions.push(Action::Start);
            }
            KEY_STOP => actions.push(Action::Stop),
            KEY_RESUME => actions.push(Action::Resume),
            KEY_SHUTDOWN => actions.push(Action::Shutdown),
            KEY_MUTE => self.muted = !self.muted,
            KEY_FILL1 => self.fills[FillId::Fill1.index()].toggle(),
            KEY_FILL2 => self.fills[FillId::Fill2.index()].toggle(),
            KEY_BANK_PREV => self.banks.prev(),
            KEY_BANK_NEXT => self.banks.next(),
            KEY_CHANGE_FILL => return CommandMode::SelectingFillSample,
            KEY_ADD => return CommandMode::SelectingPatternSample,
            KEY_DELETE => return CommandMode::SelectingRemovalSteps,
            c => {
                if let Some(id) = tap_for_key(c).and_then(|t| self.banks.tap(t)) {
                    actions.push(Action::Play(id.clone()));
                }
            }
        }
        CommandMode::Default
    }

    // tap keys pick from the current bank, bank keys flip pages while picking
    fn pick_sample(&mut self, c: char) -> Option<SampleId> {
        match c {
            KEY_BANK_PREV => {
                self.banks.prev();
                None
            }
            KEY_BANK_NEXT => {
                self.banks.next();
                None
            }
            c => tap_for_key(c).and_then(|t| self.banks.tap(t)).cloned(),
        }
    }

    fn install_fill(&mut self, fill: FillId, sample: SampleId, interval: u32) -> CommandMode {
        let slot = &mut self.fills[fill.index()];
        slot.install(sample, interval);
        log::debug!("{fill:?} <- {:?} every {}", slot.sample, slot.interval);
        CommandMode::Default
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn fill(&self, fill: FillId) -> &Fill {
        &self.fills[fill.index()]
    }

    pub fn banks(&self) -> &TapBanks {
        &self.banks
    }

    pub fn mode(&self) -> &CommandMode {
        &self.mode
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn cursor(&self) -> u8 {
        self.cursor
    }

    /// Every sample the pattern, fills and banks can reach.
    pub fn referenced_samples(&self) -> Vec<SampleId> {
        let mut ids: Vec<SampleId> = self
            .pattern
            .samples()
            .chain(self.fills.iter().filter_map(|f| f.sample.sample()))
            .chain(self.banks.samples())
            .cloned()
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }
}
