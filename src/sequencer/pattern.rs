use crate::audio::SampleId;
use crate::shared::{BANK_SIZE, NUM_STEPS};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Slot {
    #[default]
    Empty,
    Sample(SampleId),
}

impl Slot {
    pub fn sample(&self) -> Option<&SampleId> {
        match self {
            Slot::Empty => None,
            Slot::Sample(id) => Some(id),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Slot::Empty)
    }
}

impl From<Option<SampleId>> for Slot {
    fn from(id: Option<SampleId>) -> Self {
        id.map_or(Slot::Empty, Slot::Sample)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Pattern {
    slots: [Slot; NUM_STEPS],
}

impl Pattern {
    // extra entries are ignored, missing ones stay empty
    pub fn from_slots(slots: impl IntoIterator<Item = Slot>) -> Self {
        let mut pattern = Self::default();
        for (dst, slot) in pattern.slots.iter_mut().zip(slots) {
            *dst = slot;
        }
        pattern
    }

    pub fn get(&self, step: usize) -> &Slot {
        &self.slots[step % NUM_STEPS]
    }

    pub fn place(&mut self, step: usize, id: SampleId) {
        self.slots[step % NUM_STEPS] = Slot::Sample(id);
    }

    pub fn clear(&mut self, step: usize) {
        self.slots[step % NUM_STEPS] = Slot::Empty;
    }

    pub fn occupancy(&self) -> [bool; NUM_STEPS] {
        std::array::from_fn(|i| !self.slots[i].is_empty())
    }

    pub fn samples(&self) -> impl Iterator<Item = &SampleId> {
        self.slots.iter().filter_map(Slot::sample)
    }
}

// 0 means once per pattern cycle; anything longer than a cycle is the same thing
pub fn normalize_interval(n: u32) -> u8 {
    match n {
        0 => NUM_STEPS as u8,
        n if n > NUM_STEPS as u32 => NUM_STEPS as u8,
        n => n as u8,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FillId {
    Fill1,
    Fill2,
}

impl FillId {
    pub fn index(self) -> usize {
        match self {
            FillId::Fill1 => 0,
            FillId::Fill2 => 1,
        }
    }
}

/// A sample retriggered every `interval` steps while enabled.
#[derive(Clone, Debug, PartialEq)]
pub struct Fill {
    pub sample: Slot,
    pub interval: u8,
    pub enabled: bool,
}

impl Default for Fill {
    fn default() -> Self {
        Self {
            sample: Slot::Empty,
            interval: NUM_STEPS as u8,
            enabled: false,
        }
    }
}

impl Fill {
    pub fn new(sample: SampleId, interval: u32) -> Self {
        Self {
            sample: Slot::Sample(sample),
            interval: normalize_interval(interval),
            enabled: false,
        }
    }

    // the enabled flag is left as it was
    pub fn install(&mut self, sample: SampleId, interval: u32) {
        self.sample = Slot::Sample(sample);
        self.interval = normalize_interval(interval);
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    pub fn fires_on(&self, step: usize) -> Option<&SampleId> {
        if !self.enabled || step % self.interval as usize != 0 {
            return None;
        }
        self.sample.sample()
    }
}

/// Pages of up to eight samples bound to the tap keys.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TapBanks {
    banks: Vec<Vec<SampleId>>,
    index: usize,
}

impl TapBanks {
    // callers validate bank sizes; anything past BANK_SIZE is unreachable anyway
    pub fn new(banks: Vec<Vec<SampleId>>) -> Self {
        Self { banks, index: 0 }
    }

    pub fn tap(&self, slot: usize) -> Option<&SampleId> {
        self.banks.get(self.index)?.get(slot).filter(|_| slot < BANK_SIZE)
    }

    pub fn taps(&self) -> [Option<&SampleId>; BANK_SIZE] {
        std::array::from_fn(|i| self.tap(i))
    }

    pub fn prev(&mut self) {
        if self.banks.is_empty() {
            return;
        }
        self.index = self.index.checked_sub(1).unwrap_or(self.banks.len() - 1);
    }

    pub fn next(&mut self) {
        if self.banks.is_empty() {
            return;
        }
        self.index = (self.index + 1) % self.banks.len();
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.banks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.banks.is_empty()
    }

    pub fn samples(&self) -> impl Iterator<Item = &SampleId> {
        self.banks.iter().flatten()
    }
}
