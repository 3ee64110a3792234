// The current key plan:
//
// Transport:
//   =             //  start (sequencer cursor back to step 0)
//   -             //  stop (pattern/pulse phase is kept)
//   +             //  resume from where stop left off
//   m             //  mute pattern (fills keep playing)
//   \  or Esc     //  shut down
//
// Pattern steps:
//   1 2 3 4 5 6 7 8    //  steps 0..7
//   q w e r t y u i    //  steps 8..15
//
// Taps (current bank, keyboard order):
//   a s d f g h j k
//   , / .         //  previous / next bank
//
// Fills:
//   ; / '         //  toggle fill 1 / fill 2
//
// Edit gestures:
//   c             //  pick a tap sample, then a fill slot, then an interval
//   z             //  pick a tap sample, then steps to place it on
//   x             //  pick steps to clear
//   Space         //  cancel back to default
//
// The tui only turns crossterm key codes into `Key`s and draws whatever
// `DisplayState` the middle layer hands it; every gesture lives in the sequencer.

pub const NUM_STEPS: usize = 16;
pub const PPQN: u32 = 24;
pub const PULSES_PER_STEP: u32 = PPQN / 4; // one sixteenth note
pub const BANK_SIZE: usize = 8;
pub const MAX_BANKS: usize = 999;

pub const SAMPLE_RATE: u32 = 44100;
pub const CHANNELS: usize = 2;
pub const BITS_PER_SAMPLE: u16 = 16;

pub const STEP_KEYS: [char; NUM_STEPS] = [
    '1', '2', '3', '4', '5', '6', '7', '8',
    'q', 'w', 'e', 'r', 't', 'y', 'u', 'i',
];

// keyboard order, bank slot 0 is `a`
pub const TAP_KEYS: [char; BANK_SIZE] = ['a', 's', 'd', 'f', 'g', 'h', 'j', 'k'];

pub const KEY_START: char = '=';
pub const KEY_STOP: char = '-';
pub const KEY_RESUME: char = '+';
pub const KEY_MUTE: char = 'm';
pub const KEY_SHUTDOWN: char = '\\';
pub const KEY_FILL1: char = ';';
pub const KEY_FILL2: char = '\'';
pub const KEY_BANK_PREV: char = ',';
pub const KEY_BANK_NEXT: char = '.';
pub const KEY_CHANGE_FILL: char = 'c';
pub const KEY_ADD: char = 'z';
pub const KEY_DELETE: char = 'x';

/// A discrete, already-normalized key identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Space, // cancel
    Enter,
    Esc,
}

pub fn step_for_key(c: char) -> Option<usize> {
    STEP_KEYS.iter().position(|&k| k == c)
}

pub fn tap_for_key(c: char) -> Option<usize> {
    TAP_KEYS.iter().position(|&k| k == c)
}

/// What the control layer asks the rest of the program to do after a key.
#[derive(Clone, Debug, PartialEq)]
pub enum Action {
    Play(crate::audio::SampleId),
    Start,
    Stop,
    Resume,
    Shutdown,
}

#[derive(Clone, Debug, Default)]
pub struct DisplayState {
    pub playing: bool,
    pub muted: bool,
    pub step: u8, // last evaluated step
    pub pattern: [bool; NUM_STEPS],
    pub fills: [Option<FillView>; 2],
    pub fills_on: [bool; 2],
    pub taps: [Option<String>; BANK_SIZE],
    pub bank_index: usize,
    pub bank_count: usize,
    pub prompt: String,
    pub bpm: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FillView {
    pub name: String,
    pub interval: u8,
}
