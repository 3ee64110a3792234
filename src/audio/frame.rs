// The smallest unit of the mix: one stereo frame, summed wide so that any
// number of voices can be added before clamping back down to 16 bits.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MixFrame {
    pub left: i32,
    pub right: i32,
}

impl MixFrame {
    pub fn zero() -> Self {
        Self::default()
    }

    #[inline]
    pub fn add(&mut self, left: i16, right: i16) {
        self.left += left as i32;
        self.right += right as i32;
    }

    #[inline]
    pub fn clamped(self) -> [i16; 2] {
        [clamp_i16(self.left), clamp_i16(self.right)]
    }
}

#[inline]
fn clamp_i16(x: i32) -> i16 {
    x.clamp(i16::MIN as i32, i16::MAX as i32) as i16
}
