//! Two-pole resonant low-pass filter in Q8 fixed point.
//!
//! `cutoff` and `resonance` are 8-bit: 0 = closed / no feedback, 255 = open /
//! maximum feedback. Feedback is recomputed when the cutoff changes, so a
//! resonance change takes effect at the next `set_cutoff`.

use super::LowPass;
use crate::fixed::mul_q8;

/// 1.0 in Q8.
const ONE_Q8: i32 = 256;

#[derive(Debug, Clone, Default)]
pub struct ResonantLowPass {
    cutoff: i32,
    resonance: i32,
    feedback: i32,
    buf0: i32,
    buf1: i32,
}

impl ResonantLowPass {
    pub const fn new() -> Self {
        ResonantLowPass {
            cutoff: 0,
            resonance: 0,
            feedback: 0,
            buf0: 0,
            buf1: 0,
        }
    }

    pub fn cutoff(&self) -> u8 {
        self.cutoff as u8
    }
}

impl LowPass for ResonantLowPass {
    fn set_cutoff(&mut self, cutoff: u8) {
        self.cutoff = cutoff as i32;
        self.feedback = self.resonance + mul_q8(self.resonance, ONE_Q8 - self.cutoff);
    }

    fn set_resonance(&mut self, resonance: u8) {
        self.resonance = resonance as i32;
    }

    fn process(&mut self, sample: i32) -> i32 {
        let band = self.buf0 - self.buf1;
        self.buf0 += mul_q8((sample - self.buf0) + mul_q8(self.feedback, band), self.cutoff);
        self.buf1 += mul_q8(self.buf0 - self.buf1, self.cutoff);
        self.buf1
    }
}
