//! Wavetable oscillator using a 32-bit phase accumulator.
//!
//! The top 8 bits of the phase select one of [`TABLE_LEN`] entries; there is
//! no interpolation.

use core::f32::consts::PI;

use rand::Rng;

use super::Oscillator;

/// Entries per wavetable.
pub const TABLE_LEN: usize = 256;

/// One period of an 8-bit waveform.
pub type Wavetable = [i8; TABLE_LEN];

/// Wavetable oscillator.
///
/// # Example
/// ```ignore
/// let mut osc = TableOscillator::sine(AUDIO_RATE);
/// osc.set_frequency(220.0);
/// let sample = osc.next();
/// ```
#[derive(Clone)]
pub struct TableOscillator {
    table: Wavetable,
    /// Update rate in Hz (audio or control rate).
    rate: u32,
    /// Phase accumulator (wraps naturally at 32 bits = one period).
    phase: u32,
    /// Phase step per sample: `freq / rate * 2^32`.
    increment: u32,
}

impl TableOscillator {
    pub fn new(table: Wavetable, rate: u32) -> Self {
        TableOscillator {
            table,
            rate,
            phase: 0,
            increment: 0,
        }
    }

    pub fn sine(rate: u32) -> Self {
        let mut table = [0i8; TABLE_LEN];
        for (i, v) in table.iter_mut().enumerate() {
            *v = (libm::sinf(2.0 * PI * i as f32 / TABLE_LEN as f32) * 127.0) as i8;
        }
        Self::new(table, rate)
    }

    /// Sine shifted a quarter period.
    pub fn cosine(rate: u32) -> Self {
        let mut osc = Self::sine(rate);
        osc.phase = 1 << 30;
        osc
    }

    /// Rising ramp from -128 to 127.
    pub fn saw(rate: u32) -> Self {
        let mut table = [0i8; TABLE_LEN];
        for (i, v) in table.iter_mut().enumerate() {
            *v = (i as i16 - 128) as i8;
        }
        Self::new(table, rate)
    }

    /// Leaky random walk, filled once from `rng`.
    pub fn brown_noise<R: Rng>(rate: u32, rng: &mut R) -> Self {
        let mut table = [0i8; TABLE_LEN];
        let mut level = 0i32;
        for v in table.iter_mut() {
            level += rng.gen_range(-24..=24) - level / 16;
            level = level.clamp(-127, 127);
            *v = level as i8;
        }
        Self::new(table, rate)
    }

    pub fn phase(&self) -> u32 {
        self.phase
    }

    pub fn increment(&self) -> u32 {
        self.increment
    }

    pub fn table(&self) -> &Wavetable {
        &self.table
    }
}

impl Oscillator for TableOscillator {
    fn set_frequency(&mut self, hz: f32) {
        let inc = hz * (4_294_967_296.0 / self.rate as f32);
        // Negative increments wrap to a backwards walk.
        self.increment = (inc as i64) as u32;
    }

    fn set_phase(&mut self, phase: u32) {
        self.phase = phase;
    }

    fn next(&mut self) -> i8 {
        let sample = self.table[(self.phase >> 24) as usize];
        self.phase = self.phase.wrapping_add(self.increment);
        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    const RATE: u32 = 16_384;

    #[test]
    fn silent_until_frequency_set() {
        let mut osc = TableOscillator::saw(RATE);
        let first = osc.next();
        for _ in 0..10 {
            assert_eq!(osc.next(), first);
        }
    }

    #[test]
    fn one_cell_per_sample_at_table_rate() {
        let mut osc = TableOscillator::saw(RATE);
        osc.set_frequency(RATE as f32 / TABLE_LEN as f32);
        assert_eq!(osc.increment(), 1 << 24);
        assert_eq!(osc.next(), -128);
        assert_eq!(osc.next(), -127);
        assert_eq!(osc.next(), -126);
    }

    #[test]
    fn negative_frequency_runs_backwards() {
        let mut osc = TableOscillator::saw(RATE);
        osc.set_frequency(-(RATE as f32) / TABLE_LEN as f32);
        assert_eq!(osc.next(), -128);
        assert_eq!(osc.next(), 127);
        assert_eq!(osc.next(), 126);
    }

    #[test]
    fn sine_table_shape() {
        let osc = TableOscillator::sine(RATE);
        let t = osc.table();
        assert_eq!(t[0], 0);
        assert!(t[64] >= 126);
        assert!(t[192] <= -126);
    }

    #[test]
    fn cosine_starts_at_peak() {
        let mut osc = TableOscillator::cosine(64);
        assert!(osc.next() >= 126);
    }

    #[test]
    fn set_phase_jumps() {
        let mut osc = TableOscillator::saw(RATE);
        osc.set_phase(0x8000_0000);
        assert_eq!(osc.next(), 0);
    }

    #[test]
    fn brown_noise_is_bounded_and_varied() {
        let mut rng = SmallRng::seed_from_u64(11);
        let osc = TableOscillator::brown_noise(RATE, &mut rng);
        let t = osc.table();
        assert!(t.iter().all(|&v| v >= -127));
        let distinct = t.windows(2).filter(|w| w[0] != w[1]).count();
        assert!(distinct > TABLE_LEN / 2);
    }
}
