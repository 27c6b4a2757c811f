//! Audio engine primitives.
//!
//! The automaton core only configures and queries these through the traits
//! below. The implementations are deliberately small: 8-bit wavetables, a
//! control-rate attack/decay envelope and a two-pole resonant low-pass.
//!
//! | Primitive | Trait | Implementation |
//! |-----------|-------|----------------|
//! | Oscillator | [`Oscillator`] | [`TableOscillator`] (sine, saw, brown noise) |
//! | Envelope | [`Envelope`] | [`AttackDecay`] |
//! | Filter | [`LowPass`] | [`ResonantLowPass`] |

mod envelope;
mod filter;
mod oscillator;

pub use envelope::{AttackDecay, EnvelopePhase};
pub use filter::ResonantLowPass;
pub use oscillator::{TableOscillator, Wavetable, TABLE_LEN};

/// Periodic sample source.
pub trait Oscillator {
    /// Set the playback frequency in Hz. Negative values play backwards.
    fn set_frequency(&mut self, hz: f32);

    /// Jump to a phase (full `u32` range = one period).
    fn set_phase(&mut self, phase: u32);

    /// Current sample, then advance one step.
    fn next(&mut self) -> i8;
}

/// One-shot attack/decay envelope.
pub trait Envelope {
    /// Restart from silence.
    fn start(&mut self, attack_ms: u16, decay_ms: u16);

    /// Advance one step and return the level (`0..=255`).
    fn next_value(&mut self) -> u8;
}

/// Low-pass filter.
pub trait LowPass {
    fn set_cutoff(&mut self, cutoff: u8);

    fn set_resonance(&mut self, resonance: u8);

    fn process(&mut self, sample: i32) -> i32;
}
