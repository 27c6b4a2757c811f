//! Parameters handed from the control task to the audio task.
//!
//! Every field is a single-word atomic. The control task is the only writer,
//! the audio task the only reader, and neither needs to see the others'
//! fields in any particular order, so all accesses are `Relaxed`. A sample
//! may mix an old and a new value for one tick; that is inaudible.
//!
//! Frequencies travel as `f32` bit patterns in an `AtomicU32`.

use core::sync::atomic::{AtomicBool, AtomicU16, AtomicU32, AtomicU8, Ordering};

/// Filter cutoff before the first control tick.
pub const DEFAULT_CUTOFF: u8 = 100;

/// Shared scalar parameter cells. Place one in a `static` so both tasks can
/// reach it.
pub struct SharedParams {
    active: AtomicBool,
    envelope: AtomicU8,
    glitch_gain: AtomicU8,
    population: AtomicU16,
    cutoff: AtomicU8,
    tone_hz: AtomicU32,
    saw_hz: AtomicU32,
    noise_phase: AtomicU32,
}

impl SharedParams {
    /// Awake and silent, frequencies zero until the control task publishes
    /// the node's defaults.
    pub const fn new() -> Self {
        SharedParams {
            active: AtomicBool::new(true),
            envelope: AtomicU8::new(0),
            glitch_gain: AtomicU8::new(0),
            population: AtomicU16::new(0),
            cutoff: AtomicU8::new(DEFAULT_CUTOFF),
            tone_hz: AtomicU32::new(0),
            saw_hz: AtomicU32::new(0),
            noise_phase: AtomicU32::new(0),
        }
    }

    pub fn active(&self) -> bool {
        self.active.load(Ordering::Relaxed)
    }

    pub fn set_active(&self, active: bool) {
        self.active.store(active, Ordering::Relaxed);
    }

    /// Triangle envelope level.
    pub fn envelope(&self) -> u8 {
        self.envelope.load(Ordering::Relaxed)
    }

    pub fn set_envelope(&self, level: u8) {
        self.envelope.store(level, Ordering::Relaxed);
    }

    pub fn glitch_gain(&self) -> u8 {
        self.glitch_gain.load(Ordering::Relaxed)
    }

    pub fn set_glitch_gain(&self, gain: u8) {
        self.glitch_gain.store(gain, Ordering::Relaxed);
    }

    pub fn population(&self) -> u16 {
        self.population.load(Ordering::Relaxed)
    }

    pub fn set_population(&self, population: u16) {
        self.population.store(population, Ordering::Relaxed);
    }

    pub fn cutoff(&self) -> u8 {
        self.cutoff.load(Ordering::Relaxed)
    }

    pub fn set_cutoff(&self, cutoff: u8) {
        self.cutoff.store(cutoff, Ordering::Relaxed);
    }

    pub fn tone_hz(&self) -> f32 {
        f32::from_bits(self.tone_hz.load(Ordering::Relaxed))
    }

    pub fn set_tone_hz(&self, hz: f32) {
        self.tone_hz.store(hz.to_bits(), Ordering::Relaxed);
    }

    pub fn saw_hz(&self) -> f32 {
        f32::from_bits(self.saw_hz.load(Ordering::Relaxed))
    }

    pub fn set_saw_hz(&self, hz: f32) {
        self.saw_hz.store(hz.to_bits(), Ordering::Relaxed);
    }

    /// Phase the noise oscillator should jump to.
    pub fn noise_phase(&self) -> u32 {
        self.noise_phase.load(Ordering::Relaxed)
    }

    pub fn set_noise_phase(&self, phase: u32) {
        self.noise_phase.store(phase, Ordering::Relaxed);
    }
}

impl Default for SharedParams {
    fn default() -> Self {
        Self::new()
    }
}
