//! Exponential attack/decay envelope, stepped at control rate.

use super::Envelope;

/// Time constants covered by a full attack or decay segment.
/// `e^-5` is below one 8-bit step, so a finished segment is effectively settled.
const TIME_CONSTANTS: f32 = 5.0;

/// Attack aims slightly above full scale so the peak reaches 255 in time.
const ATTACK_TARGET: f32 = 256.0;

/// Envelope segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvelopePhase {
    /// No output.
    Idle,
    /// Rising toward full scale.
    Attack,
    /// Falling back to silence.
    Decay,
}

/// One-shot attack/decay envelope.
///
/// # Example
/// ```ignore
/// let mut env = AttackDecay::new(CONTROL_RATE);
/// env.start(10, 2990);
/// // once per control tick:
/// let gain = env.next_value();
/// ```
#[derive(Debug, Clone)]
pub struct AttackDecay {
    /// Steps per second.
    rate: u16,
    phase: EnvelopePhase,
    /// Steps left in the current segment.
    remaining: u32,
    level: f32,
    attack_coef: f32,
    decay_factor: f32,
    decay_steps: u32,
}

impl AttackDecay {
    pub fn new(rate: u16) -> Self {
        AttackDecay {
            rate,
            phase: EnvelopePhase::Idle,
            remaining: 0,
            level: 0.0,
            attack_coef: 1.0,
            decay_factor: 0.0,
            decay_steps: 1,
        }
    }

    /// Milliseconds to whole steps, at least one.
    fn ms_to_steps(&self, ms: u16) -> u32 {
        ((ms as u32 * self.rate as u32) / 1000).max(1)
    }

    pub fn phase(&self) -> EnvelopePhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase != EnvelopePhase::Idle
    }
}

impl Envelope for AttackDecay {
    fn start(&mut self, attack_ms: u16, decay_ms: u16) {
        let attack_steps = self.ms_to_steps(attack_ms);
        self.decay_steps = self.ms_to_steps(decay_ms);
        self.attack_coef = 1.0 - libm::expf(-TIME_CONSTANTS / attack_steps as f32);
        self.decay_factor = libm::expf(-TIME_CONSTANTS / self.decay_steps as f32);
        self.level = 0.0;
        self.remaining = attack_steps;
        self.phase = EnvelopePhase::Attack;
    }

    fn next_value(&mut self) -> u8 {
        match self.phase {
            EnvelopePhase::Idle => return 0,
            EnvelopePhase::Attack => {
                self.level += (ATTACK_TARGET - self.level) * self.attack_coef;
                self.remaining -= 1;
                if self.remaining == 0 {
                    self.phase = EnvelopePhase::Decay;
                    self.remaining = self.decay_steps;
                }
            }
            EnvelopePhase::Decay => {
                self.level *= self.decay_factor;
                self.remaining -= 1;
                if self.remaining == 0 {
                    self.phase = EnvelopePhase::Idle;
                    self.level = 0.0;
                }
            }
        }
        self.level.clamp(0.0, 255.0) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_is_silent() {
        let mut env = AttackDecay::new(64);
        assert_eq!(env.phase(), EnvelopePhase::Idle);
        assert_eq!(env.next_value(), 0);
    }

    #[test]
    fn short_attack_peaks_on_first_step() {
        let mut env = AttackDecay::new(64);
        env.start(10, 990);
        assert_eq!(env.phase(), EnvelopePhase::Attack);
        assert!(env.next_value() >= 250);
        assert_eq!(env.phase(), EnvelopePhase::Decay);
    }

    #[test]
    fn decay_falls_monotonically_to_idle() {
        let mut env = AttackDecay::new(64);
        env.start(10, 990); // 63 decay steps
        let mut prev = env.next_value();
        let mut steps = 0;
        while env.is_active() {
            let v = env.next_value();
            assert!(v <= prev);
            prev = v;
            steps += 1;
        }
        assert_eq!(steps, 63);
        assert_eq!(prev, 0);
        assert_eq!(env.next_value(), 0);
    }

    #[test]
    fn attack_rises() {
        let mut env = AttackDecay::new(64);
        env.start(500, 1000); // 32 attack steps
        let first = env.next_value();
        let mut last = first;
        for _ in 0..30 {
            last = env.next_value();
        }
        assert!(last > first);
        assert_eq!(env.phase(), EnvelopePhase::Attack);
    }

    #[test]
    fn restart_begins_from_silence() {
        let mut env = AttackDecay::new(64);
        env.start(500, 1000);
        for _ in 0..20 {
            env.next_value();
        }
        env.start(500, 1000);
        assert!(env.next_value() < 60);
    }

    #[test]
    fn zero_times_still_take_a_step() {
        let mut env = AttackDecay::new(64);
        env.start(0, 0);
        env.next_value();
        env.next_value();
        assert!(!env.is_active());
    }
}
