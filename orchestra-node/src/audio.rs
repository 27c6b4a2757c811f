//! Audio-rate task.
//!
//! Runs at [`AUDIO_RATE`] from the audio interrupt. It owns the oscillators
//! and the filter, picks up new settings from [`SharedParams`] and produces
//! one sample per call. It never touches automaton or protocol state.

use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::constants::AUDIO_RATE;
use crate::engine::{LowPass, Oscillator, ResonantLowPass, TableOscillator, TABLE_LEN};
use crate::fixed::saturate16;
use crate::params::SharedParams;
use crate::sonify::{MixParams, NodeRole, VoiceBank};

/// Fixed low-pass resonance.
pub const FILTER_RESONANCE: u8 = 230;

/// The node's sound sources.
pub struct Voices {
    tone: TableOscillator,
    saw: TableOscillator,
    noise: TableOscillator,
    lpf: ResonantLowPass,
}

impl Voices {
    /// Sine tone, sawtooth, and a brown-noise table generated from `seed`
    /// that plays back one table entry per sample.
    pub fn new(seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut noise = TableOscillator::brown_noise(AUDIO_RATE, &mut rng);
        noise.set_frequency(AUDIO_RATE as f32 / TABLE_LEN as f32);

        let mut lpf = ResonantLowPass::new();
        lpf.set_resonance(FILTER_RESONANCE);

        Voices {
            tone: TableOscillator::sine(AUDIO_RATE),
            saw: TableOscillator::saw(AUDIO_RATE),
            noise,
            lpf,
        }
    }
}

impl VoiceBank for Voices {
    fn tone(&mut self) -> i32 {
        self.tone.next() as i32
    }

    fn saw(&mut self) -> i32 {
        self.saw.next() as i32
    }

    fn noise(&mut self) -> i32 {
        self.noise.next() as i32
    }

    fn filter(&mut self, sample: i32) -> i32 {
        self.lpf.process(sample)
    }
}

/// Per-sample mixer for one node role.
pub struct AudioTask {
    role: NodeRole,
    voices: Voices,
    // Last values applied to the voices. NaN never compares equal, so the
    // first tick applies whatever is published.
    tone_hz: f32,
    saw_hz: f32,
    cutoff: Option<u8>,
    noise_phase: u32,
}

impl AudioTask {
    pub fn new(role: NodeRole, seed: u64) -> Self {
        AudioTask {
            role,
            voices: Voices::new(seed),
            tone_hz: f32::NAN,
            saw_hz: f32::NAN,
            cutoff: None,
            noise_phase: 0,
        }
    }

    pub fn role(&self) -> NodeRole {
        self.role
    }

    /// Produce one output sample.
    ///
    /// A sleeping node outputs silence and does not step its oscillators.
    pub fn tick(&mut self, params: &SharedParams) -> i16 {
        if !params.active() {
            return 0;
        }
        self.sync(params);

        let mix = MixParams {
            envelope: params.envelope() as i32,
            glitch_gain: params.glitch_gain() as i32,
            population: params.population() as i32,
        };
        saturate16(self.role.mix(&mut self.voices, &mix))
    }

    /// Fill `out` with consecutive samples.
    pub fn fill(&mut self, params: &SharedParams, out: &mut [i16]) {
        for sample in out.iter_mut() {
            *sample = self.tick(params);
        }
    }

    fn sync(&mut self, params: &SharedParams) {
        let tone_hz = params.tone_hz();
        if tone_hz != self.tone_hz {
            self.voices.tone.set_frequency(tone_hz);
            self.tone_hz = tone_hz;
        }

        let saw_hz = params.saw_hz();
        if saw_hz != self.saw_hz {
            self.voices.saw.set_frequency(saw_hz);
            self.saw_hz = saw_hz;
        }

        let cutoff = params.cutoff();
        if self.cutoff != Some(cutoff) {
            self.voices.lpf.set_cutoff(cutoff);
            self.cutoff = Some(cutoff);
        }

        if self.role.uses_noise() {
            let phase = params.noise_phase();
            if phase != self.noise_phase {
                self.voices.noise.set_phase(phase);
                self.noise_phase = phase;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params_for(role: NodeRole) -> SharedParams {
        let p = SharedParams::new();
        p.set_tone_hz(role.tone_hz());
        p.set_saw_hz(10.0);
        p
    }

    #[test]
    fn sleeping_node_is_silent() {
        for role in [NodeRole::A, NodeRole::B, NodeRole::C, NodeRole::D] {
            let p = params_for(role);
            p.set_envelope(255);
            p.set_glitch_gain(1);
            p.set_population(200);
            p.set_active(false);
            let mut task = AudioTask::new(role, 5);
            let mut buf = [1i16; 64];
            task.fill(&p, &mut buf);
            assert!(buf.iter().all(|&s| s == 0), "{:?}", role);
        }
    }

    #[test]
    fn sleep_does_not_advance_oscillators() {
        let p = params_for(NodeRole::D);
        p.set_glitch_gain(1);
        let mut awake = AudioTask::new(NodeRole::D, 1);
        let mut napping = AudioTask::new(NodeRole::D, 1);

        p.set_active(false);
        for _ in 0..100 {
            napping.tick(&p);
        }
        p.set_active(true);
        for _ in 0..50 {
            assert_eq!(awake.tick(&p), napping.tick(&p));
        }
    }

    #[test]
    fn role_d_is_population_offset_when_gate_closed() {
        let p = params_for(NodeRole::D);
        p.set_population(120);
        let mut task = AudioTask::new(NodeRole::D, 2);
        for _ in 0..32 {
            assert_eq!(task.tick(&p), 60);
        }
    }

    #[test]
    fn role_d_gate_adds_tone() {
        let p = params_for(NodeRole::D);
        p.set_population(0);
        p.set_glitch_gain(1);
        let mut task = AudioTask::new(NodeRole::D, 2);
        let mut buf = [0i16; 256];
        task.fill(&p, &mut buf);
        assert!(buf.iter().any(|&s| s > 40));
        assert!(buf.iter().any(|&s| s < -40));
    }

    #[test]
    fn role_c_silent_without_envelope() {
        let p = params_for(NodeRole::C);
        let mut task = AudioTask::new(NodeRole::C, 3);
        let mut buf = [1i16; 128];
        task.fill(&p, &mut buf);
        assert!(buf.iter().all(|&s| s == 0));
    }

    #[test]
    fn envelope_opens_tone_on_role_b() {
        let quiet = params_for(NodeRole::B);
        let loud = params_for(NodeRole::B);
        loud.set_envelope(255);
        let mut a = AudioTask::new(NodeRole::B, 4);
        let mut b = AudioTask::new(NodeRole::B, 4);
        // Same seed, so the noise beds match and the difference is the tone.
        let widest = (0..512)
            .map(|_| (b.tick(&loud) as i32 - a.tick(&quiet) as i32).abs())
            .max()
            .unwrap_or(0);
        assert!(widest > 20, "tone swing {}", widest);
    }

    #[test]
    fn frequency_changes_reach_oscillator() {
        let p = params_for(NodeRole::D);
        let mut task = AudioTask::new(NodeRole::D, 0);
        task.tick(&p);
        p.set_tone_hz(440.0);
        task.tick(&p);
        let expected = (440.0f32 * (4_294_967_296.0 / AUDIO_RATE as f32)) as i64 as u32;
        assert_eq!(task.voices.tone.increment(), expected);
        assert_eq!(task.role(), NodeRole::D);
    }
}
