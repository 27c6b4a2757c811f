//! Per-node voice: defaults and the audio-rate mix formula.

use crate::config::NodeId;

/// Sample sources a role mixes from. Each call steps the source by one
/// sample, so a role only advances the voices its formula uses.
pub trait VoiceBank {
    /// Tone oscillator sample.
    fn tone(&mut self) -> i32;
    /// Sawtooth oscillator sample.
    fn saw(&mut self) -> i32;
    /// Noise oscillator sample.
    fn noise(&mut self) -> i32;
    /// Run one sample through the shared low-pass filter.
    fn filter(&mut self, sample: i32) -> i32;
}

/// Scalar parameters the mix reads, snapshotted once per sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MixParams {
    /// Triangle envelope level, `0..=255`.
    pub envelope: i32,
    /// Role D on/off gate, 0 or 1.
    pub glitch_gain: i32,
    pub population: i32,
}

/// The four voices of the installation, one per node id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole {
    /// Popping filtered saw plus enveloped tone.
    A,
    /// Filtered noise plus enveloped tone.
    B,
    /// Enveloped filtered saw and noise.
    C,
    /// Population-biased glitchy tone.
    D,
}

impl NodeRole {
    pub const fn from_id(id: NodeId) -> Self {
        match id.get() % 4 {
            0 => NodeRole::A,
            1 => NodeRole::B,
            2 => NodeRole::C,
            _ => NodeRole::D,
        }
    }

    /// Default percent chance of falling asleep at each evaluation.
    pub const fn sleep_chance(self) -> u8 {
        match self {
            NodeRole::A => 30,
            NodeRole::B => 40,
            NodeRole::C => 50,
            NodeRole::D => 60,
        }
    }

    /// Default tone oscillator frequency (Hz).
    pub const fn tone_hz(self) -> f32 {
        match self {
            NodeRole::A => 200.0,
            NodeRole::B => 220.0,
            NodeRole::C => 300.0,
            NodeRole::D => 297.0,
        }
    }

    /// Whether this role uses the noise oscillator.
    pub const fn uses_noise(self) -> bool {
        matches!(self, NodeRole::B | NodeRole::C)
    }

    /// One output sample. Shifts and operand order are part of the sound.
    ///
    /// `population` spans `0..=256` and does not wrap, so an all-live
    /// history biases role D by 256 rather than 0.
    pub fn mix<V: VoiceBank>(self, voices: &mut V, params: &MixParams) -> i32 {
        match self {
            NodeRole::A => {
                let tone = (voices.tone() * params.envelope) >> 8;
                let saw = voices.saw();
                (tone + voices.filter(saw)) >> 2
            }
            NodeRole::B => {
                let tone = (voices.tone() * params.envelope) >> 8;
                let noise = voices.noise();
                (tone + voices.filter(noise)) >> 2
            }
            NodeRole::C => {
                let saw = voices.saw();
                let saw = voices.filter(saw);
                let noise = voices.noise();
                let noise = voices.filter(noise);
                (params.envelope * (saw + noise / 2)) >> 10
            }
            NodeRole::D => (params.glitch_gain * voices.tone() + params.population) >> 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fixed sources; the filter halves and records how often it ran.
    struct FixedVoices {
        tone: i32,
        saw: i32,
        noise: i32,
        pulls: [u32; 4],
    }

    impl FixedVoices {
        fn new(tone: i32, saw: i32, noise: i32) -> Self {
            FixedVoices { tone, saw, noise, pulls: [0; 4] }
        }
    }

    impl VoiceBank for FixedVoices {
        fn tone(&mut self) -> i32 {
            self.pulls[0] += 1;
            self.tone
        }
        fn saw(&mut self) -> i32 {
            self.pulls[1] += 1;
            self.saw
        }
        fn noise(&mut self) -> i32 {
            self.pulls[2] += 1;
            self.noise
        }
        fn filter(&mut self, sample: i32) -> i32 {
            self.pulls[3] += 1;
            sample / 2
        }
    }

    fn params(envelope: i32, glitch_gain: i32, population: i32) -> MixParams {
        MixParams { envelope, glitch_gain, population }
    }

    #[test]
    fn role_a_mix() {
        let mut v = FixedVoices::new(100, 60, 0);
        // ((100 * 200) >> 8) = 78; 78 + 30 = 108; >> 2 = 27
        assert_eq!(NodeRole::A.mix(&mut v, &params(200, 0, 0)), 27);
        assert_eq!(v.pulls, [1, 1, 0, 1]);
    }

    #[test]
    fn role_b_mix() {
        let mut v = FixedVoices::new(-100, 0, 50);
        // (-20000 >> 8) = -79; -79 + 25 = -54; >> 2 = -14
        assert_eq!(NodeRole::B.mix(&mut v, &params(200, 0, 0)), -14);
        assert_eq!(v.pulls, [1, 0, 1, 1]);
    }

    #[test]
    fn role_c_mix_filters_twice() {
        let mut v = FixedVoices::new(0, 120, 80);
        // saw 60, noise 40 -> 60 + 20 = 80; 255 * 80 = 20400; >> 10 = 19
        assert_eq!(NodeRole::C.mix(&mut v, &params(255, 0, 0)), 19);
        assert_eq!(v.pulls, [0, 1, 1, 2]);
    }

    #[test]
    fn role_d_mix() {
        let mut v = FixedVoices::new(90, 0, 0);
        assert_eq!(NodeRole::D.mix(&mut v, &params(0, 1, 120)), 105);
        assert_eq!(NodeRole::D.mix(&mut v, &params(0, 0, 120)), 60);
        assert_eq!(v.pulls, [2, 0, 0, 0]);
    }

    #[test]
    fn role_d_full_history_biases_by_256() {
        let mut v = FixedVoices::new(90, 0, 0);
        assert_eq!(NodeRole::D.mix(&mut v, &params(0, 0, 256)), 128);
    }

    #[test]
    fn silent_envelope_leaves_filtered_bed() {
        let mut v = FixedVoices::new(127, 64, 0);
        assert_eq!(NodeRole::A.mix(&mut v, &params(0, 0, 0)), 8);
    }

    #[test]
    fn roles_by_id() {
        let role = |id| NodeRole::from_id(NodeId::new(id, 4).unwrap());
        assert_eq!(role(0), NodeRole::A);
        assert_eq!(role(1), NodeRole::B);
        assert_eq!(role(2), NodeRole::C);
        assert_eq!(role(3), NodeRole::D);
        assert!(NodeRole::B.uses_noise() && NodeRole::C.uses_noise());
        assert!(!NodeRole::A.uses_noise() && !NodeRole::D.uses_noise());
    }
}
