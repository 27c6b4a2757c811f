//! Feature extraction and sound parameter control.
//!
//! | Item | Runs on | Purpose |
//! |------|---------|---------|
//! | [`extract_features`] | control task | population and longest dead run |
//! | [`SonificationController`] | control task | triangle cooldown, sleep/wake |
//! | [`NodeRole`] | audio task | per-node mix formula |
//! | [`pick_pitch`] | control task | random note for roles B and C |

mod controller;
mod features;
mod role;

pub use controller::{SleepTransition, SonificationController, TriangleTrigger};
pub use features::{extract_features, Features};
pub use role::{MixParams, NodeRole, VoiceBank};

use rand::Rng;

use crate::fixed::map_range;

/// Notes (Hz) a triangle can pick on roles B and C.
pub const TRIANGLE_PITCHES: [u16; 6] = [220, 247, 293, 366, 413, 110];

/// Random note from [`TRIANGLE_PITCHES`].
pub fn pick_pitch<R: Rng>(rng: &mut R) -> u16 {
    TRIANGLE_PITCHES[rng.gen_range(0..TRIANGLE_PITCHES.len())]
}

/// Role A popping rate: population `[100, 180]` onto `[4, 18]` Hz, extrapolated.
pub fn popping_hz(population: u16) -> f32 {
    map_range(population as i32, 100, 180, 4, 18) as f32
}

/// Role A filter sweep rate (Hz).
pub fn filter_sweep_hz(population: u16) -> f32 {
    population as f32 / 2000.0
}

/// Role D gate: open when a draw below `population` exceeds 50.
pub fn glitch_gate<R: Rng>(rng: &mut R, population: u16) -> u8 {
    if population == 0 {
        return 0;
    }
    u8::from(rng.gen_range(0..population) > 50)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn pitches_come_from_table() {
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..50 {
            assert!(TRIANGLE_PITCHES.contains(&pick_pitch(&mut rng)));
        }
    }

    #[test]
    fn popping_rate() {
        assert_eq!(popping_hz(100), 4.0);
        assert_eq!(popping_hz(180), 18.0);
        assert_eq!(popping_hz(140), 11.0);
    }

    #[test]
    fn glitch_gate_closed_for_small_populations() {
        let mut rng = SmallRng::seed_from_u64(3);
        for population in [0u16, 1, 50, 51] {
            for _ in 0..20 {
                assert_eq!(glitch_gate(&mut rng, population), 0);
            }
        }
    }

    #[test]
    fn glitch_gate_opens_sometimes() {
        let mut rng = SmallRng::seed_from_u64(3);
        let open = (0..200).filter(|_| glitch_gate(&mut rng, 200) == 1).count();
        assert!(open > 100 && open < 200, "open {} of 200", open);
    }
}
