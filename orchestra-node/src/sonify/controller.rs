use tracing::debug;

use crate::constants::{
    SLEEP_PERIOD, TRIANGLE_ATTACK_MS, TRIANGLE_COOLDOWN, TRIANGLE_DURATION_MS,
    TRIANGLE_MAX_RUN, TRIANGLE_MIN_RUN, WAKE_THRESHOLD,
};
use crate::fixed::map_range;

/// One-shot envelope request produced by a detected triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriangleTrigger {
    pub attack_ms: u16,
    pub decay_ms: u16,
}

impl TriangleTrigger {
    /// Envelope for a zero run of `run` cells: total duration maps
    /// `[7, 14]` onto `[1000, 6000]` ms (extrapolating, saturating at
    /// `u16::MAX`), attack fixed, decay takes the rest.
    pub fn for_run(run: u16) -> Self {
        let (short, long) = TRIANGLE_DURATION_MS;
        let duration = map_range(
            run as i32,
            TRIANGLE_MIN_RUN as i32,
            TRIANGLE_MAX_RUN as i32,
            short as i32,
            long as i32,
        )
        .clamp(TRIANGLE_ATTACK_MS as i32, u16::MAX as i32) as u16;
        TriangleTrigger {
            attack_ms: TRIANGLE_ATTACK_MS,
            decay_ms: duration - TRIANGLE_ATTACK_MS,
        }
    }
}

/// Display / sound activity change from a sleep draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepTransition {
    FellAsleep,
    WokeUp,
}

/// Triangle cooldown and sleep/wake state.
#[derive(Debug, Clone)]
pub struct SonificationController {
    last_trigger: u16,
    sleep_chance: u8,
    phase_offset: u8,
    active: bool,
}

impl SonificationController {
    /// `phase_offset` shifts this node's sleep evaluations so the ring does
    /// not change state in lockstep.
    pub fn new(sleep_chance: u8, phase_offset: u8) -> Self {
        SonificationController {
            last_trigger: 0,
            sleep_chance,
            phase_offset,
            active: true,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn last_trigger(&self) -> u16 {
        self.last_trigger
    }

    pub fn sleep_chance(&self) -> u8 {
        self.sleep_chance
    }

    pub fn phase_offset(&self) -> u8 {
        self.phase_offset
    }

    /// Cooldown-gated triangle detection.
    ///
    /// Only looks at `longest_zero_run` once more than 8 generations passed
    /// since the last trigger; fires for runs longer than 6 and restarts the
    /// cooldown at `generation`.
    pub fn evaluate_triangle(
        &mut self,
        generation: u16,
        longest_zero_run: u16,
    ) -> Option<TriangleTrigger> {
        if generation.wrapping_sub(self.last_trigger) <= TRIANGLE_COOLDOWN {
            return None;
        }
        if longest_zero_run < TRIANGLE_MIN_RUN {
            return None;
        }
        self.last_trigger = generation;
        let trigger = TriangleTrigger::for_run(longest_zero_run);
        debug!(generation, run = longest_zero_run, decay = trigger.decay_ms, "triangle");
        Some(trigger)
    }

    /// Whether `generation` is one of this node's sleep evaluation points.
    pub fn sleep_due(&self, generation: u16) -> bool {
        (generation as u32 + self.phase_offset as u32) % SLEEP_PERIOD == 0
    }

    /// Apply a uniform draw in `0..100`.
    ///
    /// Active nodes fall asleep below `sleep_chance`; sleeping nodes wake
    /// below 90. Neither state is absorbing.
    pub fn apply_sleep_draw(&mut self, draw: u8) -> Option<SleepTransition> {
        if self.active && draw < self.sleep_chance {
            self.active = false;
            Some(SleepTransition::FellAsleep)
        } else if !self.active && draw < WAKE_THRESHOLD {
            self.active = true;
            Some(SleepTransition::WokeUp)
        } else {
            None
        }
    }
}
