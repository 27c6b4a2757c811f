/// Width of one node's slice of the automaton in bytes (32 cells).
pub const WIDTH: usize = 4;

/// Cells in one generation row.
pub const CELLS_PER_ROW: usize = WIDTH * 8;

/// Generations kept in the rolling history. Matches the display height.
pub const HISTORY_DEPTH: usize = 8;

/// Number of nodes in the installation ring.
pub const RING_SIZE: u8 = 4;

/// Largest ring whose node ids cannot collide with the ready sentinel.
pub const MAX_RING_SIZE: u8 = 32;

/// Elementary automaton rule number (`0b0001_1110`).
pub const RULE: u8 = 30;

/// Control task rate in Hz.
pub const CONTROL_RATE: u16 = 64;

/// Audio task rate in Hz.
pub const AUDIO_RATE: u32 = 16_384;

/// Generations between sleep/wake evaluations.
pub const SLEEP_PERIOD: u32 = 30;

/// Draws below this wake a sleeping node.
pub const WAKE_THRESHOLD: u8 = 90;

/// A triangle may only retrigger once more than this many generations passed.
pub const TRIANGLE_COOLDOWN: u16 = 8;

/// Shortest zero run that counts as a triangle.
pub const TRIANGLE_MIN_RUN: u16 = 7;

/// Zero run mapped to the longest envelope.
pub const TRIANGLE_MAX_RUN: u16 = 14;

/// Envelope attack time for a triangle trigger (ms).
pub const TRIANGLE_ATTACK_MS: u16 = 10;

/// Total envelope time for the shortest / longest triangle (ms).
pub const TRIANGLE_DURATION_MS: (u16, u16) = (1000, 6000);
