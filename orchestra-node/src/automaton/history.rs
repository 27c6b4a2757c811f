use crate::constants::{HISTORY_DEPTH, WIDTH};

/// One generation: `WIDTH` bytes, cell 0 in the MSB of byte 0.
pub type Row = [u8; WIDTH];

/// Circular buffer holding the most recent `HISTORY_DEPTH` generations.
///
/// Generation `g` lives in slot `g mod HISTORY_DEPTH`; older generations are
/// overwritten. The generation counter is a wrapping `u16`, and since
/// `HISTORY_DEPTH` divides 2^16 the slot mapping stays continuous across the
/// wrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationHistory {
    rows: [Row; HISTORY_DEPTH],
}

impl GenerationHistory {
    /// Empty (all dead) history.
    pub const fn new() -> Self {
        GenerationHistory {
            rows: [[0; WIDTH]; HISTORY_DEPTH],
        }
    }

    /// Storage slot of `generation`.
    #[inline(always)]
    pub const fn index(generation: u16) -> usize {
        generation as usize % HISTORY_DEPTH
    }

    pub fn row(&self, generation: u16) -> &Row {
        &self.rows[Self::index(generation)]
    }

    pub fn row_mut(&mut self, generation: u16) -> &mut Row {
        &mut self.rows[Self::index(generation)]
    }

    /// Raw slots in storage order (slot 0 first), independent of which
    /// generation is current.
    pub fn slots(&self) -> &[Row; HISTORY_DEPTH] {
        &self.rows
    }

    /// Build a history from raw slots.
    pub const fn from_slots(rows: [Row; HISTORY_DEPTH]) -> Self {
        GenerationHistory { rows }
    }
}

impl Default for GenerationHistory {
    fn default() -> Self {
        Self::new()
    }
}
