use crate::automaton::GenerationHistory;

/// Features of the visible history that drive the sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Features {
    /// Live cells across all history slots, `0..=256`. Never wraps.
    pub population: u16,
    /// Longest run of dead cells in scan order.
    pub longest_zero_run: u16,
}

/// Count live cells and find the longest run of dead ones.
///
/// Scan order is fixed: storage slots from 7 down to 0, bytes left to right,
/// bits MSB to LSB. Runs continue across byte and slot boundaries.
pub fn extract_features(history: &GenerationHistory) -> Features {
    let mut population = 0u16;
    let mut run = 0u16;
    let mut longest = 0u16;

    for row in history.slots().iter().rev() {
        for &byte in row {
            population += byte.count_ones() as u16;
            for b in (0..8).rev() {
                if (byte >> b) & 1 == 0 {
                    run += 1;
                } else {
                    longest = longest.max(run);
                    run = 0;
                }
            }
        }
    }

    Features {
        population,
        longest_zero_run: longest.max(run),
    }
}
