//! Rule 30 automaton slice with ring wraparound.
//!
//! Each node owns `WIDTH * 8` cells of a larger automaton that wraps around
//! the whole ring. The two cells beyond this node's edges are supplied by
//! the neighbouring nodes as boundary bits every generation.

mod grid;
mod history;

pub use grid::AutomatonGrid;
pub use history::{GenerationHistory, Row};

use crate::constants::RULE;

/// Neighbourhood index `4 * left + 2 * self + right` (0–7).
#[inline(always)]
pub const fn neighborhood(left: u8, cell: u8, right: u8) -> u8 {
    ((left & 1) << 2) | ((cell & 1) << 1) | (right & 1)
}

/// Next state for a neighbourhood index: bit `index` of the rule number.
#[inline(always)]
pub const fn rule_lookup(index: u8) -> u8 {
    (RULE >> (index & 7)) & 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_table_is_rule_30() {
        let expected = [0, 1, 1, 1, 1, 0, 0, 0];
        for index in 0..8u8 {
            assert_eq!(rule_lookup(index), expected[index as usize], "index {}", index);
        }
    }

    #[test]
    fn every_neighborhood_matches_table() {
        for l in 0..2u8 {
            for s in 0..2u8 {
                for r in 0..2u8 {
                    let index = neighborhood(l, s, r);
                    assert_eq!(index, 4 * l + 2 * s + r);
                    // Rule 30 is `left xor (self or right)`.
                    assert_eq!(rule_lookup(index), l ^ (s | r));
                }
            }
        }
    }
}
