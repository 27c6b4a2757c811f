use rand::RngCore;

use super::history::{GenerationHistory, Row};
use super::{neighborhood, rule_lookup};
use crate::constants::WIDTH;

/// This node's slice of the automaton plus its rolling history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutomatonGrid {
    history: GenerationHistory,
    generation: u16,
}

impl AutomatonGrid {
    /// All-dead grid at generation 0.
    pub const fn new() -> Self {
        AutomatonGrid {
            history: GenerationHistory::new(),
            generation: 0,
        }
    }

    /// Generation 0 set to `row`, the rest of the history dead.
    pub fn from_row(row: Row) -> Self {
        let mut grid = Self::new();
        *grid.history.row_mut(0) = row;
        grid
    }

    /// Generation 0 filled with random bytes.
    pub fn seeded<R: RngCore>(rng: &mut R) -> Self {
        let mut row = [0u8; WIDTH];
        rng.fill_bytes(&mut row);
        Self::from_row(row)
    }

    pub fn generation(&self) -> u16 {
        self.generation
    }

    /// History slot of the current generation.
    pub fn current_row(&self) -> usize {
        GenerationHistory::index(self.generation)
    }

    pub fn current(&self) -> &Row {
        self.history.row(self.generation)
    }

    pub fn history(&self) -> &GenerationHistory {
        &self.history
    }

    /// Leftmost cell of the current generation, published to the left neighbour.
    pub fn left_edge(&self) -> u8 {
        self.current()[0] >> 7
    }

    /// Rightmost cell of the current generation, published to the right neighbour.
    pub fn right_edge(&self) -> u8 {
        self.current()[WIDTH - 1] & 1
    }

    /// Compute the next generation and make it current.
    ///
    /// `left_boundary` is the cell just left of cell 0 (the left neighbour's
    /// rightmost cell), `right_boundary` the cell just right of the last cell.
    /// All cells are evaluated against a copy of the current row, so no cell
    /// sees an already-updated neighbour.
    pub fn advance(&mut self, left_boundary: u8, right_boundary: u8) {
        let current = *self.current();
        let mut next = [0u8; WIDTH];

        for i in 0..WIDTH {
            for b in (0..8).rev() {
                let left = if b == 7 {
                    if i == 0 {
                        left_boundary
                    } else {
                        current[(i + WIDTH - 1) % WIDTH] & 1
                    }
                } else {
                    (current[i] >> (b + 1)) & 1
                };

                let cell = (current[i] >> b) & 1;

                let right = if b == 0 {
                    if i == WIDTH - 1 {
                        right_boundary
                    } else {
                        current[(i + 1) % WIDTH] >> 7
                    }
                } else {
                    (current[i] >> (b - 1)) & 1
                };

                next[i] |= rule_lookup(neighborhood(left, cell, right)) << b;
            }
        }

        self.generation = self.generation.wrapping_add(1);
        *self.history.row_mut(self.generation) = next;
    }
}

impl Default for AutomatonGrid {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    #[test]
    fn advance_regression_fixture() {
        // cells: 1000_0000 0000_0000 0001_1000 0000_0001, both boundaries set
        let mut grid = AutomatonGrid::from_row([0x80, 0x00, 0x18, 0x01]);
        grid.advance(1, 1);
        assert_eq!(grid.generation(), 1);
        assert_eq!(grid.current(), &[0x40, 0x00, 0x34, 0x03]);
    }

    #[test]
    fn advance_keeps_previous_generation() {
        let mut grid = AutomatonGrid::from_row([0x80, 0x00, 0x18, 0x01]);
        grid.advance(1, 1);
        assert_eq!(grid.history().row(0), &[0x80, 0x00, 0x18, 0x01]);
        assert_eq!(grid.current_row(), 1);
    }

    #[test]
    fn dead_grid_with_dead_boundaries_stays_dead() {
        let mut grid = AutomatonGrid::new();
        for _ in 0..20 {
            grid.advance(0, 0);
            assert_eq!(grid.current(), &[0; WIDTH]);
        }
    }

    #[test]
    fn left_boundary_feeds_first_cell() {
        // 100 -> 1 for cell 0; cell 1 sees 000.
        let mut grid = AutomatonGrid::new();
        grid.advance(1, 0);
        assert_eq!(grid.current(), &[0x80, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn right_boundary_feeds_last_cell() {
        // 001 -> 1 for the last cell.
        let mut grid = AutomatonGrid::new();
        grid.advance(0, 1);
        assert_eq!(grid.current(), &[0x00, 0x00, 0x00, 0x01]);
    }

    #[test]
    fn carries_across_byte_edges() {
        // Single live cell 8 (byte 1, bit 7). 001, 010 and 100 all map to 1,
        // so cell 7 lands in byte 0.
        let mut grid = AutomatonGrid::from_row([0x00, 0x80, 0x00, 0x00]);
        grid.advance(0, 0);
        assert_eq!(grid.current(), &[0x01, 0xC0, 0x00, 0x00]);
    }

    #[test]
    fn update_is_synchronous() {
        // Sequential in-place updates would let cell 1 see the new cell 0.
        let mut grid = AutomatonGrid::from_row([0x40, 0x00, 0x00, 0x00]);
        grid.advance(0, 0);
        assert_eq!(grid.current(), &[0xE0, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn edges_read_current_generation() {
        let grid = AutomatonGrid::from_row([0x80, 0x00, 0x00, 0x01]);
        assert_eq!(grid.left_edge(), 1);
        assert_eq!(grid.right_edge(), 1);
        let grid = AutomatonGrid::from_row([0x7F, 0xFF, 0xFF, 0xFE]);
        assert_eq!(grid.left_edge(), 0);
        assert_eq!(grid.right_edge(), 0);
    }

    #[test]
    fn seeded_only_fills_first_generation() {
        let mut rng = SmallRng::seed_from_u64(7);
        let grid = AutomatonGrid::seeded(&mut rng);
        assert_eq!(grid.generation(), 0);
        for slot in 1..8 {
            assert_eq!(grid.history().slots()[slot], [0; WIDTH]);
        }
    }

    #[test]
    fn history_wraps_after_eight_generations() {
        let mut grid = AutomatonGrid::from_row([0x00, 0x80, 0x00, 0x00]);
        for _ in 0..8 {
            grid.advance(0, 0);
        }
        assert_eq!(grid.generation(), 8);
        assert_eq!(grid.current_row(), 0);
        assert_ne!(grid.current(), &[0x00, 0x80, 0x00, 0x00]);
    }
}
