use super::{Display, ACTIVE_INTENSITY, SLEEP_INTENSITY};
use crate::automaton::AutomatonGrid;
use crate::constants::HISTORY_DEPTH;

/// Draws the history with the newest generation on the bottom row and
/// scrolls older generations upward.
#[derive(Debug, Clone)]
pub struct DisplayRenderer {
    /// Activity state last written to the panel's intensity register.
    shown_active: bool,
}

impl DisplayRenderer {
    /// `shown_active` is the state the panel was initialised to.
    pub const fn new(shown_active: bool) -> Self {
        DisplayRenderer { shown_active }
    }

    /// Screen row of history slot `slot` when `current_row` is the newest.
    pub const fn screen_row(slot: usize, current_row: usize) -> u8 {
        ((slot + 2 * HISTORY_DEPTH - current_row - 1) % HISTORY_DEPTH) as u8
    }

    /// Redraw the whole panel. Intensity is only written when `active`
    /// differs from what the panel already shows.
    pub fn render<D: Display>(
        &mut self,
        display: &mut D,
        grid: &AutomatonGrid,
        active: bool,
    ) -> Result<(), D::Error> {
        display.clear();

        if active != self.shown_active {
            let level = if active { ACTIVE_INTENSITY } else { SLEEP_INTENSITY };
            display.set_intensity(level)?;
            self.shown_active = active;
        }

        let current_row = grid.current_row();
        for (slot, row) in grid.history().slots().iter().enumerate() {
            let y = Self::screen_row(slot, current_row);
            for (i, &byte) in row.iter().enumerate() {
                for b in (0..8).rev() {
                    if (byte >> b) & 1 == 1 {
                        display.set_pixel((7 - b + i * 8) as u8, y);
                    }
                }
            }
        }

        display.commit()
    }
}
