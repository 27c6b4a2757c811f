//! MAX7219 LED matrix chain driver.
//!
//! One 8x8 module per automaton byte, daisy-chained on a single SPI bus with
//! a shared chip-select line. Generic over any [`embedded_hal::spi::SpiBus`]
//! and [`embedded_hal::digital::OutputPin`]; the core never touches pins or
//! registers directly.
//!
//! # Example
//!
//! ```ignore
//! let mut panel = Max7219::new(spi, cs);
//! panel.init()?;
//! panel.set_pixel(0, 7);
//! panel.commit()?;
//! ```

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use super::{Display, ACTIVE_INTENSITY};
use crate::constants::{CELLS_PER_ROW, WIDTH};

// ── Registers ──────────────────────────────────────────────────────────────

const REG_DIGIT0: u8 = 0x01;
const REG_DECODE_MODE: u8 = 0x09;
const REG_INTENSITY: u8 = 0x0A;
const REG_SCAN_LIMIT: u8 = 0x0B;
const REG_SHUTDOWN: u8 = 0x0C;
const REG_DISPLAY_TEST: u8 = 0x0F;

/// Modules in the chain.
const DEVICES: usize = WIDTH;
/// Column bytes across the chain, one per cell of a row.
const COLUMNS: usize = CELLS_PER_ROW;

/// Hardware failures of the panel.
#[derive(Debug, thiserror::Error)]
pub enum DisplayError<S, P> {
    #[error("spi write failed: {0:?}")]
    Spi(S),
    #[error("chip select failed: {0:?}")]
    Pin(P),
}

/// Chain of MAX7219 modules with a column buffer.
pub struct Max7219<SPI, CS> {
    spi: SPI,
    cs: CS,
    /// One byte per physical column, bit `n` = row `n` of the module wiring.
    columns: [u8; COLUMNS],
}

impl<SPI, CS> Max7219<SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    pub fn new(spi: SPI, cs: CS) -> Self {
        Max7219 {
            spi,
            cs,
            columns: [0; COLUMNS],
        }
    }

    /// Release the bus and pin.
    pub fn release(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }

    /// Bring every module out of shutdown in matrix mode at the awake
    /// brightness [`DisplayRenderer`](super::DisplayRenderer) expects.
    pub fn init(&mut self) -> Result<(), DisplayError<SPI::Error, CS::Error>> {
        for device in 0..DEVICES {
            self.send(device, REG_SCAN_LIMIT, 7)?;
            self.send(device, REG_DECODE_MODE, 0)?;
            self.send(device, REG_DISPLAY_TEST, 0)?;
            self.send(device, REG_INTENSITY, ACTIVE_INTENSITY)?;
            self.send(device, REG_SHUTDOWN, 1)?;
        }
        Ok(())
    }

    /// Write `data` to `reg` of one module; the others receive no-ops.
    ///
    /// The chain shifts, so the last module's pair goes out first.
    fn send(
        &mut self,
        device: usize,
        reg: u8,
        data: u8,
    ) -> Result<(), DisplayError<SPI::Error, CS::Error>> {
        let mut frame = [0u8; DEVICES * 2];
        let slot = (DEVICES - 1 - device) * 2;
        frame[slot] = reg;
        frame[slot + 1] = data;

        self.cs.set_low().map_err(DisplayError::Pin)?;
        let written = self
            .spi
            .write(&frame)
            .and_then(|_| self.spi.flush())
            .map_err(DisplayError::Spi);
        // Release the chain even if the bus failed.
        self.cs.set_high().map_err(DisplayError::Pin)?;
        written
    }

    #[cfg(test)]
    fn columns(&self) -> &[u8; COLUMNS] {
        &self.columns
    }
}

impl<SPI, CS> Display for Max7219<SPI, CS>
where
    SPI: SpiBus,
    CS: OutputPin,
{
    type Error = DisplayError<SPI::Error, CS::Error>;

    fn clear(&mut self) {
        self.columns = [0; COLUMNS];
    }

    fn set_pixel(&mut self, x: u8, y: u8) {
        // Modules are mounted rotated: screen rows are module columns.
        let (x, y) = (x as usize % COLUMNS, y as usize % 8);
        self.columns[(7 - y) + (x / 8) * 8] |= 1 << (x % 8);
    }

    fn commit(&mut self) -> Result<(), Self::Error> {
        for col in 0..COLUMNS {
            self.send(col / 8, REG_DIGIT0 + (col % 8) as u8, self.columns[col])?;
        }
        Ok(())
    }

    fn set_intensity(&mut self, level: u8) -> Result<(), Self::Error> {
        for device in 0..DEVICES {
            self.send(device, REG_INTENSITY, level & 0x0F)?;
        }
        Ok(())
    }
}
