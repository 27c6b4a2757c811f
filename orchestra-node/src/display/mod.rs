//! LED matrix output.
//!
//! The core talks to the panel only through [`Display`]. [`DisplayRenderer`]
//! turns the generation history into pixels; [`Max7219`] (feature
//! `max7219`) drives a chain of MAX7219 8x8 modules over `embedded-hal`.

mod render;

#[cfg(feature = "max7219")]
mod max7219;

pub use render::DisplayRenderer;

#[cfg(feature = "max7219")]
pub use max7219::{DisplayError, Max7219};

/// Brightness while the node is awake. Panels start at this level.
pub const ACTIVE_INTENSITY: u8 = 1;
/// Brightness while asleep.
pub const SLEEP_INTENSITY: u8 = 0;

/// Pixel-buffered display.
pub trait Display {
    /// Error type for hardware writes.
    type Error: core::fmt::Debug;

    /// Clear the pixel buffer. Nothing is sent until [`commit`](Self::commit).
    fn clear(&mut self);

    /// Light one pixel in the buffer. `x` runs left to right across the
    /// whole row, `y` top to bottom.
    fn set_pixel(&mut self, x: u8, y: u8);

    /// Flush the buffer to the hardware.
    fn commit(&mut self) -> Result<(), Self::Error>;

    /// Change brightness. Writes to the hardware immediately.
    fn set_intensity(&mut self, level: u8) -> Result<(), Self::Error>;
}
