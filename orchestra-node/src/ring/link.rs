/// Non-blocking byte link to the next node in the chain.
///
/// Firmware implements this over a UART (RX filled by the receive interrupt,
/// TX written directly); tests use [`QueueLink`](super::QueueLink).
pub trait ByteLink {
    /// Error type for transmit failures.
    type Error: core::fmt::Debug;

    /// Next received byte, or `None` if nothing is pending. Never blocks.
    fn read(&mut self) -> Option<u8>;

    /// Queue one byte for transmission. Never blocks.
    fn write(&mut self, byte: u8) -> Result<(), Self::Error>;
}
