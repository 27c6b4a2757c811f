//! Single-byte ring messages.
//!
//! | Byte | Meaning |
//! |------|---------|
//! | `(id << 2) \| (left << 1) \| right` | boundary-bit exchange from node `id` |
//! | [`READY_SENTINEL`] (`0x81`) | startup barrier token |
//!
//! `0x81` would decode as node 32, which no supported ring contains, so the
//! sentinel is never produced by [`encode`].

use crate::constants::MAX_RING_SIZE;

/// Startup barrier token.
pub const READY_SENTINEL: u8 = 0x81;

/// Pack a sender id and the sender's own edge cells into one byte.
///
/// `id` must be below [`MAX_RING_SIZE`]; only the low bit of each edge is used.
#[inline]
pub const fn encode(id: u8, left: u8, right: u8) -> u8 {
    debug_assert!(id < MAX_RING_SIZE);
    (id << 2) | ((left & 1) << 1) | (right & 1)
}

/// Inverse of [`encode`]: `(id, left, right)`.
#[inline]
pub const fn decode(byte: u8) -> (u8, u8, u8) {
    (byte >> 2, (byte >> 1) & 1, byte & 1)
}

/// A parsed ring byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingMessage {
    /// Startup barrier token.
    Ready,
    /// Boundary-bit exchange. `left` / `right` are the sender's own
    /// leftmost and rightmost cells.
    Exchange { sender: u8, left: u8, right: u8 },
}

impl RingMessage {
    pub const fn parse(byte: u8) -> Self {
        if byte == READY_SENTINEL {
            return RingMessage::Ready;
        }
        let (sender, left, right) = decode(byte);
        RingMessage::Exchange { sender, left, right }
    }

    pub const fn to_byte(self) -> u8 {
        match self {
            RingMessage::Ready => READY_SENTINEL,
            RingMessage::Exchange { sender, left, right } => encode(sender, left, right),
        }
    }
}
