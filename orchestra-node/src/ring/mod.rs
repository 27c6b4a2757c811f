//! Serial ring transport.
//!
//! Nodes are wired in a loop of one-way serial links. Every byte on the wire
//! is either a boundary-bit exchange or the startup sentinel; see
//! [`message`] for the encoding.
//!
//! ## Components
//!
//! | Item | Purpose |
//! |------|---------|
//! | [`RingProtocol`] | startup barrier, relay/drop routing, boundary-bit capture |
//! | [`ByteLink`] | non-blocking byte I/O to the next node |
//! | [`ByteQueue`] / [`QueueLink`] | lock-free SPSC byte queues, UART RX buffer or simulated wire |
//!
//! ## Message lifetime
//!
//! ```text
//!  node 0 ──▶ node 1 ──▶ node 2 ──▶ node 3 ──┐
//!    ▲  publish   relay      relay      relay │
//!    └──────────────── drop (own id) ◀────────┘
//! ```

pub mod link;
pub mod message;
pub mod protocol;
pub mod queue;

pub use link::ByteLink;
pub use message::{decode, encode, RingMessage, READY_SENTINEL};
pub use protocol::{BoundaryBits, HandshakeState, RingProtocol, RoutingDecision};
pub use queue::{ByteQueue, LinkError, QueueLink};
