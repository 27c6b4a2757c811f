//! Startup barrier and boundary-bit relay.
//!
//! The physical topology is a chain of point-to-point serial links closed
//! into a loop: every node transmits to its clockwise neighbour only. Each
//! node is both a participant and a router. A message travels the whole
//! loop, every node picks out the bits it needs, and the sender drops it when
//! it comes back.

use tracing::{debug, trace};

use super::message::RingMessage;
use crate::config::{NodeConfig, NodeId};

/// Startup synchronization progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandshakeState {
    /// Nothing seen or sent yet.
    AwaitingReady,
    /// Origin: sentinel sent, waiting for it to come back.
    /// Others: sentinel relayed, waiting for the first exchange.
    ReadySent,
    /// Steady-state cycling.
    Running,
}

/// What to do with a received byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutingDecision {
    /// Forward the byte unchanged to the next node.
    Relay,
    /// Swallow the byte.
    Drop,
    /// The origin's sentinel came back around: the ring is up. Not relayed;
    /// the caller publishes this node's first exchange.
    CompleteBarrier,
}

/// Boundary bits for the current generation.
///
/// A neighbour can run at most one generation ahead of this node (it needs
/// our bits to get further), so one staged slot per side is enough to keep
/// an early bit from overwriting the one still waiting to be consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoundaryBits {
    left: Option<u8>,
    right: Option<u8>,
    next_left: Option<u8>,
    next_right: Option<u8>,
}

impl BoundaryBits {
    pub const fn new() -> Self {
        BoundaryBits {
            left: None,
            right: None,
            next_left: None,
            next_right: None,
        }
    }

    pub fn set_left(&mut self, bit: u8) {
        if self.left.is_none() {
            self.left = Some(bit & 1);
        } else {
            self.next_left = Some(bit & 1);
        }
    }

    pub fn set_right(&mut self, bit: u8) {
        if self.right.is_none() {
            self.right = Some(bit & 1);
        } else {
            self.next_right = Some(bit & 1);
        }
    }

    pub fn left_received(&self) -> bool {
        self.left.is_some()
    }

    pub fn right_received(&self) -> bool {
        self.right.is_some()
    }

    pub fn is_complete(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }

    /// Consume both bits as `(left, right)` if both arrived, clearing the
    /// received flags and promoting any staged bits.
    pub fn take(&mut self) -> Option<(u8, u8)> {
        let (left, right) = (self.left?, self.right?);
        self.left = self.next_left.take();
        self.right = self.next_right.take();
        Some((left, right))
    }
}

/// Ring protocol state of one node.
#[derive(Debug, Clone)]
pub struct RingProtocol {
    id: NodeId,
    ring_size: u8,
    left: NodeId,
    right: NodeId,
    state: HandshakeState,
    bits: BoundaryBits,
    /// This node has put at least one exchange on the wire.
    published: bool,
    publish_due: bool,
    retry_ticks: u16,
    retry_countdown: u16,
}

impl RingProtocol {
    pub fn new(config: &NodeConfig) -> Self {
        RingProtocol {
            id: config.id,
            ring_size: config.ring_size,
            left: config.left_neighbor(),
            right: config.right_neighbor(),
            state: HandshakeState::AwaitingReady,
            bits: BoundaryBits::new(),
            published: false,
            publish_due: false,
            retry_ticks: config.ready_retry_ticks.max(1),
            retry_countdown: 0,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn state(&self) -> HandshakeState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == HandshakeState::Running
    }

    pub fn bits(&self) -> &BoundaryBits {
        &self.bits
    }

    /// Handshake timer, called once per control tick before the barrier
    /// completes. The origin returns the sentinel to transmit on the first
    /// call and then every `ready_retry_ticks` calls; other nodes never send.
    pub fn poll_ready(&mut self) -> Option<u8> {
        if !self.id.is_origin() || self.state == HandshakeState::Running {
            return None;
        }
        if self.retry_countdown > 0 {
            self.retry_countdown -= 1;
            return None;
        }
        self.retry_countdown = self.retry_ticks - 1;
        if self.state == HandshakeState::AwaitingReady {
            debug!(node = self.id.get(), "sending ready sentinel");
        }
        self.state = HandshakeState::ReadySent;
        Some(RingMessage::Ready.to_byte())
    }

    /// Route one received byte and pick up any boundary bits it carries.
    ///
    /// `generation` is this node's current generation; at generation 0 the
    /// first valid exchange also schedules this node's own first publish
    /// (see [`take_publish_request`](Self::take_publish_request)).
    pub fn on_message_received(&mut self, byte: u8, generation: u16) -> RoutingDecision {
        let (sender, left_bit, right_bit) = match RingMessage::parse(byte) {
            RingMessage::Ready => return self.on_ready(),
            RingMessage::Exchange { sender, left, right } => (sender, left, right),
        };
        if sender >= self.ring_size {
            trace!(node = self.id.get(), byte, "dropping message from unknown sender");
            return RoutingDecision::Drop;
        }

        if generation == 0 && !self.published {
            self.publish_due = true;
        }
        if !self.id.is_origin() && self.state != HandshakeState::Running {
            debug!(node = self.id.get(), "first exchange seen, ring running");
            self.state = HandshakeState::Running;
        }

        if sender == self.id.get() {
            trace!(node = self.id.get(), byte, "own message completed the loop");
            return RoutingDecision::Drop;
        }

        // In a ring of two both branches apply to the same sender.
        if sender == self.left.get() {
            self.bits.set_left(right_bit);
        }
        if sender == self.right.get() {
            self.bits.set_right(left_bit);
        }
        RoutingDecision::Relay
    }

    fn on_ready(&mut self) -> RoutingDecision {
        if !self.id.is_origin() {
            if self.state == HandshakeState::AwaitingReady {
                self.state = HandshakeState::ReadySent;
            }
            return RoutingDecision::Relay;
        }
        match self.state {
            HandshakeState::Running => RoutingDecision::Drop,
            _ => {
                debug!(node = self.id.get(), "ready sentinel returned, ring running");
                self.state = HandshakeState::Running;
                RoutingDecision::CompleteBarrier
            }
        }
    }

    /// Whether a received message asked this node to publish its own first
    /// exchange. Clears the request.
    pub fn take_publish_request(&mut self) -> bool {
        core::mem::take(&mut self.publish_due)
    }

    /// Encode this node's edge cells for transmission.
    pub fn encode_own(&mut self, left_edge: u8, right_edge: u8) -> u8 {
        self.published = true;
        self.publish_due = false;
        RingMessage::Exchange {
            sender: self.id.get(),
            left: left_edge,
            right: right_edge,
        }
        .to_byte()
    }

    /// Consume the boundary bits for the current generation if both arrived.
    pub fn take_boundary_bits(&mut self) -> Option<(u8, u8)> {
        self.bits.take()
    }
}
