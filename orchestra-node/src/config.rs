//! Per-unit configuration.
//!
//! Every physical node runs the same firmware; only the node id differs.
//! Everything else is derived from the id through [`NodeRole`] defaults and
//! can be overridden with the `with_*` setters before the node starts.

use crate::constants::{CONTROL_RATE, MAX_RING_SIZE, RING_SIZE};
use crate::sonify::NodeRole;

/// Errors produced while building a [`NodeConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The node id does not fit in the ring.
    #[error("node id {id} is outside a ring of {ring_size} nodes")]
    IdOutOfRange { id: u8, ring_size: u8 },
    /// The ring is too small to wrap or too large for the wire encoding.
    #[error("unsupported ring size {0}")]
    RingSize(u8),
    /// Sleep chance is a percentage.
    #[error("sleep chance {0} is above 100")]
    SleepChance(u8),
}

/// Position of a node in the ring, validated against the ring size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u8);

impl NodeId {
    /// Validate `id` for a ring of `ring_size` nodes.
    pub fn new(id: u8, ring_size: u8) -> Result<Self, ConfigError> {
        if !(2..=MAX_RING_SIZE).contains(&ring_size) {
            return Err(ConfigError::RingSize(ring_size));
        }
        if id >= ring_size {
            return Err(ConfigError::IdOutOfRange { id, ring_size });
        }
        Ok(NodeId(id))
    }

    /// Raw id.
    pub const fn get(self) -> u8 {
        self.0
    }

    /// The node that originates the startup barrier.
    pub const fn is_origin(self) -> bool {
        self.0 == 0
    }

    /// Counter-clockwise neighbour; supplies this node's left boundary bit.
    pub const fn left(self, ring_size: u8) -> NodeId {
        NodeId((self.0 + ring_size - 1) % ring_size)
    }

    /// Clockwise neighbour; supplies this node's right boundary bit.
    pub const fn right(self, ring_size: u8) -> NodeId {
        NodeId((self.0 + 1) % ring_size)
    }
}

/// Build-time configuration of one node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeConfig {
    pub id: NodeId,
    pub ring_size: u8,
    pub role: NodeRole,
    /// Percent chance of falling asleep at each sleep evaluation.
    pub sleep_chance: u8,
    /// Base frequency of the tone oscillator (Hz).
    pub tone_hz: f32,
    /// Minimum control ticks between two generations. Only the origin node
    /// paces the ring; everyone else advances as soon as bits arrive.
    pub pace_ticks: u16,
    /// Control ticks between ready sentinels during the startup barrier.
    pub ready_retry_ticks: u16,
}

impl NodeConfig {
    /// Configuration for `id` in the installation's fixed ring.
    pub fn for_node(id: u8) -> Result<Self, ConfigError> {
        Self::new(id, RING_SIZE)
    }

    /// Configuration for `id` in a ring of `ring_size` nodes.
    pub fn new(id: u8, ring_size: u8) -> Result<Self, ConfigError> {
        let id = NodeId::new(id, ring_size)?;
        let role = NodeRole::from_id(id);
        Ok(NodeConfig {
            id,
            ring_size,
            role,
            sleep_chance: role.sleep_chance(),
            tone_hz: role.tone_hz(),
            pace_ticks: if id.is_origin() { CONTROL_RATE } else { 0 },
            ready_retry_ticks: CONTROL_RATE,
        })
    }

    pub fn with_sleep_chance(mut self, percent: u8) -> Result<Self, ConfigError> {
        if percent > 100 {
            return Err(ConfigError::SleepChance(percent));
        }
        self.sleep_chance = percent;
        Ok(self)
    }

    pub fn with_pace_ticks(mut self, ticks: u16) -> Self {
        self.pace_ticks = ticks;
        self
    }

    pub fn with_ready_retry_ticks(mut self, ticks: u16) -> Self {
        self.ready_retry_ticks = ticks.max(1);
        self
    }

    /// Node supplying the left boundary bit.
    pub fn left_neighbor(&self) -> NodeId {
        self.id.left(self.ring_size)
    }

    /// Node supplying the right boundary bit.
    pub fn right_neighbor(&self) -> NodeId {
        self.id.right(self.ring_size)
    }
}
