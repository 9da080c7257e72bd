use crate::base62;
use jiff::{SignedDuration, Timestamp};
use modular_bitfield::prelude::*;
use std::cmp::Ordering;
use std::fmt;

/// Width of the node id field.
pub const NODE_BITS: u32 = 10;
/// Width of the per-millisecond sequence field.
pub const SEQUENCE_BITS: u32 = 12;
/// Width of the timestamp field, leaving the top bit of the `u64` clear.
pub const TIMESTAMP_BITS: u32 = 41;

pub const MAX_NODE_ID: u16 = (1 << NODE_BITS) - 1;
pub const MAX_SEQUENCE: u16 = (1 << SEQUENCE_BITS) - 1;
pub const MAX_TIMESTAMP: u64 = (1 << TIMESTAMP_BITS) - 1;
/// Largest packed identifier; the top bit of the `u64` is reserved.
pub const MAX_ID: u64 = i64::MAX as u64;

pub const NODE_SHIFT: u32 = SEQUENCE_BITS;
pub const TIMESTAMP_SHIFT: u32 = NODE_BITS + SEQUENCE_BITS;

/// A 63-bit snowflake identifier.
///
/// Fields are declared least significant first, so the packed `u64` reads
/// `timestamp | node_id | sequence` from the most significant bit down.
#[bitfield]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlakeId {
    /// 12 bits for sequence number (resets every millisecond).
    pub sequence: B12,
    /// 10 bits for node ID (allows up to 1024 nodes).
    pub node_id: B10,
    /// 41 bits for timestamp (milliseconds since the node's epoch).
    pub timestamp: B41,
    #[skip]
    __: B1,
}

impl FlakeId {
    pub(crate) fn compose(timestamp: u64, node_id: u16, sequence: u16) -> Self {
        FlakeId::new()
            .with_timestamp(timestamp & MAX_TIMESTAMP)
            .with_node_id(node_id & MAX_NODE_ID)
            .with_sequence(sequence & MAX_SEQUENCE)
    }

    /// Returns the packed integer value.
    pub fn to_u64(self) -> u64 {
        u64::from_le_bytes(self.into_bytes())
    }

    /// Unpacks an integer value. The reserved top bit is discarded.
    pub fn from_u64(value: u64) -> Self {
        Self::compose(
            value >> TIMESTAMP_SHIFT,
            (value >> NODE_SHIFT) as u16,
            value as u16,
        )
    }

    /// Absolute time the id was minted at, given the epoch of its node.
    ///
    /// Returns `None` if the result falls outside the range `Timestamp` supports.
    pub fn timestamp_in(self, epoch: Timestamp) -> Option<Timestamp> {
        epoch
            .checked_add(SignedDuration::from_millis(self.timestamp() as i64))
            .ok()
    }
}

impl From<FlakeId> for u64 {
    fn from(id: FlakeId) -> Self {
        id.to_u64()
    }
}

impl From<u64> for FlakeId {
    fn from(value: u64) -> Self {
        FlakeId::from_u64(value)
    }
}

impl PartialOrd for FlakeId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FlakeId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_u64().cmp(&other.to_u64())
    }
}

impl fmt::Debug for FlakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlakeId")
            .field("timestamp", &self.timestamp())
            .field("node_id", &self.node_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}

impl fmt::Display for FlakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&base62::encode(self.to_u64()))
    }
}
