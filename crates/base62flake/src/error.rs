use jiff::Timestamp;
use thiserror::Error;

/// Errors returned when configuring a node or the default node.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    #[error("invalid node id {node_id}; expected 0..={max_node_id}")]
    InvalidNodeId { node_id: u16, max_node_id: u16 },
    #[error("epoch is ahead of current clock time: epoch={epoch}, now={now}")]
    EpochAhead { epoch: Timestamp, now: Timestamp },
    #[error("default node is already initialized with node id {node_id}")]
    AlreadyInitialized { node_id: u16 },
}

/// Errors returned when decoding a base62 string.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("base62 input is empty")]
    Empty,
    #[error("invalid base62 character {character:?} at index {index}")]
    InvalidCharacter { character: char, index: usize },
    #[error("base62 value does not fit in 64 bits")]
    Overflow,
    #[error("value {value} sets the reserved top bit of an identifier")]
    ReservedBit { value: u64 },
}
