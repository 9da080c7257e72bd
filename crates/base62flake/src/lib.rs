//! Time-ordered, collision-resistant identifiers encoded in base62.
//!
//! Each [`Node`] packs a millisecond timestamp, its node id and a
//! per-millisecond sequence into a 63-bit integer and renders it with the
//! `0-9A-Za-z` alphabet. Nodes with distinct node ids never mint the same id,
//! so no coordination is needed beyond handing out node ids.
//!
//! ```
//! let node = base62flake::Node::new(42).unwrap();
//! let id = node.generate();
//! assert_eq!(id.to_flake_id().node_id(), 42);
//!
//! // or use the process-wide default node
//! let id = base62flake::generate();
//! assert!(!id.as_str().is_empty());
//! ```

pub mod base62;
mod base62_id;
mod clock;
mod default;
pub mod error;
mod flake_id;
mod node;

pub use base62_id::Base62Id;
pub use clock::{Clock, SystemClock};
#[cfg(feature = "test-util")]
pub use default::reset_default_node;
pub use default::{default_node, generate, set_default_node_id, DEFAULT_NODE_ID};
pub use error::{DecodeError, Error};
pub use flake_id::{
    FlakeId, MAX_ID, MAX_NODE_ID, MAX_SEQUENCE, MAX_TIMESTAMP, NODE_BITS, NODE_SHIFT,
    SEQUENCE_BITS, TIMESTAMP_BITS, TIMESTAMP_SHIFT,
};
pub use node::{Node, NodeSettings, DEFAULT_EPOCH};
