//! The process-wide default node.
//!
//! The default node is created the first time it is used, with
//! [`DEFAULT_NODE_ID`] unless [`set_default_node_id`] ran earlier. Once it
//! exists its node id never changes for the rest of the process.

use crate::{
    base62_id::Base62Id,
    clock::SystemClock,
    error::Error,
    node::{Node, NodeSettings},
};
use parking_lot::{const_rwlock, RwLock};
use std::sync::Arc;
use tracing::{debug, warn};

/// Node id used when the default node is created implicitly.
pub const DEFAULT_NODE_ID: u16 = 1;

static DEFAULT_NODE: RwLock<Option<Arc<Node>>> = const_rwlock(None);

/// Returns the default node, creating it on first use.
pub fn default_node() -> Arc<Node> {
    if let Some(node) = DEFAULT_NODE.read().as_ref() {
        return Arc::clone(node);
    }

    let mut slot = DEFAULT_NODE.write();
    // another thread may have won the race between the two locks
    let node = slot.get_or_insert_with(|| {
        debug!(node_id = DEFAULT_NODE_ID, "creating default node");
        Arc::new(default_node_with_id())
    });
    Arc::clone(node)
}

fn default_node_with_id() -> Node {
    let settings = NodeSettings::builder().node_id(DEFAULT_NODE_ID).build();
    match Node::with_settings(settings) {
        Ok(node) => node,
        Err(e) => {
            // only EpochAhead reaches here; next_id holds the timestamp at
            // the epoch until the clock catches up
            warn!(error = %e, "system clock is behind the default epoch");
            Node::unchecked(settings, SystemClock)
        }
    }
}

/// Mints an id from the default node.
pub fn generate() -> Base62Id {
    default_node().generate()
}

/// Sets the node id of the default node.
///
/// Must run before the default node is first used. Later calls return
/// [`Error::AlreadyInitialized`] carrying the node id already in use, and
/// leave the default node untouched.
pub fn set_default_node_id(node_id: u16) -> Result<(), Error> {
    let node = Node::new(node_id)?;

    let mut slot = DEFAULT_NODE.write();
    if let Some(existing) = slot.as_ref() {
        return Err(Error::AlreadyInitialized {
            node_id: existing.node_id(),
        });
    }

    debug!(node_id, "creating default node");
    *slot = Some(Arc::new(node));
    Ok(())
}

/// Drops the default node so the next use creates a fresh one.
///
/// Only for test harnesses; never call this in production code.
#[cfg(any(test, feature = "test-util"))]
#[doc(hidden)]
pub fn reset_default_node() {
    *DEFAULT_NODE.write() = None;
}
