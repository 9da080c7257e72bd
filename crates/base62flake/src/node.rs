use crate::{
    base62_id::Base62Id,
    clock::{Clock, SystemClock},
    error::Error,
    flake_id::{FlakeId, MAX_NODE_ID, MAX_SEQUENCE},
};
use jiff::Timestamp;
use parking_lot::Mutex;
use tracing::{debug, trace};
use typed_builder::TypedBuilder;

/// 2024-01-01T00:00:00Z
pub const DEFAULT_EPOCH: Timestamp = Timestamp::constant(1_704_067_200, 0);

/// Configures a [`Node`].
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct NodeSettings {
    /// A unique node index in the range `[0, 1023]`.
    #[builder]
    pub node_id: u16,
    /// Zero point of the timestamp field. Only millisecond precision is used.
    #[builder(default = DEFAULT_EPOCH)]
    pub epoch: Timestamp,
}

#[derive(Debug, Default)]
struct NodeState {
    /// Unix milliseconds of the last minted id.
    last_timestamp: i64,
    sequence: u16,
}

/// A thread-safe snowflake generator for one node id.
///
/// Ids from a single node never decrease; ids from nodes with different
/// node ids never collide.
pub struct Node<C: Clock = SystemClock> {
    epoch: Timestamp,
    node_id: u16,
    clock: C,
    state: Mutex<NodeState>,
}

impl Node<SystemClock> {
    /// Creates a node with the default epoch, backed by the system clock.
    pub fn new(node_id: u16) -> Result<Self, Error> {
        Self::with_settings(NodeSettings::builder().node_id(node_id).build())
    }

    /// Creates a node backed by the system clock.
    pub fn with_settings(settings: NodeSettings) -> Result<Self, Error> {
        Self::with_clock(settings, SystemClock)
    }
}

impl<C: Clock> Node<C> {
    /// Creates a node that reads time from `clock`.
    ///
    /// Fails if the node id is out of range or the epoch is ahead of the clock.
    pub fn with_clock(settings: NodeSettings, clock: C) -> Result<Self, Error> {
        if settings.node_id > MAX_NODE_ID {
            return Err(Error::InvalidNodeId {
                node_id: settings.node_id,
                max_node_id: MAX_NODE_ID,
            });
        }

        let now = clock.now();
        if settings.epoch > now {
            return Err(Error::EpochAhead {
                epoch: settings.epoch,
                now,
            });
        }

        Ok(Self::unchecked(settings, clock))
    }

    /// Skips validation; `settings.node_id` must already be in range.
    pub(crate) fn unchecked(settings: NodeSettings, clock: C) -> Self {
        Self {
            epoch: settings.epoch,
            node_id: settings.node_id & MAX_NODE_ID,
            clock,
            state: Mutex::new(NodeState::default()),
        }
    }

    pub fn node_id(&self) -> u16 {
        self.node_id
    }

    pub fn epoch(&self) -> Timestamp {
        self.epoch
    }

    /// Mints the next id.
    ///
    /// Never fails. If the 4096 sequence numbers of the current millisecond
    /// are used up, spins until the clock reaches the next millisecond.
    /// A clock that moves backwards is treated as standing still at the last
    /// timestamp used, and a clock reading before the epoch as standing still
    /// at the epoch.
    pub fn next_id(&self) -> FlakeId {
        let mut state = self.state.lock();

        let epoch = self.epoch.as_millisecond();
        let mut now = self.clock.now().as_millisecond();

        if now < epoch {
            trace!(
                node_id = self.node_id,
                now,
                epoch,
                "clock is before epoch, using epoch"
            );
            now = epoch;
        }

        if now < state.last_timestamp {
            trace!(
                node_id = self.node_id,
                now,
                last_timestamp = state.last_timestamp,
                "clock moved backwards, reusing last timestamp"
            );
            now = state.last_timestamp;
        }

        if now == state.last_timestamp {
            state.sequence = (state.sequence + 1) & MAX_SEQUENCE;
            if state.sequence == 0 {
                debug!(
                    node_id = self.node_id,
                    last_timestamp = state.last_timestamp,
                    "sequence exhausted, waiting for next millisecond"
                );
                now = self.clock.wait_past(state.last_timestamp).as_millisecond();
            }
        } else {
            state.sequence = 0;
        }

        state.last_timestamp = now;

        // now >= epoch from here on
        let elapsed = (now - epoch) as u64;
        FlakeId::compose(elapsed, self.node_id, state.sequence)
    }

    /// Mints the next id and encodes it as base62.
    pub fn generate(&self) -> Base62Id {
        self.next_id().into()
    }
}

impl<C: Clock> std::fmt::Debug for Node<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("node_id", &self.node_id)
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base62;
    use crate::clock::test_clock::TestClock;
    use std::collections::HashSet;

    const EPOCH_MILLIS: i64 = 1_704_067_200_000;

    fn make_node(node_id: u16, clock: &TestClock) -> Node<TestClock> {
        let settings = NodeSettings::builder().node_id(node_id).build();
        Node::with_clock(settings, clock.clone()).unwrap()
    }

    #[test]
    fn default_epoch_is_2024() {
        assert_eq!(DEFAULT_EPOCH.as_millisecond(), EPOCH_MILLIS);
        assert_eq!(DEFAULT_EPOCH, "2024-01-01T00:00:00Z".parse().unwrap());
    }

    #[test]
    fn accepts_every_node_id_in_range() {
        for node_id in 0..=MAX_NODE_ID {
            assert_eq!(Node::new(node_id).unwrap().node_id(), node_id);
        }
    }

    #[test]
    fn rejects_node_id_out_of_range() {
        for node_id in [MAX_NODE_ID + 1, 4_096, u16::MAX] {
            assert_eq!(
                Node::new(node_id).unwrap_err(),
                Error::InvalidNodeId {
                    node_id,
                    max_node_id: MAX_NODE_ID
                }
            );
        }
    }

    #[test]
    fn first_id_has_sequence_zero() {
        let clock = TestClock::from_millis(EPOCH_MILLIS + 100);
        let node = make_node(0, &clock);
        let id = node.next_id();
        assert_eq!(id.sequence(), 0);
        assert_eq!(id.timestamp(), 100);
    }

    #[test]
    fn same_millisecond_increments_sequence() {
        let clock = TestClock::from_millis(EPOCH_MILLIS + 100);
        let node = make_node(0, &clock);
        let sequences: Vec<_> = (0..3).map(|_| node.next_id().sequence()).collect();
        assert_eq!(sequences, vec![0, 1, 2]);
    }

    #[test]
    fn new_millisecond_resets_sequence() {
        let clock = TestClock::from_millis(EPOCH_MILLIS + 100);
        let node = make_node(0, &clock);
        node.next_id();
        node.next_id();
        clock.advance_millis(1);
        let id = node.next_id();
        assert_eq!(id.sequence(), 0);
        assert_eq!(id.timestamp(), 101);
    }

    #[test]
    fn sequence_overflow_waits_for_next_millisecond() {
        let clock = TestClock::from_millis(EPOCH_MILLIS + 100);
        let node = make_node(7, &clock);

        let first_ms: Vec<_> = (0..=MAX_SEQUENCE).map(|_| node.next_id()).collect();
        assert!(first_ms.iter().all(|id| id.timestamp() == 100));
        assert_eq!(first_ms.last().unwrap().sequence(), MAX_SEQUENCE);
        assert_eq!(clock.waits(), 0);

        // The 4097th call must wait for millisecond 101; sequence wraps to 0.
        let id = node.next_id();
        assert_eq!(clock.waits(), 1);
        assert_eq!(id.sequence(), 0);
        assert_eq!(id.timestamp(), 101);
        assert!(id > *first_ms.last().unwrap());
    }

    #[test]
    fn clock_moving_backwards_reuses_last_timestamp() {
        let clock = TestClock::from_millis(EPOCH_MILLIS + 500);
        let node = make_node(1, &clock);
        let before = node.next_id();

        clock.set_millis(EPOCH_MILLIS + 200);
        let after = node.next_id();

        assert_eq!(after.timestamp(), 500);
        assert_eq!(after.sequence(), 1);
        assert!(after > before);
    }

    #[test]
    fn rejects_epoch_ahead_of_clock() {
        let clock = TestClock::from_millis(EPOCH_MILLIS - 10);
        let settings = NodeSettings::builder().node_id(0).build();
        assert_eq!(
            Node::with_clock(settings, clock.clone()).unwrap_err(),
            Error::EpochAhead {
                epoch: DEFAULT_EPOCH,
                now: clock.now()
            }
        );
    }

    #[test]
    fn epoch_equal_to_clock_is_accepted() {
        let clock = TestClock::from_millis(EPOCH_MILLIS);
        let node = make_node(0, &clock);
        assert_eq!(node.next_id().timestamp(), 0);
    }

    #[test]
    fn mints_before_epoch_stay_unique() {
        let clock = TestClock::from_millis(EPOCH_MILLIS - 10);
        let settings = NodeSettings::builder().node_id(5).build();
        let node = Node::unchecked(settings, clock.clone());

        let a = node.next_id();
        clock.advance_millis(1);
        let b = node.next_id();

        assert_ne!(a, b);
        assert!(a < b);
        assert_eq!(a.timestamp(), 0);
        assert_eq!(b.timestamp(), 0);
        assert_eq!(b.sequence(), a.sequence() + 1);
    }

    #[test]
    fn clock_rolled_back_before_epoch_stays_unique() {
        let clock = TestClock::from_millis(EPOCH_MILLIS + 3);
        let node = make_node(2, &clock);
        let mut ids = vec![node.next_id()];

        clock.set_millis(EPOCH_MILLIS - 50);
        for _ in 0..10 {
            clock.advance_millis(1);
            ids.push(node.next_id());
        }

        assert!(ids.iter().all(|id| id.timestamp() == 3));
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn sequence_exhaustion_before_epoch_waits_past_epoch() {
        let clock = TestClock::from_millis(EPOCH_MILLIS - 10);
        let settings = NodeSettings::builder().node_id(0).build();
        let node = Node::unchecked(settings, clock.clone());

        let before: HashSet<_> = (0..=MAX_SEQUENCE).map(|_| node.next_id()).collect();
        assert_eq!(before.len(), MAX_SEQUENCE as usize + 1);

        let id = node.next_id();
        assert_eq!(clock.waits(), 1);
        assert_eq!(id.timestamp(), 1);
        assert_eq!(id.sequence(), 0);
        assert!(!before.contains(&id));
    }

    #[test]
    fn custom_epoch_shifts_timestamp_field() {
        let clock = TestClock::from_millis(10_000);
        let settings = NodeSettings::builder()
            .node_id(3)
            .epoch(Timestamp::from_millisecond(4_000).unwrap())
            .build();
        let node = Node::with_clock(settings, clock).unwrap();
        let id = node.next_id();
        assert_eq!(id.timestamp(), 6_000);
        assert_eq!(id.timestamp_in(node.epoch()).unwrap().as_millisecond(), 10_000);
    }

    #[test]
    fn node_id_is_embedded() {
        let clock = TestClock::from_millis(EPOCH_MILLIS + 1);
        let node = make_node(42, &clock);
        let ids: Vec<_> = (0..5).map(|_| node.generate()).collect();

        let unique: HashSet<_> = ids.iter().map(|id| id.as_str().to_owned()).collect();
        assert_eq!(unique.len(), 5);

        let flakes: Vec<_> = ids.iter().map(|id| id.to_flake_id()).collect();
        assert!(flakes.iter().all(|id| id.node_id() == 42));
        assert!(flakes.windows(2).all(|w| w[0].timestamp() <= w[1].timestamp()));
    }

    #[test]
    fn different_nodes_never_collide_at_same_timestamp() {
        let clock = TestClock::from_millis(EPOCH_MILLIS + 1_000);
        let a = make_node(1, &clock);
        let b = make_node(2, &clock);

        let mut seen = HashSet::new();
        for _ in 0..100 {
            assert!(seen.insert(a.next_id().to_u64()));
            assert!(seen.insert(b.next_id().to_u64()));
        }
    }

    #[test]
    fn generate_encodes_next_id() {
        let clock = TestClock::from_millis(EPOCH_MILLIS + 1);
        let node = make_node(0, &clock);
        let code = node.generate();
        let expected = FlakeId::compose(1, 0, 0);
        assert_eq!(code.as_str(), base62::encode(expected.to_u64()));
    }
}
