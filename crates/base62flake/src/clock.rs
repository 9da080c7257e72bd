use jiff::Timestamp;

pub trait Clock: Send + Sync {
    /// Returns the current time of the clock
    fn now(&self) -> Timestamp;
    /// Block until the clock reads a millisecond strictly after `last_millis`
    /// (Unix milliseconds) and return that reading.
    fn wait_past(&self, last_millis: i64) -> Timestamp;
}

/// Wall clock backed by [`Timestamp::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }

    fn wait_past(&self, last_millis: i64) -> Timestamp {
        // Spin instead of sleeping: the gap is at most one millisecond and
        // thread::sleep granularity is coarser than that on most platforms.
        // Not starvation-free if the wall clock is held back deliberately.
        loop {
            let now = Timestamp::now();
            if now.as_millisecond() > last_millis {
                return now;
            }
            std::hint::spin_loop();
        }
    }
}
