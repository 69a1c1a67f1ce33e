use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};

use bth_types::BlockTime;

/// Source of block timestamps for new transactions.
pub trait Clock: Debug + Send + Sync {
    fn now(&self) -> BlockTime;
}

/// Wall-clock time.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> BlockTime {
        BlockTime::now()
    }
}

/// A clock that only moves when told to, and never backwards.
#[derive(Debug, Default)]
pub struct ManualClock {
    secs: AtomicU64,
}

impl ManualClock {
    pub fn new(start: BlockTime) -> Self {
        Self {
            secs: AtomicU64::new(start.as_secs()),
        }
    }

    /// Move the clock to `time` if that is later than now. Returns the new time.
    pub fn set(&self, time: BlockTime) -> BlockTime {
        let previous = self.secs.fetch_max(time.as_secs(), Ordering::SeqCst);
        BlockTime::from_secs(previous.max(time.as_secs()))
    }

    /// Advance by `secs`. Returns the new time.
    pub fn advance(&self, secs: u64) -> BlockTime {
        let mut current = self.secs.load(Ordering::SeqCst);
        loop {
            let next = current.saturating_add(secs);
            match self
                .secs
                .compare_exchange(current, next, Ordering::SeqCst, Ordering::SeqCst)
            {
                Ok(_) => return BlockTime::from_secs(next),
                Err(actual) => current = actual,
            }
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> BlockTime {
        BlockTime::from_secs(self.secs.load(Ordering::SeqCst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_advances() {
        let clock = ManualClock::new(BlockTime::from_secs(100));
        assert_eq!(clock.now().as_secs(), 100);
        assert_eq!(clock.advance(12).as_secs(), 112);
        assert_eq!(clock.now().as_secs(), 112);
    }

    #[test]
    fn manual_clock_never_moves_backwards() {
        let clock = ManualClock::new(BlockTime::from_secs(500));
        assert_eq!(clock.set(BlockTime::from_secs(400)).as_secs(), 500);
        assert_eq!(clock.set(BlockTime::from_secs(600)).as_secs(), 600);
        assert_eq!(clock.now().as_secs(), 600);
    }

    #[test]
    fn system_clock_is_nonzero() {
        assert!(!SystemClock.now().is_zero());
    }
}
