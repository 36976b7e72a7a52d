use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::errors::{SchedulingError, SchedulingResult};

/// In-process serialization of schedule (re)generation per division cycle.
/// Two concurrent runs on one cycle would race their preservation passes, so
/// the second caller is rejected instead of queued.
#[derive(Debug, Default)]
pub struct CycleLocks {
    in_flight: Mutex<HashSet<i64>>,
}

impl CycleLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn acquire(self: &Arc<Self>, cycle_id: i64) -> SchedulingResult<CycleGuard> {
        let mut in_flight = self.lock_set();
        if !in_flight.insert(cycle_id) {
            return Err(SchedulingError::Conflict(format!(
                "schedule generation already in progress for cycle {cycle_id}"
            )));
        }
        Ok(CycleGuard {
            locks: Arc::clone(self),
            cycle_id,
        })
    }

    fn lock_set(&self) -> std::sync::MutexGuard<'_, HashSet<i64>> {
        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Releases the cycle on drop, including on error paths.
pub struct CycleGuard {
    locks: Arc<CycleLocks>,
    cycle_id: i64,
}

impl Drop for CycleGuard {
    fn drop(&mut self) {
        self.locks.lock_set().remove(&self.cycle_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_cycle_conflicts_until_released() {
        let locks = Arc::new(CycleLocks::new());

        let guard = locks.acquire(1).unwrap();
        assert!(matches!(
            locks.acquire(1),
            Err(SchedulingError::Conflict(_))
        ));
        // A different cycle is unaffected.
        locks.acquire(2).unwrap();

        drop(guard);
        locks.acquire(1).unwrap();
    }
}
