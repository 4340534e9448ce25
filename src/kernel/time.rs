use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Wall-clock milliseconds since the Unix epoch.
pub fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Clock that never hands out a smaller timestamp than it already has.
///
/// **KERNEL LAW**: timestamps are non-decreasing in emission order per
/// pipeline instance, even if the wall clock steps backwards.
#[derive(Debug, Default)]
pub struct MonotonicClock {
    high_water: AtomicU64,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            high_water: AtomicU64::new(0),
        }
    }

    pub fn now_ms(&self) -> u64 {
        let now = epoch_ms();
        let prev = self.high_water.fetch_max(now, Ordering::SeqCst);
        now.max(prev)
    }
}
