use std::sync::Mutex;

use chrono::{DateTime, Utc};

/// Wall clock that never goes backwards.
///
/// Each reading is at least as late as the previous one, so timestamps
/// assigned in insertion order are non-decreasing even if the system clock
/// steps back.
#[derive(Debug)]
pub struct MonotonicClock {
    last: Mutex<DateTime<Utc>>,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            last: Mutex::new(DateTime::<Utc>::MIN_UTC),
        }
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.observe(Utc::now())
    }

    /// Clamp `reading` against the last value handed out and record it.
    pub fn observe(&self, reading: DateTime<Utc>) -> DateTime<Utc> {
        let mut last = self.last.lock().expect("lock poisoned");
        if reading > *last {
            *last = reading;
        }
        *last
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn never_goes_backwards() {
        let clock = MonotonicClock::new();
        let t0 = Utc::now();
        assert_eq!(clock.observe(t0), t0);
        assert_eq!(clock.observe(t0 - Duration::seconds(30)), t0);
        let t1 = t0 + Duration::seconds(1);
        assert_eq!(clock.observe(t1), t1);
    }

    #[test]
    fn successive_readings_are_ordered() {
        let clock = MonotonicClock::new();
        let mut prev = clock.now();
        for _ in 0..100 {
            let next = clock.now();
            assert!(next >= prev);
            prev = next;
        }
    }
}
