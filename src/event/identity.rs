//! Process unique event identities.
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identity counter shared by every event of the process.
pub static EVENT_COUNTER: EventCounter = EventCounter::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct EventId(u64);

impl EventId {
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "M{}", self.0)
    }
}

/// Identity handed to a new event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub id: EventId,
    pub event_number: u64,
}

/// Monotonic identity source, starts at zero and never rewinds.
///
/// Safe to share between threads constructing events concurrently.
#[derive(Debug, Default)]
pub struct EventCounter {
    next_id: AtomicU64,
    next_number: AtomicU64,
}

impl EventCounter {
    pub const fn new() -> Self {
        Self {
            next_id: AtomicU64::new(0),
            next_number: AtomicU64::new(0),
        }
    }

    pub fn next_identity(&self) -> Identity {
        Identity {
            id: EventId(self.next_id.fetch_add(1, Ordering::Relaxed)),
            event_number: self.next_number.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Number of identities handed out so far.
    pub fn issued(&self) -> u64 {
        self.next_number.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;

    #[test]
    fn test_counter_starts_at_zero() {
        let counter = EventCounter::new();
        let first = counter.next_identity();
        let second = counter.next_identity();
        assert_eq!(first.id.value(), 0);
        assert_eq!(first.event_number, 0);
        assert_eq!(second.event_number, 1);
        assert_eq!(second.id.to_string(), "M1");
        assert_eq!(counter.issued(), 2);
    }

    #[test]
    fn test_concurrent_identities_are_unique() {
        let counter = Arc::new(EventCounter::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let counter = Arc::clone(&counter);
                std::thread::spawn(move || {
                    (0..250)
                        .map(|_| counter.next_identity().id)
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        let mut ids = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(ids.insert(id), "duplicate id {id}");
            }
        }
        assert_eq!(ids.len(), 1000);
        assert_eq!(counter.issued(), 1000);
    }
}
