//! Record id generation.
//!
//! # Responsibility
//! - Hand out integer ids for new projects and milestones.
//! - Allow deterministic substitution in tests.
//!
//! # Invariants
//! - Ids returned by one generator are strictly increasing until `i64::MAX`,
//!   where generators saturate; callers detect exhaustion by comparing
//!   against ids already stored.
//! - `MonotonicIdGenerator` never repeats an id inside one process, even when
//!   called several times within the same millisecond.
//! - Generators know nothing about persisted ids; the project service bumps
//!   ids past the largest stored one.

use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Source of fresh record ids.
pub trait IdGenerator {
    fn next_id(&self) -> i64;
}

impl<G: IdGenerator + ?Sized> IdGenerator for &G {
    fn next_id(&self) -> i64 {
        (**self).next_id()
    }
}

/// Clock-derived generator: epoch milliseconds, bumped past the last id.
#[derive(Debug, Default)]
pub struct MonotonicIdGenerator {
    last: AtomicI64,
}

impl MonotonicIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a generator whose first id is greater than `floor`.
    pub fn starting_after(floor: i64) -> Self {
        Self {
            last: AtomicI64::new(floor),
        }
    }
}

impl IdGenerator for MonotonicIdGenerator {
    fn next_id(&self) -> i64 {
        let now = epoch_millis();
        let mut current = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(current.saturating_add(1));
            match self.last.compare_exchange_weak(
                current,
                candidate,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(observed) => current = observed,
            }
        }
    }
}

/// Deterministic counter for tests and fixtures.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    next: AtomicI64,
}

impl SequentialIdGenerator {
    pub fn starting_at(first: i64) -> Self {
        Self {
            next: AtomicI64::new(first),
        }
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&self) -> i64 {
        let mut current = self.next.load(Ordering::Relaxed);
        loop {
            let following = current.saturating_add(1);
            match self.next.compare_exchange_weak(
                current,
                following,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return current,
                Err(observed) => current = observed,
            }
        }
    }
}

fn epoch_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{IdGenerator, MonotonicIdGenerator, SequentialIdGenerator};

    #[test]
    fn monotonic_ids_strictly_increase_within_one_millisecond() {
        let ids = MonotonicIdGenerator::new();
        let generated: Vec<i64> = (0..1_000).map(|_| ids.next_id()).collect();
        assert!(generated.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn monotonic_ids_respect_floor_ahead_of_clock() {
        let ids = MonotonicIdGenerator::starting_after(i64::MAX - 10);
        assert_eq!(ids.next_id(), i64::MAX - 9);
    }

    #[test]
    fn monotonic_ids_saturate_at_max_without_panicking() {
        let ids = MonotonicIdGenerator::starting_after(i64::MAX - 1);
        assert_eq!(ids.next_id(), i64::MAX);
        assert_eq!(ids.next_id(), i64::MAX);
    }

    #[test]
    fn sequential_ids_count_up() {
        let ids = SequentialIdGenerator::starting_at(100);
        assert_eq!(ids.next_id(), 100);
        assert_eq!((&ids).next_id(), 101);
    }
}
