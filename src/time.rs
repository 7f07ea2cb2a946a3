//! Time budgets for structural resolution.
//!
//! This module provides a [`Clock`] trait that allows injecting mock clocks
//! in tests, and the [`Timeout`] token handed to parameter resolvers.

use std::time::{Duration, Instant};

/// Abstraction over a monotonic clock for testability.
///
/// # Example
///
/// ```
/// use ini_resolve::time::{Clock, SystemClock};
///
/// let clock = SystemClock;
/// let earlier = clock.now();
/// assert!(clock.now() >= earlier);
/// ```
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> Instant;
}

/// Production clock delegating to [`Instant::now()`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Cancellation token for long-running resolution.
///
/// Resolvers poll [`Timeout::is_expired`] and give up with a timed-out
/// signal once it returns true.
pub trait Timeout {
    /// Returns true once the budget is used up.
    fn is_expired(&self) -> bool;
}

/// A timeout that never expires.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTimeout;

impl Timeout for NoTimeout {
    fn is_expired(&self) -> bool {
        false
    }
}

/// A timeout that expires a fixed duration after creation.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use ini_resolve::time::{Deadline, Timeout};
///
/// let deadline = Deadline::after(Duration::from_secs(60));
/// assert!(!deadline.is_expired());
/// assert!(Deadline::after(Duration::ZERO).is_expired());
/// ```
#[derive(Debug, Clone)]
pub struct Deadline<C: Clock = SystemClock> {
    clock: C,
    expires_at: Instant,
}

impl Deadline<SystemClock> {
    /// Creates a deadline `budget` from now on the system clock.
    #[must_use]
    pub fn after(budget: Duration) -> Self {
        Self::with_clock(SystemClock, budget)
    }
}

impl<C: Clock> Deadline<C> {
    /// Creates a deadline `budget` from now on the given clock.
    ///
    /// A budget too large to represent never expires in practice.
    #[must_use]
    pub fn with_clock(clock: C, budget: Duration) -> Self {
        let now = clock.now();
        let expires_at = now
            .checked_add(budget)
            .unwrap_or_else(|| now + Duration::from_secs(u64::from(u32::MAX)));
        Self { clock, expires_at }
    }

    /// Returns the time left before expiry, zero once expired.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(self.clock.now())
    }
}

impl<C: Clock> Timeout for Deadline<C> {
    fn is_expired(&self) -> bool {
        self.clock.now() >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// A mock clock for testing that returns controlled instants.
    struct MockClock {
        base: Instant,
        /// Milliseconds elapsed since `base`, atomically updated.
        elapsed_ms: AtomicU64,
    }

    impl MockClock {
        fn new() -> Self {
            Self {
                base: Instant::now(),
                elapsed_ms: AtomicU64::new(0),
            }
        }

        fn advance(&self, ms: u64) {
            self.elapsed_ms.fetch_add(ms, Ordering::SeqCst);
        }
    }

    impl Clock for &MockClock {
        fn now(&self) -> Instant {
            self.base + Duration::from_millis(self.elapsed_ms.load(Ordering::SeqCst))
        }
    }

    #[test]
    fn system_clock_is_monotonic() {
        let clock = SystemClock;
        let first = clock.now();
        let second = clock.now();

        assert!(second >= first);
    }

    #[test]
    fn system_clock_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SystemClock>();
    }

    #[test]
    fn no_timeout_never_expires() {
        assert!(!NoTimeout.is_expired());
    }

    #[test]
    fn deadline_expires_after_budget() {
        let clock = MockClock::new();
        let deadline = Deadline::with_clock(&clock, Duration::from_millis(100));

        assert!(!deadline.is_expired());
        assert_eq!(deadline.remaining(), Duration::from_millis(100));

        clock.advance(60);
        assert!(!deadline.is_expired());
        assert_eq!(deadline.remaining(), Duration::from_millis(40));

        clock.advance(40);
        assert!(deadline.is_expired());
        assert_eq!(deadline.remaining(), Duration::ZERO);
    }

    #[test]
    fn zero_budget_is_expired_immediately() {
        let clock = MockClock::new();
        assert!(Deadline::with_clock(&clock, Duration::ZERO).is_expired());
    }

    #[test]
    fn huge_budget_does_not_overflow() {
        let deadline = Deadline::after(Duration::MAX);
        assert!(!deadline.is_expired());
    }
}
