//! # Item Requests Testing
//!
//! Testing utilities for the item request tracker.
//!
//! This crate provides:
//! - Deterministic clocks
//! - In-memory and always-failing [`RequestStore`](item_requests_core::RequestStore) implementations
//! - Request body builders
//! - proptest strategies for valid and invalid input
//!
//! ## Example
//!
//! ```
//! use item_requests_core::{RequestService, ServiceConfig};
//! use item_requests_testing::{test_clock, InMemoryRequestStore};
//! use std::sync::Arc;
//!
//! let store = InMemoryRequestStore::new();
//! let _service = RequestService::new(
//!     Arc::new(store.clone()),
//!     Arc::new(test_clock()),
//!     ServiceConfig::default(),
//! );
//! assert!(store.is_empty());
//! ```

pub mod store_mocks;

/// Mock implementations of environment traits.
pub mod mocks {
    use chrono::{DateTime, Duration, Utc};
    use item_requests_core::environment::Clock;
    use std::sync::Mutex;

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use item_requests_testing::mocks::FixedClock;
    /// use item_requests_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that advances by a fixed step on every reading.
    ///
    /// Gives each created request a distinct, increasing timestamp.
    ///
    /// # Example
    ///
    /// ```
    /// use item_requests_testing::mocks::SteppingClock;
    /// use item_requests_core::environment::Clock;
    /// use chrono::{Duration, Utc};
    ///
    /// let start = Utc::now();
    /// let clock = SteppingClock::new(start, Duration::seconds(1));
    /// assert_eq!(clock.now(), start);
    /// assert_eq!(clock.now(), start + Duration::seconds(1));
    /// ```
    #[derive(Debug)]
    pub struct SteppingClock {
        next: Mutex<DateTime<Utc>>,
        step: Duration,
    }

    impl SteppingClock {
        /// Create a clock whose first reading is `start`.
        #[must_use]
        pub const fn new(start: DateTime<Utc>, step: Duration) -> Self {
            Self {
                next: Mutex::new(start),
                step,
            }
        }
    }

    impl Clock for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            let mut next = self
                .next
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner);
            let now = *next;
            *next = now + self.step;
            now
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Request body builders.
pub mod helpers {
    use item_requests_core::{RequestId, RequestStatus};
    use serde_json::{json, Value};

    /// Body for the create operation.
    #[must_use]
    pub fn create_body(requestor_name: &str, item_requested: &str) -> Value {
        json!({ "requestorName": requestor_name, "itemRequested": item_requested })
    }

    /// Body for the edit-status operation.
    #[must_use]
    pub fn edit_body(id: RequestId, status: RequestStatus) -> Value {
        json!({ "id": id.to_string(), "status": status.as_str() })
    }

    /// Install a `tracing` subscriber that writes through the test harness.
    ///
    /// Safe to call from every test; only the first call installs.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "item_requests=debug".into()),
            )
            .try_init();
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use item_requests_core::RequestStatus;
    use proptest::prelude::*;

    /// Any request status.
    pub fn any_status() -> impl Strategy<Value = RequestStatus> {
        prop::sample::select(RequestStatus::ALL.to_vec())
    }

    /// A requestor name that passes validation.
    pub fn valid_requestor_name() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z .'-]{1,28}[A-Za-z]"
    }

    /// An item description that passes validation.
    pub fn valid_item_requested() -> impl Strategy<Value = String> {
        "[A-Za-z0-9][A-Za-z0-9 ,.-]{0,98}[A-Za-z0-9]"
    }

    /// A requestor name that fails the length check.
    pub fn out_of_bounds_requestor_name() -> impl Strategy<Value = String> {
        prop_oneof!["[A-Za-z]{1,2}", "[A-Za-z]{31,60}"]
    }
}

// Re-export commonly used items
pub use mocks::{test_clock, FixedClock, SteppingClock};
pub use store_mocks::{FailingRequestStore, InMemoryRequestStore};

#[cfg(test)]
mod tests {
    use super::*;
    use item_requests_core::environment::Clock;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
    }

    #[test]
    fn test_stepping_clock_increases() {
        let clock = SteppingClock::new(test_clock().now(), chrono::Duration::milliseconds(5));
        let first = clock.now();
        let second = clock.now();
        assert!(second > first);
    }
}
