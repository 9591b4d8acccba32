//! # Microshop Testing
//!
//! Test doubles for the Microshop services.
//!
//! This crate provides:
//! - [`FixedClock`]: deterministic time
//! - [`InMemoryOrderRepository`] / [`InMemoryUserRepository`]: `BTreeMap`-backed
//!   stores with failure injection
//! - [`RecordingEventBus`]: captures publishes and replays them to subscribers
//!
//! ## Example
//!
//! ```ignore
//! use microshop_testing::{InMemoryOrderRepository, RecordingEventBus, test_clock};
//! use std::sync::Arc;
//!
//! #[tokio::test]
//! async fn creates_order() {
//!     let orders = Arc::new(InMemoryOrderRepository::new(Arc::new(test_clock())));
//!     let bus = Arc::new(RecordingEventBus::new());
//!     let service = OrderService::new(orders.clone(), OrderPublisher::new(bus.clone(), "orders.ex"));
//!     let app = order_service::router(Arc::new(service));
//!     // drive `app` with tower::ServiceExt::oneshot ...
//!     assert_eq!(bus.wait_for_published(1, Duration::from_secs(1)).await.len(), 1);
//! }
//! ```

use chrono::{DateTime, Utc};
use microshop_core::environment::Clock;

pub mod event_bus;
pub mod repositories;

/// Mock implementations of environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use microshop_testing::mocks::FixedClock;
    /// use microshop_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
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

// Re-export commonly used items
pub use event_bus::{PublishedEvent, RecordingEventBus};
pub use mocks::{FixedClock, test_clock};
pub use repositories::{InMemoryOrderRepository, InMemoryUserRepository};
