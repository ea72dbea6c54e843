//! The `lifecycle_conformance_tests!` macro.
//!
//! This macro generates eight `#[tokio::test]` functions, one per lifecycle
//! obligation L1 through L8, for any type that implements `TestableContract`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use artshop_conformance::lifecycle_conformance_tests;
//!
//! struct MyBackend { /* ... */ }
//!
//! impl MyBackend {
//!     fn new() -> Self { MyBackend {} }
//! }
//!
//! // Implement TestableContract for MyBackend ...
//!
//! lifecycle_conformance_tests!(MyBackend::new());
//! ```
//!
//! Each generated test function is named `conformance_lNN_<description>` and
//! can be run with `cargo test conformance_` to execute the full suite.

/// Generate conformance tests for a contract backend.
///
/// The `$backend_expr` expression is evaluated fresh for each test, so
/// each test gets an independent backend instance. Tests can be run in
/// any order.
#[macro_export]
macro_rules! lifecycle_conformance_tests {
    ($backend_expr:expr) => {
        #[tokio::test]
        async fn conformance_l01_precondition_guard() {
            let backend = $backend_expr;
            $crate::tests::l01_precondition_guard::test_l01_precondition_guard(&backend)
                .await
                .expect("L1: precondition guard conformance failed");
        }

        #[tokio::test]
        async fn conformance_l02_create_and_fetch() {
            let backend = $backend_expr;
            $crate::tests::l02_create_and_fetch::test_l02_create_and_fetch(&backend)
                .await
                .expect("L2: create and fetch conformance failed");
        }

        #[tokio::test]
        async fn conformance_l03_price_units() {
            let backend = $backend_expr;
            $crate::tests::l03_price_units::test_l03_price_units(&backend)
                .await
                .expect("L3: price units conformance failed");
        }

        #[tokio::test]
        async fn conformance_l04_full_lifecycle() {
            let backend = $backend_expr;
            $crate::tests::l04_full_lifecycle::test_l04_full_lifecycle(&backend)
                .await
                .expect("L4: full lifecycle conformance failed");
        }

        #[tokio::test]
        async fn conformance_l05_not_found() {
            let backend = $backend_expr;
            $crate::tests::l05_not_found::test_l05_not_found(&backend)
                .await
                .expect("L5: not found conformance failed");
        }

        #[tokio::test]
        async fn conformance_l06_single_flight() {
            let backend = $backend_expr;
            $crate::tests::l06_single_flight::test_l06_single_flight(&backend)
                .await
                .expect("L6: single flight conformance failed");
        }

        #[tokio::test]
        async fn conformance_l07_rejection_passthrough() {
            let backend = $backend_expr;
            $crate::tests::l07_rejection_passthrough::test_l07_rejection_passthrough(&backend)
                .await
                .expect("L7: rejection passthrough conformance failed");
        }

        #[tokio::test]
        async fn conformance_l08_event_log() {
            let backend = $backend_expr;
            $crate::tests::l08_event_log::test_l08_event_log(&backend)
                .await
                .expect("L8: event log conformance failed");
        }
    };
}
