//! Lifecycle conformance test suite (L1-L8).
//!
//! Provides a `TestableContract` trait and `lifecycle_conformance_tests!`
//! macro for validating any `ContractClient` backend against the
//! obligations the lifecycle client relies on: guarded dispatch, refresh
//! after confirmation, price units, not-found handling, single-flight
//! transitions, rejection passthrough and event ordering.

pub mod counting;
pub mod fixtures;
pub mod suite;
pub mod tests;
pub mod traits;

pub use counting::{CountingContract, SwitchableAccount};
pub use traits::*;
