//! One module per lifecycle obligation. Each exposes an async test function
//! generic over [`TestableContract`](crate::TestableContract) that returns
//! `Err` with a description on the first violated expectation.

pub mod l01_precondition_guard;
pub mod l03_price_units;
pub mod l04_full_lifecycle;
pub mod l05_not_found;
pub mod l07_rejection_passthrough;
