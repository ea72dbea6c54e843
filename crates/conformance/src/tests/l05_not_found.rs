//! L5: Not found.
//!
//! Fetching an id the contract does not know MUST fail with `NotFound`,
//! reset the session's record to empty and show "Artwork not found".

use artshop_core::{LifecycleError, LifecycleState, Request};

use crate::fixtures::Harness;
use crate::traits::TestableContract;

/// An id no backend under test will have assigned.
const MISSING_ID: u64 = 9_999_999;

/// L5: Missing ids reset the session.
pub async fn test_l05_not_found<C: TestableContract>(backend: &C) -> Result<(), String> {
    let harness = Harness::new(backend);
    let created = harness.advance_to(LifecycleState::Created).await?;

    let mut session = harness.session();
    session
        .run(Request::FetchDetails { id: created.id })
        .await
        .map_err(|e| format!("L5: fetch of existing artwork failed: {}", e))?;
    if session.record().id != created.id {
        return Err("L5: session did not select the fetched artwork".into());
    }

    match session.run(Request::FetchDetails { id: MISSING_ID }).await {
        Err(LifecycleError::NotFound { id }) if id == MISSING_ID => {}
        other => return Err(format!("L5: expected NotFound, got {:?}", other.map(|r| r.id))),
    }
    if !session.record().is_empty() {
        return Err("L5: record was not reset after NotFound".into());
    }
    if session.status().message() != "Artwork not found" {
        return Err(format!(
            "L5: status shows '{}'",
            session.status().message()
        ));
    }

    session
        .run(Request::FetchDetails { id: created.id })
        .await
        .map_err(|e| format!("L5: refetch failed: {}", e))?;
    session.reset();
    if !session.record().is_empty() || !session.status().message().is_empty() {
        return Err("L5: reset left the previous artwork selected".into());
    }

    match harness.client.fetch_details(0).await {
        Err(LifecycleError::NotFound { id: 0 }) => Ok(()),
        other => Err(format!("L5: id 0 gave {:?}", other.map(|r| r.id))),
    }
}
