//! L7: Rejection passthrough.
//!
//! When the contract refuses a call (here: a non-artist framing), the
//! client MUST surface `ExternalCallRejected` with the contract's message
//! and the session MUST keep the last confirmed record.

use artshop_core::{LifecycleError, LifecycleState, Request};

use crate::fixtures::Harness;
use crate::traits::TestableContract;

/// L7: A wrong-actor call is rejected by the contract, not the client.
pub async fn test_l07_rejection_passthrough<C: TestableContract>(
    backend: &C,
) -> Result<(), String> {
    let harness = Harness::new(backend);
    let created = harness.advance_to(LifecycleState::Created).await?;

    let mut session = harness.session();
    session
        .run(Request::FetchDetails { id: created.id })
        .await
        .map_err(|e| format!("L7: fetch failed: {}", e))?;
    let before = session.record().clone();

    harness.act_as(harness.adopter);
    let calls = harness.contract.calls();
    match session.run(Request::Frame).await {
        Err(LifecycleError::ExternalCallRejected { message, .. }) if !message.is_empty() => {}
        other => {
            return Err(format!(
                "L7: expected ExternalCallRejected, got {:?}",
                other.map(|r| r.state)
            ))
        }
    }
    if harness.contract.calls() == calls {
        return Err("L7: the rejected call never reached the contract".into());
    }
    if session.record() != &before {
        return Err("L7: record changed after a rejected call".into());
    }
    if !session.status().is_error() {
        return Err("L7: status does not show the rejection".into());
    }

    harness.act_as(harness.artist);
    let framed = session
        .run(Request::Frame)
        .await
        .map_err(|e| format!("L7: frame by the artist failed: {}", e))?;
    if framed.state != LifecycleState::Framed {
        return Err(format!("L7: artist frame left state {}", framed.state));
    }
    if session.status().message() != LifecycleState::Framed.label() {
        return Err(format!("L7: status shows '{}'", session.status().message()));
    }
    Ok(())
}
