//! L4: Full lifecycle.
//!
//! An artwork MUST move through all eight states in order, each step
//! confirmed by the contract. Once `Delivered`, no transition is legal.

use artshop_core::{LifecycleError, LifecycleState};

use crate::fixtures::Harness;
use crate::traits::TestableContract;

/// L4: Created through Delivered, with the roles recorded by the contract.
pub async fn test_l04_full_lifecycle<C: TestableContract>(backend: &C) -> Result<(), String> {
    let harness = Harness::new(backend);

    let delivered = harness.advance_to(LifecycleState::Delivered).await?;
    if delivered.adopter != harness.adopter {
        return Err(format!(
            "L4: adopter {} not recorded (got {})",
            harness.adopter, delivered.adopter
        ));
    }

    let fetched = harness
        .client
        .fetch_details(delivered.id)
        .await
        .map_err(|e| format!("L4: fetch_details failed: {}", e))?;
    if fetched.state != LifecycleState::Delivered {
        return Err(format!("L4: contract reports state {}", fetched.state));
    }
    if fetched.owner != harness.adopter {
        return Err(format!("L4: owner after adoption is {}", fetched.owner));
    }
    if fetched.shipper != harness.shipper {
        return Err(format!("L4: shipper is {}", fetched.shipper));
    }
    if fetched.origin_artist != harness.artist {
        return Err(format!("L4: origin artist is {}", fetched.origin_artist));
    }

    harness.act_as(harness.shipper);
    for (label, result) in [
        ("deliver", harness.client.deliver(&delivered).await),
        ("ship", harness.client.ship(&delivered).await),
        ("frame", harness.client.frame(&delivered).await),
    ] {
        if !matches!(result, Err(LifecycleError::PreconditionNotMet { .. })) {
            return Err(format!(
                "L4: {} on a delivered artwork was not refused: {:?}",
                label, result
            ));
        }
    }
    Ok(())
}
