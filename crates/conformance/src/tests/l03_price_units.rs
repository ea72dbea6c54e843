//! L3: Price units.
//!
//! Prices are entered in major units and stored by the contract in minor
//! units (10^18 per major unit). A listed price MUST read back unchanged.
//! Amounts finer than one minor unit MUST be refused before any call.

use artshop_core::{LifecycleError, LifecycleState, PreconditionReason};
use rust_decimal::Decimal;

use crate::fixtures::{self, Harness};
use crate::traits::TestableContract;

/// L3: 2.5 listed is 2.5 fetched; sub-minor amounts are refused.
pub async fn test_l03_price_units<C: TestableContract>(backend: &C) -> Result<(), String> {
    let harness = Harness::new(backend);

    let framed = harness.advance_to(LifecycleState::Framed).await?;
    let baseline = harness.contract.calls();
    match harness
        .client
        .offer_for_adoption(&framed, Decimal::new(1, 19))
        .await
    {
        Err(LifecycleError::PreconditionNotMet {
            reason: PreconditionReason::InvalidAmount(_),
            ..
        }) => {}
        other => return Err(format!("L3: sub-minor price was not refused: {:?}", other)),
    }
    if harness.contract.calls() != baseline {
        return Err("L3: refused price reached the contract".into());
    }

    let offered = harness.advance_to(LifecycleState::AdoptionOffered).await?;
    if offered.price != fixtures::price() {
        return Err(format!(
            "L3: listed price {} but record holds {}",
            fixtures::price(),
            offered.price
        ));
    }

    let fetched = harness
        .client
        .fetch_details(offered.id)
        .await
        .map_err(|e| format!("L3: fetch_details failed: {}", e))?;
    if fetched.price != fixtures::price() {
        return Err(format!(
            "L3: listed price {} but contract returned {}",
            fixtures::price(),
            fetched.price
        ));
    }
    Ok(())
}
