//! L1: Precondition guard.
//!
//! A request whose precondition does not hold against the cached record
//! MUST fail with `PreconditionNotMet` without any contract call.

use artshop_core::{
    ArtworkRecord, LifecycleError, LifecycleState, Precondition, PreconditionReason, Request,
    RequestArgs, OPERATIONS,
};
use rust_decimal::Decimal;

use crate::fixtures::{self, Harness};
use crate::traits::TestableContract;

fn expect_precondition(
    label: &str,
    result: Result<ArtworkRecord, LifecycleError>,
) -> Result<PreconditionReason, String> {
    match result {
        Err(LifecycleError::PreconditionNotMet { reason, .. }) => Ok(reason),
        Err(other) => Err(format!("L1: {}: expected PreconditionNotMet, got {}", label, other)),
        Ok(record) => Err(format!(
            "L1: {}: expected PreconditionNotMet, got record in state {}",
            label, record.state
        )),
    }
}

/// L1: Illegal requests are refused locally and never reach the contract.
pub async fn test_l01_precondition_guard<C: TestableContract>(backend: &C) -> Result<(), String> {
    let harness = Harness::new(backend);
    let empty = ArtworkRecord::empty();

    let reason = expect_precondition("frame on empty", harness.client.frame(&empty).await)?;
    if reason != PreconditionReason::NoArtworkSelected {
        return Err(format!("L1: frame on empty record gave reason '{}'", reason));
    }
    if harness.contract.calls() != 0 {
        return Err(format!(
            "L1: {} contract call(s) made for a refused request",
            harness.contract.calls()
        ));
    }

    let created = harness.advance_to(LifecycleState::Created).await?;
    let baseline = harness.contract.calls();

    // Every state-guarded transition, tried from a state it does not leave.
    for spec in OPERATIONS.iter() {
        let Precondition::State(required) = spec.precondition else {
            continue;
        };
        let before = harness.contract.calls();
        let on_empty = Request::from_code(spec.operation.request_code(), RequestArgs::default())
            .ok_or_else(|| format!("L1: no request for {}", spec.operation))?;
        let label = format!("{} on empty", spec.operation);
        let reason = expect_precondition(&label, harness.client.dispatch(&empty, on_empty).await)?;
        if reason != PreconditionReason::NoArtworkSelected || harness.contract.calls() != before {
            return Err(format!("L1: {} gave reason '{}'", label, reason));
        }

        let mut record = created.clone();
        if required == LifecycleState::Created {
            record.state = LifecycleState::Delivered;
        }
        let args = RequestArgs {
            id: record.id,
            price: fixtures::price(),
            ..RequestArgs::default()
        };
        let request = Request::from_code(spec.operation.request_code(), args)
            .ok_or_else(|| format!("L1: no request for {}", spec.operation))?;
        let label = format!("{} on {}", spec.operation, record.state);
        let before = harness.contract.calls();
        let reason = expect_precondition(&label, harness.client.dispatch(&record, request).await)?;
        match reason {
            PreconditionReason::WrongState {
                required: r,
                actual,
            } if r == required && actual == record.state => {}
            other => return Err(format!("L1: {} gave reason '{}'", label, other)),
        }
        if harness.contract.calls() != before {
            return Err(format!(
                "L1: {} made {} contract call(s)",
                label,
                harness.contract.calls() - before
            ));
        }
    }

    let reason = expect_precondition(
        "create on selected record",
        harness
            .client
            .create(&created, fixtures::sample_artwork())
            .await,
    )?;
    if !matches!(reason, PreconditionReason::AlreadyCreated { .. }) {
        return Err(format!("L1: create on selected record gave reason '{}'", reason));
    }

    let mut offered = created.clone();
    offered.state = LifecycleState::AdoptionOffered;
    offered.price = fixtures::price();
    let reason = expect_precondition(
        "adopt with short payment",
        harness.client.adopt(&offered, Some(Decimal::ONE)).await,
    )?;
    if !matches!(reason, PreconditionReason::PaymentMismatch { .. }) {
        return Err(format!("L1: short payment gave reason '{}'", reason));
    }

    if harness.contract.calls() != baseline {
        return Err(format!(
            "L1: refused requests made {} contract call(s)",
            harness.contract.calls() - baseline
        ));
    }
    Ok(())
}
