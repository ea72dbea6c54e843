//! Conversion between major units (the human-facing decimal amount) and the
//! integral minor units the contract works in.
//!
//! All arithmetic uses `rust_decimal::Decimal` on the major side and `u128`
//! on the minor side. A conversion either succeeds exactly or fails; nothing
//! is rounded.

use rust_decimal::Decimal;

/// Number of minor units in one major unit is `10^MINOR_UNIT_DECIMALS`.
pub const MINOR_UNIT_DECIMALS: u32 = 18;

/// An amount in minor units.
pub type MinorUnits = u128;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("amount must not be negative: {0}")]
    Negative(Decimal),

    #[error("amount {0} has more than {MINOR_UNIT_DECIMALS} fractional digits")]
    TooPrecise(Decimal),

    #[error("amount {0} is out of range")]
    OutOfRange(String),
}

/// Convert a major-unit amount to minor units.
pub fn to_minor(amount: Decimal) -> Result<MinorUnits, AmountError> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(AmountError::Negative(amount));
    }
    let normalized = amount.normalize();
    let scale = normalized.scale();
    if scale > MINOR_UNIT_DECIMALS {
        return Err(AmountError::TooPrecise(amount));
    }
    let mantissa = normalized.mantissa().unsigned_abs();
    10u128
        .checked_pow(MINOR_UNIT_DECIMALS - scale)
        .and_then(|factor| mantissa.checked_mul(factor))
        .ok_or_else(|| AmountError::OutOfRange(amount.to_string()))
}

/// Convert minor units back to a normalized major-unit amount.
pub fn from_minor(minor: MinorUnits) -> Result<Decimal, AmountError> {
    let signed = i128::try_from(minor).map_err(|_| AmountError::OutOfRange(minor.to_string()))?;
    Decimal::try_from_i128_with_scale(signed, MINOR_UNIT_DECIMALS)
        .map(|d| d.normalize())
        .map_err(|_| AmountError::OutOfRange(minor.to_string()))
}
