//! Conversion between human token amounts and on-chain base units.

use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use thiserror::Error;

/// Number of decimal places between a whole token and its base unit.
pub const TOKEN_DECIMALS: u32 = 8;

/// Errors produced while rescaling an amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("Invalid amount '{0}'")]
    Invalid(String),

    #[error("Negative amount '{0}'")]
    Negative(String),

    #[error("Amount '{0}' does not fit into base units")]
    Overflow(String),
}

/// Rescale a human amount (e.g. `"1.5"`) to base units (`150000000`).
///
/// Digits beyond the eighth decimal place are truncated toward zero.
pub fn to_base_units(amount: &str) -> Result<i64, AmountError> {
    let trimmed = amount.trim();
    let value =
        Decimal::from_str(trimmed).map_err(|_| AmountError::Invalid(amount.to_string()))?;

    if value.is_sign_negative() && !value.is_zero() {
        return Err(AmountError::Negative(amount.to_string()));
    }

    let scale = Decimal::from(10u64.pow(TOKEN_DECIMALS));
    value
        .checked_mul(scale)
        .and_then(|scaled| scaled.trunc().to_i64())
        .ok_or_else(|| AmountError::Overflow(amount.to_string()))
}
