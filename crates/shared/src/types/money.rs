//! Monetary value handling.
//!
//! All amounts are `rust_decimal::Decimal` stored as `NUMERIC(12,2)`. These
//! helpers pin the two-decimal-place scale at the edges: input validation,
//! rounding of derived values and the string form emitted on the wire.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of decimal places carried by every monetary amount.
pub const MONEY_SCALE: u32 = 2;

/// Largest amount a `NUMERIC(12,2)` column can hold.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

/// Rounds a value to the monetary scale (half away from zero).
#[must_use]
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// Returns true when the value has no more than two significant decimal places.
///
/// Trailing zeros do not count: `10.500` is accepted, `10.005` is not.
#[must_use]
pub fn has_money_scale(value: Decimal) -> bool {
    value.normalize().scale() <= MONEY_SCALE
}

/// Returns true when the value fits the storage column.
#[must_use]
pub fn fits_column(value: Decimal) -> bool {
    value.abs() <= MAX_AMOUNT
}

/// Formats an amount with exactly two decimal places, e.g. `400.00`.
#[must_use]
pub fn format_money(value: Decimal) -> String {
    round_money(value).to_string()
}

/// Serde helpers emitting amounts as two-decimal strings.
///
/// Use with `#[serde(serialize_with = "money::serialize")]`.
pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&format_money(*value))
}
