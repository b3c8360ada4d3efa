//! Compound-interest monthly installment (EMI).
//!
//! EMI = P * r * (1+r)^n / ((1+r)^n - 1), with r the monthly rate
//! (annual percent / 1200) and n the tenure in months.

use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use rust_decimal_macros::dec;

/// Periodic installment for a loan of `principal` at `annual_rate_percent`
/// over `tenure_months`.
///
/// A non-positive tenure yields zero (no schedule exists); a non-positive
/// rate falls back to straight-line repayment. The result is rounded
/// half-up to 2 fractional digits.
pub fn monthly_installment(
    principal: Decimal,
    annual_rate_percent: Decimal,
    tenure_months: i64,
) -> Decimal {
    if tenure_months <= 0 {
        return Decimal::ZERO;
    }
    if annual_rate_percent <= Decimal::ZERO {
        return round_currency(principal / Decimal::from(tenure_months));
    }

    let monthly_rate = annual_rate_percent / dec!(1200);
    let factor = (Decimal::ONE + monthly_rate).powi(tenure_months);
    round_currency(principal * monthly_rate * factor / (factor - Decimal::ONE))
}

/// Half-up rounding at 2 fractional digits, the rule used for every currency
/// figure the engine emits.
pub(crate) fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
