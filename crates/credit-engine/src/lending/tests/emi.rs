use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::lending::emi::monthly_installment;

#[test]
fn reference_value_at_twelve_percent() {
    let emi = monthly_installment(dec!(100_000), dec!(12), 12);
    assert_eq!(emi, dec!(8884.88));
}

#[test]
fn zero_or_negative_tenure_yields_zero() {
    assert_eq!(monthly_installment(dec!(100_000), dec!(10), 0), Decimal::ZERO);
    assert_eq!(
        monthly_installment(dec!(100_000), dec!(10), -1),
        Decimal::ZERO
    );
}

#[test]
fn zero_rate_is_straight_line() {
    assert_eq!(monthly_installment(dec!(120_000), dec!(0), 12), dec!(10_000));
    assert_eq!(
        monthly_installment(dec!(100_000), dec!(-1), 12),
        dec!(8333.33)
    );
}

#[test]
fn result_carries_two_fractional_digits() {
    let emi = monthly_installment(dec!(50_000), dec!(15), 6);
    assert_eq!(emi.round_dp(2), emi);
    assert!(emi > Decimal::ZERO);
}

#[test]
fn strictly_increasing_in_rate() {
    let low = monthly_installment(dec!(100_000), dec!(8), 12);
    let mid = monthly_installment(dec!(100_000), dec!(10), 12);
    let high = monthly_installment(dec!(100_000), dec!(12), 12);
    assert!(low < mid);
    assert!(mid < high);
}

#[test]
fn identical_inputs_yield_identical_output() {
    let first = monthly_installment(dec!(73_500.50), dec!(13.25), 18);
    let second = monthly_installment(dec!(73_500.50), dec!(13.25), 18);
    assert_eq!(first, second);
}
