//! Credit-worthiness score over a customer's loan history.
//!
//! The score is a weighted blend of four capped sub-scores, with an
//! over-exposure short-circuit: once the active principal exceeds the
//! customer's approved limit the score is 0 and nothing else is considered.
//! The reference date is an explicit parameter so the score is a
//! deterministic function of its inputs.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::domain::{CustomerSnapshot, LoanRecord};

const WEIGHT_ON_TIME: Decimal = dec!(0.40);
const WEIGHT_LOAN_COUNT: Decimal = dec!(0.20);
const WEIGHT_CURRENT_YEAR: Decimal = dec!(0.20);
const WEIGHT_VOLUME: Decimal = dec!(0.20);
const MAX_SCORE: Decimal = dec!(100);

/// Factors permitted to contribute to the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreFactor {
    OnTimeRepayment,
    LoanCount,
    CurrentYearActivity,
    ApprovedVolume,
}

/// Discrete contribution to a score, allowing transparent audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreComponent {
    pub factor: ScoreFactor,
    /// Sub-score in [0, 100] before weighting.
    pub value: Decimal,
    pub weight: Decimal,
    pub notes: String,
}

/// Composite score plus the trail it was assembled from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub total: Decimal,
    pub over_exposed: bool,
    pub components: Vec<ScoreComponent>,
}

/// Credit score in [0, 100] for `customer` given its full loan history.
pub fn credit_score(customer: &CustomerSnapshot, loans: &[LoanRecord], today: NaiveDate) -> Decimal {
    score_history(customer, loans, today).total
}

/// Full scoring pass, keeping the per-factor breakdown.
pub fn score_history(
    customer: &CustomerSnapshot,
    loans: &[LoanRecord],
    today: NaiveDate,
) -> ScoreBreakdown {
    let active_principal: Decimal = loans
        .iter()
        .filter(|loan| loan.is_active())
        .map(|loan| loan.principal)
        .sum();
    if active_principal > Decimal::from(customer.approved_limit) {
        return ScoreBreakdown {
            total: Decimal::ZERO,
            over_exposed: true,
            components: Vec::new(),
        };
    }

    let mut components = Vec::with_capacity(4);

    let scheduled: u64 = loans.iter().map(|loan| u64::from(loan.tenure_months)).sum();
    let on_schedule: u64 = loans
        .iter()
        .map(|loan| u64::from(loan.emis_paid_on_time))
        .sum();
    // A customer with no scheduled installments gets the benefit of the doubt.
    let on_time_value = if scheduled == 0 {
        MAX_SCORE
    } else {
        (Decimal::from(on_schedule) * MAX_SCORE / Decimal::from(scheduled)).min(MAX_SCORE)
    };
    components.push(ScoreComponent {
        factor: ScoreFactor::OnTimeRepayment,
        value: on_time_value,
        weight: WEIGHT_ON_TIME,
        notes: format!("{on_schedule}/{scheduled} installments paid on schedule"),
    });

    let loan_count = loans.len() as u64;
    let count_value = (Decimal::from(loan_count) * dec!(10)).min(MAX_SCORE);
    components.push(ScoreComponent {
        factor: ScoreFactor::LoanCount,
        value: count_value,
        weight: WEIGHT_LOAN_COUNT,
        notes: format!("{loan_count} loan(s) on record"),
    });

    let current_year = today.year();
    let current_year_count = loans
        .iter()
        .filter(|loan| {
            loan.start_date
                .is_some_and(|start| start.year() == current_year)
        })
        .count() as u64;
    let activity_value = (Decimal::from(current_year_count) * dec!(25)).min(MAX_SCORE);
    components.push(ScoreComponent {
        factor: ScoreFactor::CurrentYearActivity,
        value: activity_value,
        weight: WEIGHT_CURRENT_YEAR,
        notes: format!("{current_year_count} loan(s) started in {current_year}"),
    });

    let total_principal: Decimal = loans.iter().map(|loan| loan.principal).sum();
    let volume_value = (total_principal / dec!(100_000)).min(MAX_SCORE);
    components.push(ScoreComponent {
        factor: ScoreFactor::ApprovedVolume,
        value: volume_value,
        weight: WEIGHT_VOLUME,
        notes: format!("{total_principal} approved across all loans"),
    });

    let total: Decimal = components
        .iter()
        .map(|component| component.weight * component.value)
        .sum();

    ScoreBreakdown {
        total: total.clamp(Decimal::ZERO, MAX_SCORE),
        over_exposed: false,
        components,
    }
}
