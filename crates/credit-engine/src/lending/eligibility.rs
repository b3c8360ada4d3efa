//! Loan eligibility decisions.
//!
//! Checks run in a fixed order and the first failure wins: affordability
//! (current EMIs plus the probed new EMI against half the monthly income),
//! the low-score gate, then the score-slab rate floor. A passing application
//! gets its installment recomputed at the corrected rate.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::domain::{CustomerSnapshot, LoanApplication, LoanRecord};
use super::emi::monthly_installment;
use super::scoring::credit_score;

// Slab minimum rates by credit score band (lowest rate that can be approved).
const SLAB_MIN_RATE_10_30: Decimal = dec!(16);
const SLAB_MIN_RATE_30_50: Decimal = dec!(12);
const LOW_SCORE_CUTOFF: Decimal = dec!(10);
const EMI_INCOME_CAP: Decimal = dec!(0.5);

/// Why an application was not approved. Every rejection is a normal outcome
/// with an explanatory message, never a fault.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RejectionReason {
    CustomerNotFound,
    EmiCapExceeded,
    ScoreTooLow,
    RateBelowSlabFloor { floor: Decimal },
}

impl RejectionReason {
    pub fn summary(&self) -> String {
        match self {
            RejectionReason::CustomerNotFound => "Customer not found".to_string(),
            RejectionReason::EmiCapExceeded => {
                "Sum of current EMIs and new EMI exceeds 50% of monthly salary".to_string()
            }
            RejectionReason::ScoreTooLow => "Credit score too low (<=10)".to_string(),
            RejectionReason::RateBelowSlabFloor { floor } => {
                format!("Interest rate must be > {floor}% for this credit score")
            }
        }
    }
}

/// Outcome of an eligibility check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanDecision {
    pub approved: bool,
    /// Requested rate lifted to the slab minimum where applicable.
    pub corrected_rate: Decimal,
    pub monthly_installment: Decimal,
    pub credit_score: Decimal,
    pub rejection: Option<RejectionReason>,
}

impl LoanDecision {
    pub fn message(&self) -> String {
        match &self.rejection {
            Some(reason) => reason.summary(),
            None => "Loan approved".to_string(),
        }
    }

    /// Non-approved decision for an unknown customer; the snapshot resolution
    /// step lives in the service layer, which calls this.
    pub fn customer_not_found(requested_rate: Decimal) -> Self {
        Self {
            approved: false,
            corrected_rate: requested_rate,
            monthly_installment: Decimal::ZERO,
            credit_score: Decimal::ZERO,
            rejection: Some(RejectionReason::CustomerNotFound),
        }
    }

    fn rejected(
        reason: RejectionReason,
        requested_rate: Decimal,
        installment: Decimal,
        score: Decimal,
    ) -> Self {
        Self {
            approved: false,
            corrected_rate: requested_rate,
            monthly_installment: installment,
            credit_score: score,
            rejection: Some(reason),
        }
    }
}

/// Decide `application` against the customer's snapshot and full loan
/// history. Pure: all state is caller-supplied, including the reference date.
pub fn decide(
    customer: &CustomerSnapshot,
    loans: &[LoanRecord],
    application: &LoanApplication,
    today: NaiveDate,
) -> LoanDecision {
    let score = credit_score(customer, loans, today);
    let tenure = i64::from(application.tenure_months);
    let new_emi = monthly_installment(application.amount, application.annual_rate, tenure);

    let current_emis: Decimal = loans
        .iter()
        .filter(|loan| loan.is_active())
        .map(|loan| loan.monthly_installment)
        .sum();
    let cap = EMI_INCOME_CAP * Decimal::from(customer.monthly_income);
    if current_emis + new_emi > cap {
        return LoanDecision::rejected(
            RejectionReason::EmiCapExceeded,
            application.annual_rate,
            new_emi,
            score,
        );
    }

    if score <= LOW_SCORE_CUTOFF {
        return LoanDecision::rejected(
            RejectionReason::ScoreTooLow,
            application.annual_rate,
            new_emi,
            score,
        );
    }

    let corrected_rate = match slab_floor(score) {
        Some(floor) => {
            if application.annual_rate <= floor {
                return LoanDecision::rejected(
                    RejectionReason::RateBelowSlabFloor { floor },
                    application.annual_rate,
                    new_emi,
                    score,
                );
            }
            application.annual_rate.max(floor)
        }
        None => application.annual_rate,
    };

    LoanDecision {
        approved: true,
        corrected_rate,
        monthly_installment: monthly_installment(application.amount, corrected_rate, tenure),
        credit_score: score,
        rejection: None,
    }
}

/// Minimum acceptable rate for the slab the score falls in. Only consulted
/// once the low-score gate has passed, so the 10-30 band is `<= 30` here.
fn slab_floor(score: Decimal) -> Option<Decimal> {
    if score <= dec!(30) {
        Some(SLAB_MIN_RATE_10_30)
    } else if score <= dec!(50) {
        Some(SLAB_MIN_RATE_30_50)
    } else {
        None
    }
}
