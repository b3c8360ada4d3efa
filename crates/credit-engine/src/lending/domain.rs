use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier wrapper for registered customers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CustomerId(pub u64);

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier wrapper for loans, unique across the whole book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LoanId(pub u64);

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Read-only customer state as the decision core sees it. Established by
/// registration or ingestion; never mutated by the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSnapshot {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub age: Option<u8>,
    pub monthly_income: u64,
    pub approved_limit: u64,
    pub current_debt: u64,
}

impl CustomerSnapshot {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// A historical or currently outstanding loan.
///
/// `monthly_installment` is the figure computed at origination and stored
/// thereafter; it is never recomputed from rate and tenure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub id: LoanId,
    pub customer_id: CustomerId,
    pub principal: Decimal,
    pub tenure_months: u32,
    pub annual_rate: Decimal,
    pub monthly_installment: Decimal,
    pub emis_paid_on_time: u32,
    pub emis_paid: u32,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl LoanRecord {
    /// A loan is active while scheduled installments remain unpaid.
    pub fn is_active(&self) -> bool {
        self.emis_paid < self.tenure_months
    }

    pub fn repayments_left(&self) -> u32 {
        self.tenure_months.saturating_sub(self.emis_paid)
    }
}

/// A request for a new loan, as received from the transport layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub customer_id: CustomerId,
    pub amount: Decimal,
    pub annual_rate: Decimal,
    pub tenure_months: u32,
}

/// Input captured when a new customer registers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerRegistration {
    pub first_name: String,
    pub last_name: String,
    pub age: u8,
    pub phone_number: String,
    pub monthly_income: u64,
}

/// Approved exposure limit: 36 x monthly income, rounded half-up to the
/// nearest multiple of 100,000.
pub fn approved_limit_from_income(monthly_income: u64) -> u64 {
    let lakhs = Decimal::from(monthly_income) * dec!(36) / dec!(100_000);
    let rounded = lakhs.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    (rounded * dec!(100_000)).to_u64().unwrap_or(0)
}
