use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::domain::{CustomerId, CustomerSnapshot, LoanId, LoanRecord};

/// Whether an ingestion upsert created a fresh record or replaced one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Identifier-less customer payload; the repository assigns the id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub age: Option<u8>,
    pub monthly_income: u64,
    pub approved_limit: u64,
    pub current_debt: u64,
}

/// Identifier-less loan payload; the repository assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLoan {
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

/// Customer storage abstraction so the service module can be exercised in
/// isolation. Upserts carry explicit identifiers and exist for ingestion.
pub trait CustomerRepository: Send + Sync {
    fn create(&self, customer: NewCustomer) -> Result<CustomerSnapshot, RepositoryError>;
    fn upsert(&self, snapshot: CustomerSnapshot) -> Result<UpsertOutcome, RepositoryError>;
    fn fetch(&self, id: CustomerId) -> Result<Option<CustomerSnapshot>, RepositoryError>;
}

/// Loan storage abstraction.
pub trait LoanRepository: Send + Sync {
    fn create(&self, loan: NewLoan) -> Result<LoanRecord, RepositoryError>;
    fn upsert(&self, record: LoanRecord) -> Result<UpsertOutcome, RepositoryError>;
    fn fetch(&self, id: LoanId) -> Result<Option<LoanRecord>, RepositoryError>;
    fn for_customer(&self, customer_id: CustomerId) -> Result<Vec<LoanRecord>, RepositoryError>;
}

/// Sanitized list entry for a customer's loan book.
#[derive(Debug, Clone, Serialize)]
pub struct LoanListItemView {
    pub loan_id: LoanId,
    pub loan_amount: Decimal,
    pub interest_rate: Decimal,
    pub monthly_installment: Decimal,
    pub repayments_left: u32,
}

impl LoanListItemView {
    pub fn from_record(record: &LoanRecord) -> Self {
        Self {
            loan_id: record.id,
            loan_amount: record.principal,
            interest_rate: record.annual_rate,
            monthly_installment: record.monthly_installment,
            repayments_left: record.repayments_left(),
        }
    }
}

/// Loan detail joined with its owning customer.
#[derive(Debug, Clone, Serialize)]
pub struct LoanDetailView {
    pub loan_id: LoanId,
    pub customer: CustomerRefView,
    pub loan_amount: Decimal,
    pub interest_rate: Decimal,
    pub monthly_installment: Decimal,
    pub tenure: u32,
}

/// The customer fields exposed on a loan detail.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerRefView {
    pub id: CustomerId,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub age: Option<u8>,
}

impl LoanDetailView {
    pub fn from_parts(record: &LoanRecord, customer: &CustomerSnapshot) -> Self {
        Self {
            loan_id: record.id,
            customer: CustomerRefView {
                id: customer.id,
                first_name: customer.first_name.clone(),
                last_name: customer.last_name.clone(),
                phone_number: customer.phone_number.clone(),
                age: customer.age,
            },
            loan_amount: record.principal,
            interest_rate: record.annual_rate,
            monthly_installment: record.monthly_installment,
            tenure: record.tenure_months,
        }
    }
}
