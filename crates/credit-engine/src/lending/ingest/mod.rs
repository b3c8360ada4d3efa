//! Bulk ingestion of customer and loan workbook exports (CSV).
//!
//! Rows are upserted by their workbook identifiers so re-running an import is
//! idempotent. Malformed or unresolvable rows are skipped with a warning;
//! a batch never aborts half-way through.

mod parser;

use std::io::Read;
use std::path::Path;

use tracing::{info, warn};

use super::domain::{CustomerId, CustomerSnapshot, LoanId, LoanRecord};
use super::repository::{CustomerRepository, LoanRepository, RepositoryError, UpsertOutcome};

#[derive(Debug)]
pub enum IngestError {
    Io(std::io::Error),
    Csv(csv::Error),
    Repository(RepositoryError),
}

impl std::fmt::Display for IngestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IngestError::Io(err) => write!(f, "failed to read workbook export: {}", err),
            IngestError::Csv(err) => write!(f, "invalid workbook CSV data: {}", err),
            IngestError::Repository(err) => {
                write!(f, "could not store ingested records: {}", err)
            }
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            IngestError::Io(err) => Some(err),
            IngestError::Csv(err) => Some(err),
            IngestError::Repository(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for IngestError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for IngestError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

impl From<RepositoryError> for IngestError {
    fn from(err: RepositoryError) -> Self {
        Self::Repository(err)
    }
}

/// Counts reported back from an import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
}

impl IngestSummary {
    fn record(&mut self, outcome: UpsertOutcome) {
        match outcome {
            UpsertOutcome::Created => self.created += 1,
            UpsertOutcome::Updated => self.updated += 1,
        }
    }
}

pub fn import_customers_from_path<P: AsRef<Path>, C: CustomerRepository>(
    path: P,
    customers: &C,
) -> Result<IngestSummary, IngestError> {
    let file = std::fs::File::open(path)?;
    import_customers(file, customers)
}

/// Upsert every customer row in the export, keyed by `customer_id`.
pub fn import_customers<R: Read, C: CustomerRepository>(
    reader: R,
    customers: &C,
) -> Result<IngestSummary, IngestError> {
    let mut summary = IngestSummary::default();

    for row in parser::parse_customer_rows(reader)? {
        let Some(parsed) = row.parsed() else {
            summary.skipped += 1;
            continue;
        };
        let outcome = customers.upsert(CustomerSnapshot {
            id: CustomerId(parsed.customer_id),
            first_name: parsed.first_name,
            last_name: parsed.last_name,
            phone_number: parsed.phone_number,
            age: None,
            monthly_income: parsed.monthly_salary,
            approved_limit: parsed.approved_limit,
            current_debt: parsed.current_debt,
        })?;
        summary.record(outcome);
    }

    info!(
        created = summary.created,
        updated = summary.updated,
        skipped = summary.skipped,
        "customer ingestion finished"
    );
    Ok(summary)
}

pub fn import_loans_from_path<P: AsRef<Path>, C: CustomerRepository, L: LoanRepository>(
    path: P,
    customers: &C,
    loans: &L,
) -> Result<IngestSummary, IngestError> {
    let file = std::fs::File::open(path)?;
    import_loans(file, customers, loans)
}

/// Upsert every loan row in the export, keyed by `loan_id`. Rows referencing
/// a customer that was never ingested are skipped.
pub fn import_loans<R: Read, C: CustomerRepository, L: LoanRepository>(
    reader: R,
    customers: &C,
    loans: &L,
) -> Result<IngestSummary, IngestError> {
    let mut summary = IngestSummary::default();

    for row in parser::parse_loan_rows(reader)? {
        let parsed = row.parsed();
        let customer_id = CustomerId(parsed.customer_id);
        if customers.fetch(customer_id)?.is_none() {
            warn!(customer = %customer_id, loan = parsed.loan_id, "customer not found for loan");
            summary.skipped += 1;
            continue;
        }

        let outcome = loans.upsert(LoanRecord {
            id: LoanId(parsed.loan_id),
            customer_id,
            principal: parsed.loan_amount,
            tenure_months: parsed.tenure,
            annual_rate: parsed.interest_rate,
            monthly_installment: parsed.monthly_repayment,
            emis_paid_on_time: parsed.emis_paid_on_time,
            emis_paid: parsed.emis_paid,
            start_date: parsed.start_date,
            end_date: parsed.end_date,
        })?;
        summary.record(outcome);
    }

    info!(
        created = summary.created,
        updated = summary.updated,
        skipped = summary.skipped,
        "loan ingestion finished"
    );
    Ok(summary)
}
