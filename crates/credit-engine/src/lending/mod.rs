//! Lending workflow: registration, credit scoring, eligibility decisions,
//! loan origination, and workbook ingestion.
//!
//! [`emi`], [`scoring`], and [`eligibility`] are the decision core: pure
//! functions over caller-supplied snapshots, no I/O and no clock reads.
//! [`service`] composes them with the [`repository`] traits; [`router`]
//! exposes the HTTP surface.

pub mod domain;
pub mod eligibility;
pub mod emi;
pub mod ingest;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    approved_limit_from_income, CustomerId, CustomerRegistration, CustomerSnapshot,
    LoanApplication, LoanId, LoanRecord,
};
pub use eligibility::{decide, LoanDecision, RejectionReason};
pub use emi::monthly_installment;
pub use ingest::{
    import_customers, import_customers_from_path, import_loans, import_loans_from_path,
    IngestError, IngestSummary,
};
pub use repository::{
    CustomerRefView, CustomerRepository, LoanDetailView, LoanListItemView, LoanRepository,
    NewCustomer, NewLoan, RepositoryError, UpsertOutcome,
};
pub use router::loan_router;
pub use scoring::{credit_score, score_history, ScoreBreakdown, ScoreComponent, ScoreFactor};
pub use service::{LoanOutcome, LoanService, LoanServiceError};
