use crate::infra::{InMemoryCustomerRepository, InMemoryLoanRepository};
use clap::Args;
use credit_engine::config::AppConfig;
use credit_engine::error::AppError;
use credit_engine::lending::{import_customers_from_path, import_loans_from_path, IngestSummary};
use credit_engine::telemetry;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct IngestArgs {
    /// CSV export of the customer workbook (defaults to CUSTOMER_DATA_PATH)
    #[arg(long)]
    customers: Option<PathBuf>,
    /// CSV export of the loan workbook (defaults to LOAN_DATA_PATH)
    #[arg(long)]
    loans: Option<PathBuf>,
}

/// Run both imports against a fresh store and report the counts. The serve
/// command repeats the same imports at startup; this entry point exists to
/// validate exports before pointing the server at them.
pub(crate) fn run_ingest(mut args: IngestArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let customer_path = args
        .customers
        .take()
        .or_else(|| config.seed.customer_data_path.clone())
        .ok_or_else(|| missing_export("customer", "--customers", "CUSTOMER_DATA_PATH"))?;
    let loan_path = args
        .loans
        .take()
        .or_else(|| config.seed.loan_data_path.clone())
        .ok_or_else(|| missing_export("loan", "--loans", "LOAN_DATA_PATH"))?;

    let customers = InMemoryCustomerRepository::default();
    let loans = InMemoryLoanRepository::default();

    let summary = import_customers_from_path(&customer_path, &customers)?;
    report("Customers", &summary);
    let summary = import_loans_from_path(&loan_path, &customers, &loans)?;
    report("Loans", &summary);

    Ok(())
}

fn report(label: &str, summary: &IngestSummary) {
    println!(
        "{label}: {} created, {} updated, {} skipped",
        summary.created, summary.updated, summary.skipped
    );
}

fn missing_export(kind: &str, flag: &str, var: &str) -> AppError {
    AppError::Io(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        format!("no {kind} export given; pass {flag} or set {var}"),
    ))
}
