use std::sync::{Arc, Mutex};

use chrono::{Months, NaiveDate};
use tracing::info;

use super::domain::{
    approved_limit_from_income, CustomerId, CustomerRegistration, CustomerSnapshot,
    LoanApplication, LoanId, LoanRecord,
};
use super::eligibility::{decide, LoanDecision};
use super::repository::{
    CustomerRepository, LoanDetailView, LoanListItemView, LoanRepository, NewCustomer, NewLoan,
    RepositoryError,
};

/// Service composing the customer and loan repositories with the decision
/// engine. Registration, eligibility checks, origination, and the loan views
/// all go through here.
pub struct LoanService<C, L> {
    customers: Arc<C>,
    loans: Arc<L>,
    // Decide-then-commit must not interleave for two applications reading the
    // same exposure snapshot; one lock serializes the origination path.
    origination_lock: Mutex<()>,
}

/// Decision plus the persisted record when the application was approved.
#[derive(Debug, Clone)]
pub struct LoanOutcome {
    pub decision: LoanDecision,
    pub loan: Option<LoanRecord>,
}

impl<C, L> LoanService<C, L>
where
    C: CustomerRepository + 'static,
    L: LoanRepository + 'static,
{
    pub fn new(customers: Arc<C>, loans: Arc<L>) -> Self {
        Self {
            customers,
            loans,
            origination_lock: Mutex::new(()),
        }
    }

    /// Register a new customer, deriving the approved exposure limit from
    /// income. Shape validation belongs to the transport layer.
    pub fn register_customer(
        &self,
        registration: CustomerRegistration,
    ) -> Result<CustomerSnapshot, LoanServiceError> {
        let approved_limit = approved_limit_from_income(registration.monthly_income);
        let snapshot = self.customers.create(NewCustomer {
            first_name: registration.first_name,
            last_name: registration.last_name,
            phone_number: registration.phone_number,
            age: Some(registration.age),
            monthly_income: registration.monthly_income,
            approved_limit,
            current_debt: 0,
        })?;
        info!(customer = %snapshot.id, approved_limit, "customer registered");
        Ok(snapshot)
    }

    /// Run the eligibility decision for `application` as of `today`.
    ///
    /// An unknown customer is a normal non-approved decision, not an error.
    pub fn check_eligibility(
        &self,
        application: &LoanApplication,
        today: NaiveDate,
    ) -> Result<LoanDecision, LoanServiceError> {
        let decision = self.evaluate(application, today)?;
        info!(
            customer = %application.customer_id,
            score = %decision.credit_score,
            approved = decision.approved,
            "eligibility decided"
        );
        Ok(decision)
    }

    /// Decide and, when approved, persist the new loan at the corrected rate
    /// with the computed installment and a schedule starting today.
    pub fn create_loan(
        &self,
        application: &LoanApplication,
        today: NaiveDate,
    ) -> Result<LoanOutcome, LoanServiceError> {
        let _guard = self
            .origination_lock
            .lock()
            .map_err(|_| RepositoryError::Unavailable("origination lock poisoned".to_string()))?;

        let decision = self.evaluate(application, today)?;
        if !decision.approved {
            return Ok(LoanOutcome {
                decision,
                loan: None,
            });
        }

        let record = self.loans.create(NewLoan {
            customer_id: application.customer_id,
            principal: application.amount,
            tenure_months: application.tenure_months,
            annual_rate: decision.corrected_rate,
            monthly_installment: decision.monthly_installment,
            emis_paid_on_time: 0,
            emis_paid: 0,
            start_date: Some(today),
            end_date: today.checked_add_months(Months::new(application.tenure_months)),
        })?;
        info!(loan = %record.id, customer = %record.customer_id, "loan created");

        Ok(LoanOutcome {
            decision,
            loan: Some(record),
        })
    }

    /// Loan detail joined with its owning customer, or `None` when unknown.
    pub fn loan_detail(&self, loan_id: LoanId) -> Result<Option<LoanDetailView>, LoanServiceError> {
        let Some(record) = self.loans.fetch(loan_id)? else {
            return Ok(None);
        };
        let Some(customer) = self.customers.fetch(record.customer_id)? else {
            return Ok(None);
        };
        Ok(Some(LoanDetailView::from_parts(&record, &customer)))
    }

    /// Every loan for `customer_id`, newest first; `None` when the customer
    /// itself is unknown (distinct from an empty book).
    pub fn loans_for_customer(
        &self,
        customer_id: CustomerId,
    ) -> Result<Option<Vec<LoanListItemView>>, LoanServiceError> {
        if self.customers.fetch(customer_id)?.is_none() {
            return Ok(None);
        }
        let mut records = self.loans.for_customer(customer_id)?;
        records.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(Some(
            records.iter().map(LoanListItemView::from_record).collect(),
        ))
    }

    fn evaluate(
        &self,
        application: &LoanApplication,
        today: NaiveDate,
    ) -> Result<LoanDecision, LoanServiceError> {
        let Some(customer) = self.customers.fetch(application.customer_id)? else {
            return Ok(LoanDecision::customer_not_found(application.annual_rate));
        };
        let loans = self.loans.for_customer(application.customer_id)?;
        Ok(decide(&customer, &loans, application, today))
    }
}

/// Error raised by the loan service.
#[derive(Debug, thiserror::Error)]
pub enum LoanServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
