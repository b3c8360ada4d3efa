use credit_engine::lending::{
    CustomerId, CustomerRepository, CustomerSnapshot, LoanId, LoanRecord, LoanRepository,
    NewCustomer, NewLoan, RepositoryError, UpsertOutcome,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Mutex-guarded map standing in for the customer table. Created records get
/// the next id past anything already present, so registration keeps working
/// after a workbook import with explicit ids.
#[derive(Default)]
pub(crate) struct InMemoryCustomerRepository {
    records: Mutex<HashMap<CustomerId, CustomerSnapshot>>,
}

impl CustomerRepository for InMemoryCustomerRepository {
    fn create(&self, customer: NewCustomer) -> Result<CustomerSnapshot, RepositoryError> {
        let mut guard = self.records.lock().expect("customer mutex poisoned");
        let id = CustomerId(guard.keys().map(|key| key.0).max().unwrap_or(0) + 1);
        let snapshot = CustomerSnapshot {
            id,
            first_name: customer.first_name,
            last_name: customer.last_name,
            phone_number: customer.phone_number,
            age: customer.age,
            monthly_income: customer.monthly_income,
            approved_limit: customer.approved_limit,
            current_debt: customer.current_debt,
        };
        guard.insert(id, snapshot.clone());
        Ok(snapshot)
    }

    fn upsert(&self, snapshot: CustomerSnapshot) -> Result<UpsertOutcome, RepositoryError> {
        let mut guard = self.records.lock().expect("customer mutex poisoned");
        let outcome = if guard.contains_key(&snapshot.id) {
            UpsertOutcome::Updated
        } else {
            UpsertOutcome::Created
        };
        guard.insert(snapshot.id, snapshot);
        Ok(outcome)
    }

    fn fetch(&self, id: CustomerId) -> Result<Option<CustomerSnapshot>, RepositoryError> {
        let guard = self.records.lock().expect("customer mutex poisoned");
        Ok(guard.get(&id).cloned())
    }
}

#[derive(Default)]
pub(crate) struct InMemoryLoanRepository {
    records: Mutex<HashMap<LoanId, LoanRecord>>,
}

impl LoanRepository for InMemoryLoanRepository {
    fn create(&self, loan: NewLoan) -> Result<LoanRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("loan mutex poisoned");
        let id = LoanId(guard.keys().map(|key| key.0).max().unwrap_or(0) + 1);
        let record = LoanRecord {
            id,
            customer_id: loan.customer_id,
            principal: loan.principal,
            tenure_months: loan.tenure_months,
            annual_rate: loan.annual_rate,
            monthly_installment: loan.monthly_installment,
            emis_paid_on_time: loan.emis_paid_on_time,
            emis_paid: loan.emis_paid,
            start_date: loan.start_date,
            end_date: loan.end_date,
        };
        guard.insert(id, record.clone());
        Ok(record)
    }

    fn upsert(&self, record: LoanRecord) -> Result<UpsertOutcome, RepositoryError> {
        let mut guard = self.records.lock().expect("loan mutex poisoned");
        let outcome = if guard.contains_key(&record.id) {
            UpsertOutcome::Updated
        } else {
            UpsertOutcome::Created
        };
        guard.insert(record.id, record);
        Ok(outcome)
    }

    fn fetch(&self, id: LoanId) -> Result<Option<LoanRecord>, RepositoryError> {
        let guard = self.records.lock().expect("loan mutex poisoned");
        Ok(guard.get(&id).cloned())
    }

    fn for_customer(&self, customer_id: CustomerId) -> Result<Vec<LoanRecord>, RepositoryError> {
        let guard = self.records.lock().expect("loan mutex poisoned");
        Ok(guard
            .values()
            .filter(|record| record.customer_id == customer_id)
            .cloned()
            .collect())
    }
}
