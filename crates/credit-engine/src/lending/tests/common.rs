use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::lending::domain::{
    approved_limit_from_income, CustomerId, CustomerSnapshot, LoanApplication, LoanId, LoanRecord,
};
use crate::lending::repository::{
    CustomerRepository, LoanRepository, NewCustomer, NewLoan, RepositoryError, UpsertOutcome,
};
use crate::lending::service::LoanService;

/// Fixed reference date so current-year activity scoring is deterministic.
pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 15).expect("valid date")
}

pub(super) fn customer(id: u64, monthly_income: u64) -> CustomerSnapshot {
    CustomerSnapshot {
        id: CustomerId(id),
        first_name: "Asha".to_string(),
        last_name: "Rao".to_string(),
        phone_number: "9999999999".to_string(),
        age: Some(30),
        monthly_income,
        approved_limit: approved_limit_from_income(monthly_income),
        current_debt: 0,
    }
}

pub(super) struct LoanFixture {
    pub(super) id: u64,
    pub(super) principal: Decimal,
    pub(super) tenure: u32,
    pub(super) installment: Decimal,
    pub(super) on_time: u32,
    pub(super) paid: u32,
    pub(super) start: Option<NaiveDate>,
}

impl Default for LoanFixture {
    fn default() -> Self {
        Self {
            id: 1,
            principal: dec!(200_000),
            tenure: 12,
            installment: dec!(17_770),
            on_time: 12,
            paid: 12,
            start: NaiveDate::from_ymd_opt(2024, 1, 1),
        }
    }
}

pub(super) fn loan(owner: &CustomerSnapshot, fixture: LoanFixture) -> LoanRecord {
    LoanRecord {
        id: LoanId(fixture.id),
        customer_id: owner.id,
        principal: fixture.principal,
        tenure_months: fixture.tenure,
        annual_rate: dec!(12),
        monthly_installment: fixture.installment,
        emis_paid_on_time: fixture.on_time,
        emis_paid: fixture.paid,
        start_date: fixture.start,
        end_date: None,
    }
}

pub(super) fn application(customer_id: u64, amount: Decimal, rate: Decimal) -> LoanApplication {
    LoanApplication {
        customer_id: CustomerId(customer_id),
        amount,
        annual_rate: rate,
        tenure_months: 12,
    }
}

#[derive(Default)]
pub(super) struct MemoryCustomers {
    records: Mutex<HashMap<CustomerId, CustomerSnapshot>>,
}

impl CustomerRepository for MemoryCustomers {
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
pub(super) struct MemoryLoans {
    records: Mutex<HashMap<LoanId, LoanRecord>>,
}

impl LoanRepository for MemoryLoans {
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

pub(super) fn build_service() -> (
    Arc<LoanService<MemoryCustomers, MemoryLoans>>,
    Arc<MemoryCustomers>,
    Arc<MemoryLoans>,
) {
    let customers = Arc::new(MemoryCustomers::default());
    let loans = Arc::new(MemoryLoans::default());
    let service = Arc::new(LoanService::new(customers.clone(), loans.clone()));
    (service, customers, loans)
}

/// Seed a customer with a known id directly through the upsert path.
pub(super) fn seed_customer(customers: &MemoryCustomers, snapshot: CustomerSnapshot) {
    customers.upsert(snapshot).expect("seed customer");
}

pub(super) fn seed_loan(loans: &MemoryLoans, record: LoanRecord) {
    loans.upsert(record).expect("seed loan");
}
