use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Local;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{CustomerId, CustomerRegistration, LoanApplication, LoanId};
use super::repository::{CustomerRepository, LoanRepository};
use super::service::{LoanService, LoanServiceError};

/// Router builder exposing the registration, eligibility, origination, and
/// loan view endpoints.
pub fn loan_router<C, L>(service: Arc<LoanService<C, L>>) -> Router
where
    C: CustomerRepository + 'static,
    L: LoanRepository + 'static,
{
    Router::new()
        .route("/register", post(register_handler::<C, L>))
        .route("/check-eligibility", post(check_eligibility_handler::<C, L>))
        .route("/create-loan", post(create_loan_handler::<C, L>))
        .route("/view-loan/:loan_id", get(view_loan_handler::<C, L>))
        .route("/view-loans/:customer_id", get(view_loans_handler::<C, L>))
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct RegisterRequest {
    first_name: String,
    last_name: String,
    age: i64,
    monthly_income: i64,
    phone_number: u64,
}

impl RegisterRequest {
    fn validate(&self) -> Vec<(&'static str, String)> {
        let mut errors = Vec::new();
        if self.first_name.trim().is_empty() {
            errors.push(("first_name", "must not be blank".to_string()));
        }
        if self.last_name.trim().is_empty() {
            errors.push(("last_name", "must not be blank".to_string()));
        }
        if !(1..=120).contains(&self.age) {
            errors.push(("age", "must be between 1 and 120".to_string()));
        }
        if self.monthly_income < 0 {
            errors.push(("monthly_income", "must not be negative".to_string()));
        }
        errors
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct RegisterResponse {
    customer_id: CustomerId,
    name: String,
    age: Option<u8>,
    monthly_income: u64,
    approved_limit: u64,
    phone_number: u64,
}

/// Loan request payload shared by the eligibility and origination endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct LoanRequest {
    customer_id: u64,
    loan_amount: Decimal,
    interest_rate: Decimal,
    tenure: i64,
}

impl LoanRequest {
    fn validate(&self) -> Vec<(&'static str, String)> {
        let mut errors = Vec::new();
        if self.loan_amount <= Decimal::ZERO {
            errors.push(("loan_amount", "must be positive".to_string()));
        }
        if self.tenure < 1 {
            errors.push(("tenure", "must be at least 1".to_string()));
        }
        errors
    }

    fn application(&self) -> LoanApplication {
        LoanApplication {
            customer_id: CustomerId(self.customer_id),
            amount: self.loan_amount,
            annual_rate: self.interest_rate,
            tenure_months: self.tenure.max(0) as u32,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct EligibilityResponse {
    customer_id: u64,
    approval: bool,
    interest_rate: Decimal,
    corrected_interest_rate: Decimal,
    tenure: i64,
    monthly_installment: Decimal,
}

#[derive(Debug, Serialize)]
pub(crate) struct CreateLoanResponse {
    loan_id: Option<LoanId>,
    customer_id: u64,
    loan_approved: bool,
    message: String,
    monthly_installment: Decimal,
}

pub(crate) async fn register_handler<C, L>(
    State(service): State<Arc<LoanService<C, L>>>,
    axum::Json(request): axum::Json<RegisterRequest>,
) -> Response
where
    C: CustomerRepository + 'static,
    L: LoanRepository + 'static,
{
    let errors = request.validate();
    if !errors.is_empty() {
        return validation_response(errors);
    }

    let phone_number = request.phone_number;
    let registration = CustomerRegistration {
        first_name: request.first_name,
        last_name: request.last_name,
        age: request.age as u8,
        phone_number: phone_number.to_string(),
        monthly_income: request.monthly_income as u64,
    };

    match service.register_customer(registration) {
        Ok(customer) => {
            let body = RegisterResponse {
                customer_id: customer.id,
                name: customer.full_name(),
                age: customer.age,
                monthly_income: customer.monthly_income,
                approved_limit: customer.approved_limit,
                phone_number,
            };
            (StatusCode::CREATED, axum::Json(body)).into_response()
        }
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn check_eligibility_handler<C, L>(
    State(service): State<Arc<LoanService<C, L>>>,
    axum::Json(request): axum::Json<LoanRequest>,
) -> Response
where
    C: CustomerRepository + 'static,
    L: LoanRepository + 'static,
{
    let errors = request.validate();
    if !errors.is_empty() {
        return validation_response(errors);
    }

    let today = Local::now().date_naive();
    match service.check_eligibility(&request.application(), today) {
        Ok(decision) => {
            let body = EligibilityResponse {
                customer_id: request.customer_id,
                approval: decision.approved,
                interest_rate: request.interest_rate,
                corrected_interest_rate: decision.corrected_rate,
                tenure: request.tenure,
                monthly_installment: decision.monthly_installment,
            };
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn create_loan_handler<C, L>(
    State(service): State<Arc<LoanService<C, L>>>,
    axum::Json(request): axum::Json<LoanRequest>,
) -> Response
where
    C: CustomerRepository + 'static,
    L: LoanRepository + 'static,
{
    let errors = request.validate();
    if !errors.is_empty() {
        return validation_response(errors);
    }

    let today = Local::now().date_naive();
    match service.create_loan(&request.application(), today) {
        Ok(outcome) => {
            let status = if outcome.decision.approved {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            let body = CreateLoanResponse {
                loan_id: outcome.loan.map(|loan| loan.id),
                customer_id: request.customer_id,
                loan_approved: outcome.decision.approved,
                message: outcome.decision.message(),
                monthly_installment: outcome.decision.monthly_installment,
            };
            (status, axum::Json(body)).into_response()
        }
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn view_loan_handler<C, L>(
    State(service): State<Arc<LoanService<C, L>>>,
    Path(loan_id): Path<u64>,
) -> Response
where
    C: CustomerRepository + 'static,
    L: LoanRepository + 'static,
{
    match service.loan_detail(LoanId(loan_id)) {
        Ok(Some(detail)) => (StatusCode::OK, axum::Json(detail)).into_response(),
        Ok(None) => {
            let payload = json!({ "detail": "Loan not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(err) => service_error_response(err),
    }
}

pub(crate) async fn view_loans_handler<C, L>(
    State(service): State<Arc<LoanService<C, L>>>,
    Path(customer_id): Path<u64>,
) -> Response
where
    C: CustomerRepository + 'static,
    L: LoanRepository + 'static,
{
    match service.loans_for_customer(CustomerId(customer_id)) {
        Ok(Some(loans)) => (StatusCode::OK, axum::Json(loans)).into_response(),
        Ok(None) => {
            let payload = json!({ "detail": "Customer not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(err) => service_error_response(err),
    }
}

fn validation_response(errors: Vec<(&'static str, String)>) -> Response {
    let mut fields: BTreeMap<&'static str, Vec<String>> = BTreeMap::new();
    for (field, message) in errors {
        fields.entry(field).or_default().push(message);
    }
    (StatusCode::BAD_REQUEST, axum::Json(json!(fields))).into_response()
}

fn service_error_response(err: LoanServiceError) -> Response {
    let payload = json!({ "error": err.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}
