use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::common::{
    application, build_service, customer, loan, seed_customer, seed_loan, today, LoanFixture,
};
use crate::lending::domain::{CustomerId, CustomerRegistration, LoanId};
use crate::lending::eligibility::RejectionReason;
use crate::lending::emi::monthly_installment;
use crate::lending::repository::LoanRepository;

fn registration(monthly_income: u64) -> CustomerRegistration {
    CustomerRegistration {
        first_name: "Asha".to_string(),
        last_name: "Rao".to_string(),
        age: 30,
        phone_number: "9999999999".to_string(),
        monthly_income,
    }
}

#[test]
fn register_derives_the_approved_limit() {
    let (service, _, _) = build_service();

    let snapshot = service
        .register_customer(registration(50_000))
        .expect("registration succeeds");

    assert_eq!(snapshot.id, CustomerId(1));
    assert_eq!(snapshot.approved_limit, 1_800_000);
    assert_eq!(snapshot.current_debt, 0);

    let next = service
        .register_customer(registration(25_000))
        .expect("registration succeeds");
    assert_eq!(next.id, CustomerId(2));
    assert_eq!(next.approved_limit, 900_000);
}

#[test]
fn unknown_customer_is_a_decision_not_an_error() {
    let (service, _, _) = build_service();
    let request = application(99, dec!(100_000), dec!(15));

    let decision = service
        .check_eligibility(&request, today())
        .expect("check runs");

    assert!(!decision.approved);
    assert_eq!(decision.rejection, Some(RejectionReason::CustomerNotFound));
    assert!(decision.message().to_lowercase().contains("not found"));
    assert_eq!(decision.corrected_rate, dec!(15));
    assert_eq!(decision.monthly_installment, Decimal::ZERO);
}

#[test]
fn create_loan_persists_the_approved_schedule() {
    let (service, customers, loans) = build_service();
    seed_customer(&customers, customer(1, 100_000));
    let request = application(1, dec!(50_000), dec!(14));

    let outcome = service
        .create_loan(&request, today())
        .expect("origination runs");

    assert!(outcome.decision.approved);
    let record = outcome.loan.expect("approved loan persisted");
    assert_eq!(record.id, LoanId(1));
    assert_eq!(record.customer_id, CustomerId(1));
    assert_eq!(record.annual_rate, dec!(14));
    assert_eq!(
        record.monthly_installment,
        monthly_installment(dec!(50_000), dec!(14), 12)
    );
    assert_eq!(record.emis_paid, 0);
    assert_eq!(record.emis_paid_on_time, 0);
    assert_eq!(record.start_date, Some(today()));
    assert_eq!(
        record.end_date,
        NaiveDate::from_ymd_opt(2025, 6, 15),
        "end date is start plus tenure"
    );

    let stored = loans.fetch(LoanId(1)).expect("fetch runs");
    assert_eq!(stored.as_ref(), Some(&record));
}

#[test]
fn rejected_application_leaves_the_book_untouched() {
    let (service, customers, loans) = build_service();
    seed_customer(&customers, customer(1, 100_000));
    // Fresh history scores 40; 10% sits under the 12% floor.
    let request = application(1, dec!(50_000), dec!(10));

    let outcome = service
        .create_loan(&request, today())
        .expect("origination runs");

    assert!(!outcome.decision.approved);
    assert!(outcome.loan.is_none());
    assert!(loans
        .for_customer(CustomerId(1))
        .expect("fetch runs")
        .is_empty());
}

#[test]
fn loan_views_distinguish_unknown_from_empty() {
    let (service, customers, _) = build_service();

    assert!(service
        .loans_for_customer(CustomerId(42))
        .expect("lookup runs")
        .is_none());

    seed_customer(&customers, customer(42, 100_000));
    let book = service
        .loans_for_customer(CustomerId(42))
        .expect("lookup runs")
        .expect("customer known");
    assert!(book.is_empty());
}

#[test]
fn loan_detail_joins_the_owning_customer() {
    let (service, customers, _) = build_service();
    seed_customer(&customers, customer(1, 100_000));
    let request = application(1, dec!(50_000), dec!(14));
    let outcome = service
        .create_loan(&request, today())
        .expect("origination runs");
    let id = outcome.loan.expect("persisted").id;

    let detail = service
        .loan_detail(id)
        .expect("lookup runs")
        .expect("loan known");
    assert_eq!(detail.loan_id, id);
    assert_eq!(detail.customer.id, CustomerId(1));
    assert_eq!(detail.customer.first_name, "Asha");
    assert_eq!(detail.tenure, 12);

    assert!(service
        .loan_detail(LoanId(999))
        .expect("lookup runs")
        .is_none());
}

#[test]
fn loan_list_is_newest_first() {
    let (service, customers, loans) = build_service();
    let owner = customer(1, 100_000);
    seed_customer(&customers, owner.clone());
    seed_loan(
        &loans,
        loan(
            &owner,
            LoanFixture {
                id: 3,
                paid: 4,
                ..LoanFixture::default()
            },
        ),
    );
    seed_loan(
        &loans,
        loan(
            &owner,
            LoanFixture {
                id: 7,
                ..LoanFixture::default()
            },
        ),
    );

    let book = service
        .loans_for_customer(CustomerId(1))
        .expect("lookup runs")
        .expect("customer known");
    assert_eq!(book.len(), 2);
    assert_eq!(book[0].loan_id, LoanId(7));
    assert_eq!(book[1].loan_id, LoanId(3));
    assert_eq!(book[1].repayments_left, 8);
}
