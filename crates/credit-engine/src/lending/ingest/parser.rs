use chrono::NaiveDate;
use csv::StringRecord;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Read;
use tracing::warn;

/// Workbook headers arrive in arbitrary casing and spacing; fold them to the
/// snake_case names the row structs expect.
pub(crate) fn normalize_header(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    cleaned
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_ascii_lowercase()
}

#[derive(Debug, Deserialize)]
pub(crate) struct CustomerRow {
    #[serde(default)]
    customer_id: Option<String>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
    #[serde(default)]
    phone_number: Option<String>,
    #[serde(default)]
    monthly_salary: Option<String>,
    #[serde(default)]
    approved_limit: Option<String>,
    #[serde(default)]
    current_debt: Option<String>,
}

/// Customer row with spreadsheet artifacts stripped.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ParsedCustomer {
    pub(crate) customer_id: u64,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) phone_number: String,
    pub(crate) monthly_salary: u64,
    pub(crate) approved_limit: u64,
    pub(crate) current_debt: u64,
}

impl CustomerRow {
    /// `None` when both name halves are blank; such rows carry no customer.
    pub(crate) fn parsed(&self) -> Option<ParsedCustomer> {
        let first_name = text(&self.first_name);
        let last_name = text(&self.last_name);
        if first_name.is_empty() && last_name.is_empty() {
            return None;
        }

        Some(ParsedCustomer {
            customer_id: count(&self.customer_id),
            first_name: fallback_name(first_name),
            last_name: fallback_name(last_name),
            phone_number: phone(&self.phone_number),
            monthly_salary: count(&self.monthly_salary),
            approved_limit: count(&self.approved_limit),
            current_debt: count(&self.current_debt),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoanRow {
    #[serde(default)]
    loan_id: Option<String>,
    #[serde(default)]
    customer_id: Option<String>,
    #[serde(default)]
    loan_amount: Option<String>,
    #[serde(default)]
    tenure: Option<String>,
    #[serde(default)]
    interest_rate: Option<String>,
    #[serde(default, alias = "emi")]
    monthly_repayment: Option<String>,
    #[serde(default)]
    emis_paid_on_time: Option<String>,
    #[serde(default)]
    emis_paid: Option<String>,
    #[serde(default)]
    start_date: Option<String>,
    #[serde(default)]
    end_date: Option<String>,
}

#[derive(Debug, PartialEq)]
pub(crate) struct ParsedLoan {
    pub(crate) loan_id: u64,
    pub(crate) customer_id: u64,
    pub(crate) loan_amount: Decimal,
    pub(crate) tenure: u32,
    pub(crate) interest_rate: Decimal,
    pub(crate) monthly_repayment: Decimal,
    pub(crate) emis_paid_on_time: u32,
    pub(crate) emis_paid: u32,
    pub(crate) start_date: Option<NaiveDate>,
    pub(crate) end_date: Option<NaiveDate>,
}

impl LoanRow {
    pub(crate) fn parsed(&self) -> ParsedLoan {
        let tenure = count(&self.tenure) as u32;
        let emis_paid_on_time = count(&self.emis_paid_on_time) as u32;
        // Installments paid defaults to the on-time figure and can never
        // exceed the schedule.
        let emis_paid = self
            .emis_paid
            .as_deref()
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| lenient_u64(value) as u32)
            .unwrap_or(emis_paid_on_time)
            .min(tenure);

        ParsedLoan {
            loan_id: count(&self.loan_id),
            customer_id: count(&self.customer_id),
            loan_amount: currency(&self.loan_amount),
            tenure,
            interest_rate: currency(&self.interest_rate),
            monthly_repayment: currency(&self.monthly_repayment),
            emis_paid_on_time,
            emis_paid,
            start_date: self.start_date.as_deref().and_then(parse_date),
            end_date: self.end_date.as_deref().and_then(parse_date),
        }
    }
}

pub(crate) fn parse_customer_rows<R: Read>(reader: R) -> Result<Vec<CustomerRow>, csv::Error> {
    parse_rows(reader)
}

pub(crate) fn parse_loan_rows<R: Read>(reader: R) -> Result<Vec<LoanRow>, csv::Error> {
    parse_rows(reader)
}

fn parse_rows<R: Read, T: serde::de::DeserializeOwned>(reader: R) -> Result<Vec<T>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let normalized: StringRecord = csv_reader.headers()?.iter().map(normalize_header).collect();
    csv_reader.set_headers(normalized);

    let mut rows = Vec::new();
    for row in csv_reader.deserialize::<T>() {
        match row {
            Ok(parsed) => rows.push(parsed),
            // Malformed rows are dropped, never abort the batch.
            Err(err) => warn!(%err, "skipping malformed workbook row"),
        }
    }
    Ok(rows)
}

fn text(raw: &Option<String>) -> String {
    raw.as_deref().unwrap_or_default().trim().to_string()
}

fn fallback_name(value: String) -> String {
    if value.is_empty() {
        "Unknown".to_string()
    } else {
        value
    }
}

/// Integer cell, tolerating the float renderings spreadsheets produce
/// ("50000.0"). Anything unparseable counts as 0.
fn count(raw: &Option<String>) -> u64 {
    raw.as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(lenient_u64)
        .unwrap_or(0)
}

fn lenient_u64(value: &str) -> u64 {
    value
        .parse::<u64>()
        .ok()
        .or_else(|| value.parse::<f64>().ok().map(|float| float.trunc() as u64))
        .unwrap_or(0)
}

fn currency(raw: &Option<String>) -> Decimal {
    raw.as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .and_then(|value| {
            value
                .parse::<Decimal>()
                .ok()
                .or_else(|| value.parse::<f64>().ok().and_then(Decimal::from_f64))
        })
        .unwrap_or(Decimal::ZERO)
}

/// Dates arrive as `YYYY-MM-DD`, sometimes with a time suffix; take the date
/// prefix and ignore the rest.
fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    let prefix = trimmed.get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

/// Phone cells render as floats when the sheet treats them numerically;
/// collapse "9876543210.0" back to the digits.
fn phone(raw: &Option<String>) -> String {
    let value = text(raw);
    if value.is_empty() {
        return "0".to_string();
    }
    match value.parse::<f64>() {
        Ok(number) if number.fract() == 0.0 => format!("{}", number as u64),
        _ => value,
    }
}
