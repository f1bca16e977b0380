//! End-to-end checks of the validation schema, calculator and formatting
//! helpers working together the way a form host drives them.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use life_event_core::numbers::{
    format_as_currency, format_with_thousands_separators, parse_to_raw_digits,
};
use life_event_core::validation::messages;
use life_event_core::{Field, LifeEventInput, calculate_total_income_on, validate};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter("debug")
        .try_init();
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

/// Simulates typing into the currency input: the host stores raw digits and
/// displays the grouped form.
fn type_income(
    input: &mut LifeEventInput,
    keystrokes: &str,
) -> String {
    let mut display = String::new();
    for c in keystrokes.chars() {
        display.push(c);
        let raw = parse_to_raw_digits(&display);
        input.set(Field::AnnualGrossIncome, raw.clone());
        display = format_with_thousands_separators(&raw);
    }
    display
}

#[test]
fn typing_income_keeps_display_grouped_and_value_raw() {
    let mut input = LifeEventInput::new();

    let display = type_income(&mut input, "1234567");

    assert_eq!(display, "1,234,567");
    assert_eq!(input.annual_gross_income, "1234567");
}

#[test]
fn live_total_tracks_every_intermediate_state() {
    init_tracing();
    let mut input = LifeEventInput::new();
    let mut totals = Vec::new();

    input.set(Field::EmploymentStartDate, "2023-01-01");
    totals.push(calculate_total_income_on(
        &input.annual_gross_income,
        &input.employment_start_date,
        input.get(Field::EmploymentEndDate),
        today(),
    ));

    type_income(&mut input, "100000");
    totals.push(calculate_total_income_on(
        &input.annual_gross_income,
        &input.employment_start_date,
        input.get(Field::EmploymentEndDate),
        today(),
    ));

    input.set(Field::EmploymentEndDate, "2023-12-");
    totals.push(calculate_total_income_on(
        &input.annual_gross_income,
        &input.employment_start_date,
        input.get(Field::EmploymentEndDate),
        today(),
    ));

    input.set(Field::EmploymentEndDate, "2023-12-31");
    totals.push(calculate_total_income_on(
        &input.annual_gross_income,
        &input.employment_start_date,
        input.get(Field::EmploymentEndDate),
        today(),
    ));

    // No income, open-ended through today (800 days), half-typed end date, full year.
    assert_eq!(totals, vec![0, 219028, 0, 99932]);
}

#[test]
fn submitted_record_with_total_formats_as_currency() {
    let input = LifeEventInput {
        employer_name: "Acme Corp".to_string(),
        annual_gross_income: "100000".to_string(),
        employment_start_date: "2023-01-01".to_string(),
        employment_end_date: Some("2023-12-31".to_string()),
        notes: None,
    };

    let record = validate(&input).unwrap();
    let total = calculate_total_income_on(
        record.annual_gross_income(),
        record.employment_start_date(),
        record.employment_end_date().unwrap_or_default(),
        today(),
    );

    assert_eq!(format_as_currency(total), "$99,932");
}

#[test]
fn cross_field_error_and_zero_total_agree() {
    let input = LifeEventInput {
        employer_name: "Acme Corp".to_string(),
        annual_gross_income: "75,000".to_string(),
        employment_start_date: "2024-01-01".to_string(),
        employment_end_date: Some("2023-12-31".to_string()),
        notes: None,
    };

    let errors = validate(&input).unwrap_err();
    let total = calculate_total_income_on(
        &input.annual_gross_income,
        &input.employment_start_date,
        input.get(Field::EmploymentEndDate),
        today(),
    );

    assert_eq!(
        errors.get(Field::EmploymentEndDate),
        Some(messages::END_DATE_BEFORE_START)
    );
    assert_eq!(total, 0);
}

#[test]
fn largest_valid_income_prorates_without_overflow() {
    let input = LifeEventInput {
        employer_name: "Acme Corp".to_string(),
        annual_gross_income: "1000000000000".to_string(),
        employment_start_date: "0001-01-01".to_string(),
        employment_end_date: Some("9999-12-31".to_string()),
        notes: None,
    };

    let record = validate(&input).unwrap();
    let total = calculate_total_income_on(
        record.annual_gross_income(),
        record.employment_start_date(),
        record.employment_end_date().unwrap_or_default(),
        today(),
    );

    assert!(total > 9_999 * 1_000_000_000_000 - 1_000_000_000_000);
    assert!(total < 10_000 * 1_000_000_000_000);
}

#[test]
fn oversized_income_is_rejected_rather_than_totalled_as_zero() {
    let input = LifeEventInput {
        employer_name: "Acme Corp".to_string(),
        annual_gross_income: "9".repeat(40),
        employment_start_date: "2023-01-01".to_string(),
        employment_end_date: Some("2023-12-31".to_string()),
        notes: None,
    };

    let errors = validate(&input).unwrap_err();

    assert_eq!(
        errors.get(Field::AnnualGrossIncome),
        Some(messages::INCOME_TOO_LARGE)
    );
}
