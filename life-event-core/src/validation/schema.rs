use chrono::NaiveDate;

use crate::dates::parse_iso_date;
use crate::models::{Field, LifeEventInput, LifeEventRecord};

use super::errors::FieldErrors;
use super::messages;
use super::rules::rules_for;

/// Validates the whole form.
///
/// Returns the validated record, or every field's first failing message.
///
/// # Example
///
/// ```
/// use life_event_core::{Field, LifeEventInput, validate};
///
/// let input = LifeEventInput {
///     employer_name: "A".into(),
///     annual_gross_income: "50,000".into(),
///     employment_start_date: "2024-01-01".into(),
///     employment_end_date: Some("2023-12-31".into()),
///     notes: None,
/// };
///
/// let errors = validate(&input).unwrap_err();
/// assert_eq!(
///     errors.get(Field::EmployerName),
///     Some("Employer name must be at least 2 characters")
/// );
/// assert_eq!(
///     errors.get(Field::EmploymentEndDate),
///     Some("Employment end date must be after start date")
/// );
/// assert!(!errors.contains(Field::AnnualGrossIncome));
/// ```
pub fn validate(input: &LifeEventInput) -> Result<LifeEventRecord, FieldErrors> {
    let mut errors = FieldErrors::new();
    for field in Field::ALL {
        if let Some(message) = validate_field(field, input) {
            errors.insert(field, message);
        }
    }

    if errors.is_empty() {
        Ok(LifeEventRecord::from_valid_input(input))
    } else {
        Err(errors)
    }
}

/// Validates a single field, for inline errors while the user types.
///
/// The end date also carries the cross-field ordering rule, so this may
/// report an end-date error caused by the start date's value.
pub fn validate_field(
    field: Field,
    input: &LifeEventInput,
) -> Option<&'static str> {
    let value = input.get(field);
    if field.is_optional() && value.is_empty() {
        return None;
    }

    if let Some(rule) = rules_for(field).iter().find(|rule| !rule.passes(value)) {
        return Some(rule.message);
    }

    match field {
        Field::EmploymentEndDate => end_date_follows_start(input),
        _ => None,
    }
}

/// Cross-field rule: checked only when both dates are present and valid.
fn end_date_follows_start(input: &LifeEventInput) -> Option<&'static str> {
    let (start, end) = both_dates(input)?;
    if end >= start {
        None
    } else {
        Some(messages::END_DATE_BEFORE_START)
    }
}

fn both_dates(input: &LifeEventInput) -> Option<(NaiveDate, NaiveDate)> {
    let start = parse_iso_date(&input.employment_start_date)?;
    let end = parse_iso_date(input.end_date()?)?;
    Some((start, end))
}
