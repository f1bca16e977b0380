use crate::dates::parse_iso_date;
use crate::models::Field;
use crate::numbers::strip_thousands_separators;

use super::messages;

/// Limits enforced by the schema. Lengths are measured in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationLimits {
    pub employer_name_min: usize,
    pub employer_name_max: usize,
    pub notes_max: usize,
    pub required_min: usize,
    /// Largest annual income, in whole dollars. Keeps every prorated total
    /// within `i64` for any four-digit-year span.
    pub income_max: u64,
}

pub const VALIDATION_LIMITS: ValidationLimits = ValidationLimits {
    employer_name_min: 2,
    employer_name_max: 100,
    notes_max: 500,
    required_min: 1,
    income_max: 1_000_000_000_000,
};

/// A single check on one field's raw text and the message shown when it fails.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub check: fn(&str) -> bool,
    pub message: &'static str,
}

impl Rule {
    const fn new(
        check: fn(&str) -> bool,
        message: &'static str,
    ) -> Self {
        Self { check, message }
    }

    pub fn passes(
        &self,
        value: &str,
    ) -> bool {
        (self.check)(value)
    }
}

const EMPLOYER_NAME_RULES: &[Rule] = &[
    Rule::new(is_present, messages::EMPLOYER_NAME_REQUIRED),
    Rule::new(employer_name_long_enough, messages::EMPLOYER_NAME_TOO_SHORT),
    Rule::new(employer_name_short_enough, messages::EMPLOYER_NAME_TOO_LONG),
];

const ANNUAL_GROSS_INCOME_RULES: &[Rule] = &[
    Rule::new(is_present, messages::INCOME_REQUIRED),
    Rule::new(income_is_finite, messages::INCOME_INVALID),
    Rule::new(income_is_positive, messages::INCOME_NOT_POSITIVE),
    Rule::new(income_within_limit, messages::INCOME_TOO_LARGE),
];

const EMPLOYMENT_START_DATE_RULES: &[Rule] = &[
    Rule::new(is_present, messages::START_DATE_REQUIRED),
    Rule::new(is_calendar_date, messages::START_DATE_INVALID),
];

const EMPLOYMENT_END_DATE_RULES: &[Rule] = &[Rule::new(is_calendar_date, messages::END_DATE_INVALID)];

const NOTES_RULES: &[Rule] = &[Rule::new(notes_short_enough, messages::NOTES_TOO_LONG)];

/// The ordered rules for `field`.
///
/// Rules for optional fields are only applied when the field is present.
pub fn rules_for(field: Field) -> &'static [Rule] {
    match field {
        Field::EmployerName => EMPLOYER_NAME_RULES,
        Field::AnnualGrossIncome => ANNUAL_GROSS_INCOME_RULES,
        Field::EmploymentStartDate => EMPLOYMENT_START_DATE_RULES,
        Field::EmploymentEndDate => EMPLOYMENT_END_DATE_RULES,
        Field::Notes => NOTES_RULES,
    }
}

fn char_len(value: &str) -> usize {
    value.chars().count()
}

fn is_present(value: &str) -> bool {
    char_len(value) >= VALIDATION_LIMITS.required_min
}

fn employer_name_long_enough(value: &str) -> bool {
    char_len(value) >= VALIDATION_LIMITS.employer_name_min
}

fn employer_name_short_enough(value: &str) -> bool {
    char_len(value) <= VALIDATION_LIMITS.employer_name_max
}

fn notes_short_enough(value: &str) -> bool {
    char_len(value) <= VALIDATION_LIMITS.notes_max
}

fn is_calendar_date(value: &str) -> bool {
    parse_iso_date(value).is_some()
}

/// Income text as a number once separators are gone. Blank text reads as zero.
fn income_value(value: &str) -> Option<f64> {
    let stripped = strip_thousands_separators(value);
    let trimmed = stripped.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    trimmed.parse().ok()
}

fn income_is_finite(value: &str) -> bool {
    income_value(value).is_some_and(f64::is_finite)
}

fn income_is_positive(value: &str) -> bool {
    income_value(value).is_some_and(|v| v > 0.0)
}

fn income_within_limit(value: &str) -> bool {
    income_value(value).is_some_and(|v| v <= VALIDATION_LIMITS.income_max as f64)
}
