use serde::{Deserialize, Serialize};

use super::Field;

/// Raw form values exactly as the user typed them.
///
/// Required fields use the empty string for "not entered". Optional fields
/// are `None` when absent; `Some("")` is treated the same as `None`
/// everywhere in this crate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LifeEventInput {
    #[serde(default, alias = "employer_name")]
    pub employer_name: String,

    #[serde(default, alias = "annual_gross_income")]
    pub annual_gross_income: String,

    #[serde(default, alias = "employment_start_date")]
    pub employment_start_date: String,

    #[serde(default, alias = "employment_end_date", skip_serializing_if = "Option::is_none")]
    pub employment_end_date: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl LifeEventInput {
    /// Creates an empty input, the state of a freshly opened form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the raw text of `field`, with absent optionals read as `""`.
    pub fn get(
        &self,
        field: Field,
    ) -> &str {
        match field {
            Field::EmployerName => &self.employer_name,
            Field::AnnualGrossIncome => &self.annual_gross_income,
            Field::EmploymentStartDate => &self.employment_start_date,
            Field::EmploymentEndDate => self.employment_end_date.as_deref().unwrap_or_default(),
            Field::Notes => self.notes.as_deref().unwrap_or_default(),
        }
    }

    /// Replaces the raw text of `field`. Empty text clears an optional field.
    pub fn set(
        &mut self,
        field: Field,
        value: impl Into<String>,
    ) {
        let value = value.into();
        match field {
            Field::EmployerName => self.employer_name = value,
            Field::AnnualGrossIncome => self.annual_gross_income = value,
            Field::EmploymentStartDate => self.employment_start_date = value,
            Field::EmploymentEndDate => self.employment_end_date = non_empty(value),
            Field::Notes => self.notes = non_empty(value),
        }
    }

    /// The end date, if one was entered.
    pub fn end_date(&self) -> Option<&str> {
        self.employment_end_date.as_deref().filter(|s| !s.is_empty())
    }

    /// The notes, if any were entered.
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref().filter(|s| !s.is_empty())
    }

    /// Resets every field to its empty default.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

/// A life event that passed every validation rule.
///
/// Only [`crate::validation::validate`] constructs this type, so holding one
/// is proof that the invariants hold. Serializes in the export field order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LifeEventRecord {
    employer_name: String,
    annual_gross_income: String,
    employment_start_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    employment_end_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
}

impl LifeEventRecord {
    pub(crate) fn from_valid_input(input: &LifeEventInput) -> Self {
        Self {
            employer_name: input.employer_name.clone(),
            annual_gross_income: input.annual_gross_income.clone(),
            employment_start_date: input.employment_start_date.clone(),
            employment_end_date: input.end_date().map(str::to_owned),
            notes: input.notes().map(str::to_owned),
        }
    }

    pub fn employer_name(&self) -> &str {
        &self.employer_name
    }

    /// The income text as submitted, separators included.
    pub fn annual_gross_income(&self) -> &str {
        &self.annual_gross_income
    }

    pub fn employment_start_date(&self) -> &str {
        &self.employment_start_date
    }

    pub fn employment_end_date(&self) -> Option<&str> {
        self.employment_end_date.as_deref()
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}
