//! Form state for a single life event.
//!
//! [`LifeEventForm`] owns the raw field values and everything derived from
//! them: inline errors, the live total, and the "generating file" flag that
//! disables submit and cancel while an export is in flight. The validation
//! and calculation it delegates to are pure; this is the only mutable state.
//!
//! [`LifeEventForm::submit`] borrows the form mutably across the export, so
//! neither a second submit nor a cancel can start until it returns.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::NaiveDate;
use life_event_core::calculations::calculate_total_income_with;
use life_event_core::numbers::{
    format_as_currency, format_with_thousands_separators, parse_to_raw_digits,
};
use life_event_core::{
    Field, FieldErrors, LifeEventInput, LifeEventRecord, RoundingPolicy, dates, validate,
    validate_field,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::FormConfig;
use crate::export::{ExportError, ExportReceipt, ExportedLifeEvent, Exporter};

#[derive(Debug, Error)]
pub enum FormError {
    #[error("form has invalid fields: {0}")]
    Invalid(#[from] FieldErrors),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Shared view of whether an export is running.
///
/// Clone it into whatever renders the submit and cancel controls; it stays
/// readable while [`LifeEventForm::submit`] holds the form mutably.
#[derive(Debug, Clone, Default)]
pub struct GeneratingFlag(Arc<AtomicBool>);

impl GeneratingFlag {
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Raises the flag until the returned guard is dropped.
    fn raise(&self) -> GeneratingGuard<'_> {
        self.0.store(true, Ordering::Release);
        GeneratingGuard(self)
    }
}

/// Lowers the flag when dropped, whichever way the export ends.
struct GeneratingGuard<'a>(&'a GeneratingFlag);

impl Drop for GeneratingGuard<'_> {
    fn drop(&mut self) {
        self.0.0.store(false, Ordering::Release);
    }
}

#[derive(Debug)]
pub struct LifeEventForm {
    input: LifeEventInput,
    errors: FieldErrors,
    /// Set by the first submit; afterwards fields re-validate on change.
    submit_attempted: bool,
    generating: GeneratingFlag,
    rounding: RoundingPolicy,
    today: Option<NaiveDate>,
}

impl LifeEventForm {
    pub fn new(config: &FormConfig) -> Self {
        Self {
            input: LifeEventInput::new(),
            errors: FieldErrors::new(),
            submit_attempted: false,
            generating: GeneratingFlag::default(),
            rounding: config.calculation.rounding,
            today: config.calculation.today,
        }
    }

    /// Pins the date used for open-ended employment.
    pub fn with_today(
        mut self,
        today: NaiveDate,
    ) -> Self {
        self.today = Some(today);
        self
    }

    /// Stores a keystroke's worth of input for `field`.
    ///
    /// Income is stored as raw digits, the way the currency input hands its
    /// value over. Once a submit has been attempted the changed field is
    /// re-validated, along with the end date when the start date changes.
    pub fn set_field(
        &mut self,
        field: Field,
        value: &str,
    ) {
        match field {
            Field::AnnualGrossIncome => self.input.set(field, parse_to_raw_digits(value)),
            _ => self.input.set(field, value),
        }

        if self.submit_attempted {
            self.revalidate(field);
            if field == Field::EmploymentStartDate {
                self.revalidate(Field::EmploymentEndDate);
            }
        }
    }

    /// Replaces every field at once, as a prefilled form would.
    pub fn fill(
        &mut self,
        input: &LifeEventInput,
    ) {
        for field in Field::ALL {
            self.set_field(field, input.get(field));
        }
    }

    fn revalidate(
        &mut self,
        field: Field,
    ) {
        let message = validate_field(field, &self.input);
        self.errors.update(field, message);
    }

    pub fn input(&self) -> &LifeEventInput {
        &self.input
    }

    /// The stored value of `field`.
    pub fn value(
        &self,
        field: Field,
    ) -> &str {
        self.input.get(field)
    }

    /// The value as an input would show it; income gets thousands separators.
    pub fn display_value(
        &self,
        field: Field,
    ) -> String {
        match field {
            Field::AnnualGrossIncome => format_with_thousands_separators(self.value(field)),
            _ => self.value(field).to_string(),
        }
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(
        &self,
        field: Field,
    ) -> Option<&'static str> {
        self.errors.get(field)
    }

    /// The live prorated total for the current values.
    pub fn total_income(&self) -> i64 {
        calculate_total_income_with(
            &self.input.annual_gross_income,
            &self.input.employment_start_date,
            self.input.get(Field::EmploymentEndDate),
            self.today(),
            self.rounding,
        )
    }

    /// The live total formatted for display, e.g. `"$99,932"`.
    pub fn total_income_display(&self) -> String {
        format_as_currency(self.total_income())
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(dates::today)
    }

    pub fn is_generating_file(&self) -> bool {
        self.generating.is_set()
    }

    /// A handle for observing the in-progress flag from elsewhere.
    pub fn generating_flag(&self) -> GeneratingFlag {
        self.generating.clone()
    }

    /// Validates the whole form, recording every field's error.
    pub fn validate(&mut self) -> Result<LifeEventRecord, FieldErrors> {
        self.submit_attempted = true;
        match validate(&self.input) {
            Ok(record) => {
                self.errors.clear();
                Ok(record)
            }
            Err(errors) => {
                debug!(%errors, "life event form is invalid");
                self.errors = errors.clone();
                Err(errors)
            }
        }
    }

    /// Validates, computes the total and hands the payload to `exporter`.
    ///
    /// Field values are kept after a successful export, so submitting again
    /// without changes produces an identical payload.
    ///
    /// # Errors
    ///
    /// * [`FormError::Invalid`] with the per-field messages.
    /// * [`FormError::Export`] when serialization or the exporter fails.
    pub async fn submit<E: Exporter + ?Sized>(
        &mut self,
        exporter: &E,
    ) -> Result<ExportReceipt, FormError> {
        let record = self.validate()?;
        let total_income = self.total_income();
        let exported = ExportedLifeEvent::new(record, total_income);

        let _in_progress = self.generating.raise();

        let file_name = exported.file_name();
        let payload = exported.to_json()?;
        let receipt = exporter.export(&file_name, &payload).await.inspect_err(|error| {
            warn!(%error, %file_name, "life event export failed");
        })?;

        info!(
            file_name = %receipt.file_name,
            total_income = %exported.total_income(),
            "life event submitted"
        );
        Ok(receipt)
    }

    /// Clears every field and error, returning the form to its initial state.
    pub fn cancel(&mut self) {
        self.input.clear();
        self.errors.clear();
        self.submit_attempted = false;
        debug!("life event form reset");
    }
}

impl Default for LifeEventForm {
    fn default() -> Self {
        Self::new(&FormConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use life_event_core::validation::messages;
    use pretty_assertions::assert_eq;

    use super::*;

    fn form() -> LifeEventForm {
        LifeEventForm::default().with_today(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap())
    }

    #[test]
    fn income_is_stored_raw_and_displayed_grouped() {
        let mut form = form();

        form.set_field(Field::AnnualGrossIncome, "$1,234,567.5");

        assert_eq!(form.value(Field::AnnualGrossIncome), "1234567.5");
        assert_eq!(form.display_value(Field::AnnualGrossIncome), "1,234,567.5");
    }

    #[test]
    fn no_errors_before_first_submit() {
        let mut form = form();

        form.set_field(Field::EmployerName, "A");

        assert!(form.errors().is_empty());
    }

    #[test]
    fn fields_revalidate_on_change_after_failed_submit() {
        let mut form = form();
        form.set_field(Field::EmployerName, "A");
        assert!(form.validate().is_err());
        assert_eq!(
            form.error(Field::EmployerName),
            Some(messages::EMPLOYER_NAME_TOO_SHORT)
        );

        form.set_field(Field::EmployerName, "Acme Corp");

        assert_eq!(form.error(Field::EmployerName), None);
        assert_eq!(
            form.error(Field::AnnualGrossIncome),
            Some(messages::INCOME_REQUIRED)
        );
    }

    #[test]
    fn changing_start_date_revalidates_end_date() {
        let mut form = form();
        form.set_field(Field::EmploymentStartDate, "2024-01-01");
        form.set_field(Field::EmploymentEndDate, "2023-12-31");
        let _ = form.validate();
        assert_eq!(
            form.error(Field::EmploymentEndDate),
            Some(messages::END_DATE_BEFORE_START)
        );

        form.set_field(Field::EmploymentStartDate, "2023-01-01");

        assert_eq!(form.error(Field::EmploymentEndDate), None);
    }

    #[test]
    fn live_total_follows_changes() {
        let mut form = form();
        assert_eq!(form.total_income_display(), "$0");

        form.set_field(Field::AnnualGrossIncome, "100,000");
        form.set_field(Field::EmploymentStartDate, "2023-01-01");
        form.set_field(Field::EmploymentEndDate, "2023-12-31");

        assert_eq!(form.total_income(), 99932);
        assert_eq!(form.total_income_display(), "$99,932");
    }

    #[test]
    fn open_end_uses_pinned_today() {
        let mut form = form();
        form.set_field(Field::AnnualGrossIncome, "365250");
        form.set_field(Field::EmploymentStartDate, "2025-03-01");

        assert_eq!(form.total_income(), 10000);
    }

    #[test]
    fn cancel_resets_values_and_errors() {
        let mut form = form();
        form.set_field(Field::Notes, "draft");
        let _ = form.validate();

        form.cancel();

        assert_eq!(form.input(), &LifeEventInput::new());
        assert!(form.errors().is_empty());

        form.set_field(Field::EmployerName, "A");
        assert!(form.errors().is_empty());
    }

    #[test]
    fn guard_lowers_flag_on_drop() {
        let flag = GeneratingFlag::default();
        {
            let _guard = flag.raise();
            assert!(flag.is_set());
        }

        assert!(!flag.is_set());
    }
}
