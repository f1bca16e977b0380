//! Submission tests that drive the form through real exporters.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use pretty_assertions::assert_eq;

use life_event_core::validation::messages;
use life_event_core::{Field, RoundingPolicy};
use life_event_form::config::{self, FormConfig};
use life_event_form::{
    ExportError, ExportReceipt, Exporter, FileExporter, FormError, GeneratingFlag, LifeEventForm,
};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()
}

fn filled_form() -> LifeEventForm {
    let input = config::load_input(&fixture("acme.toml")).expect("fixture should parse");
    let mut form = LifeEventForm::default().with_today(today());
    form.fill(&input);
    form
}

/// Records what it was given and whether the form's flag was up at the time.
struct RecordingExporter {
    flag: GeneratingFlag,
    seen: Mutex<Vec<(String, String, bool)>>,
}

#[async_trait]
impl Exporter for RecordingExporter {
    async fn export(
        &self,
        file_name: &str,
        payload: &str,
    ) -> Result<ExportReceipt, ExportError> {
        self.seen.lock().unwrap().push((
            file_name.to_string(),
            payload.to_string(),
            self.flag.is_set(),
        ));
        Ok(ExportReceipt {
            file_name: file_name.to_string(),
            path: None,
            bytes: payload.len(),
        })
    }
}

struct FailingExporter;

#[async_trait]
impl Exporter for FailingExporter {
    async fn export(
        &self,
        _file_name: &str,
        _payload: &str,
    ) -> Result<ExportReceipt, ExportError> {
        Err(ExportError::Write {
            path: PathBuf::from("/denied"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        })
    }
}

#[tokio::test]
async fn submit_writes_named_file_with_total() {
    let dir = tempfile::tempdir().unwrap();
    let exporter = FileExporter::new(dir.path().join("exports"));
    let mut form = filled_form();

    let receipt = form.submit(&exporter).await.expect("submit should succeed");

    let path = receipt.path.expect("file exporter reports a path");
    assert_eq!(receipt.file_name, "life-event-acme-corp.json");
    assert_eq!(path, dir.path().join("exports").join("life-event-acme-corp.json"));

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(
        written,
        r#"{
  "employerName": "Acme Corp",
  "annualGrossIncome": "100000",
  "employmentStartDate": "2023-01-01",
  "employmentEndDate": "2023-12-31",
  "notes": "Left for a startup",
  "totalIncome": "$99,932"
}"#
    );
    assert_eq!(receipt.bytes, written.len());
}

#[tokio::test]
async fn flag_is_raised_during_export_and_lowered_after() {
    let mut form = filled_form();
    let exporter = RecordingExporter {
        flag: form.generating_flag(),
        seen: Mutex::new(Vec::new()),
    };

    form.submit(&exporter).await.unwrap();

    let seen = exporter.seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].2, "flag should be set while exporting");
    assert!(!form.is_generating_file());
}

#[tokio::test]
async fn failed_export_still_lowers_flag() {
    let mut form = filled_form();

    let error = form.submit(&FailingExporter).await.unwrap_err();

    assert!(matches!(error, FormError::Export(ExportError::Write { .. })));
    assert!(!form.is_generating_file());
    assert_eq!(form.value(Field::EmployerName), "Acme Corp");

    form.cancel();

    assert_eq!(form.value(Field::EmployerName), "");
    assert!(form.errors().is_empty());
}

#[tokio::test]
async fn flag_is_lowered_between_sequential_submits() {
    let mut form = filled_form();
    let exporter = RecordingExporter {
        flag: form.generating_flag(),
        seen: Mutex::new(Vec::new()),
    };

    form.submit(&FailingExporter).await.unwrap_err();
    form.submit(&exporter).await.unwrap();
    form.submit(&exporter).await.unwrap();

    let seen = exporter.seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert!(seen.iter().all(|(_, _, raised)| *raised));
    assert!(!form.is_generating_file());
}

#[tokio::test]
async fn resubmitting_unchanged_form_is_byte_identical() {
    let mut form = filled_form();
    form.set_field(Field::EmploymentEndDate, "");
    let exporter = RecordingExporter {
        flag: form.generating_flag(),
        seen: Mutex::new(Vec::new()),
    };

    form.submit(&exporter).await.unwrap();
    form.submit(&exporter).await.unwrap();

    let seen = exporter.seen.lock().unwrap();
    assert_eq!(seen[0].1, seen[1].1);
    assert!(!seen[0].1.contains("employmentEndDate"));
}

#[tokio::test]
async fn invalid_form_is_not_exported() {
    let mut form = filled_form();
    form.set_field(Field::EmploymentStartDate, "2024-01-01");
    let exporter = RecordingExporter {
        flag: form.generating_flag(),
        seen: Mutex::new(Vec::new()),
    };

    let error = form.submit(&exporter).await.unwrap_err();

    let FormError::Invalid(errors) = error else {
        panic!("expected validation failure, got {error:?}");
    };
    assert_eq!(
        errors.get(Field::EmploymentEndDate),
        Some(messages::END_DATE_BEFORE_START)
    );
    assert_eq!(
        form.error(Field::EmploymentEndDate),
        Some(messages::END_DATE_BEFORE_START)
    );
    assert!(exporter.seen.lock().unwrap().is_empty());
}

#[test]
fn config_fixture_drives_rounding_and_today() {
    let config = FormConfig::load(&fixture("form.toml")).unwrap();
    assert_eq!(config.calculation.rounding, RoundingPolicy::HalfEven);

    let mut form = LifeEventForm::new(&config);
    // Four years is exactly 1461 days, so this lands on 2.5.
    form.set_field(Field::AnnualGrossIncome, "0.625");
    form.set_field(Field::EmploymentStartDate, "2020-01-01");
    form.set_field(Field::EmploymentEndDate, "2023-12-31");

    assert_eq!(form.total_income(), 2);

    form.set_field(Field::EmploymentEndDate, "");
    form.set_field(Field::AnnualGrossIncome, "365250");
    form.set_field(Field::EmploymentStartDate, "2025-03-01");
    assert_eq!(form.total_income(), 10000);
}
