//! Serializing a submitted life event and handing it to an export sink.
//!
//! The payload is pretty-printed JSON with the record's fields in form order
//! followed by `totalIncome`, a whole-dollar currency string. Nothing
//! time-dependent is embedded, so the same record and total always produce
//! the same bytes.

use std::path::PathBuf;
use std::sync::LazyLock;

use async_trait::async_trait;
use life_event_core::LifeEventRecord;
use life_event_core::numbers::format_as_currency;
use serde::Serialize;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to serialize life event: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write to stdout: {0}")]
    Stdout(#[source] std::io::Error),
}

/// The exported document: the validated record plus its derived total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedLifeEvent {
    #[serde(flatten)]
    record: LifeEventRecord,
    total_income: String,
}

impl ExportedLifeEvent {
    pub fn new(
        record: LifeEventRecord,
        total_income: i64,
    ) -> Self {
        Self {
            record,
            total_income: format_as_currency(total_income),
        }
    }

    pub fn record(&self) -> &LifeEventRecord {
        &self.record
    }

    /// The currency-formatted total, e.g. `"$99,932"`.
    pub fn total_income(&self) -> &str {
        &self.total_income
    }

    /// `life-event-<employer>.json`, see [`export_file_name`].
    pub fn file_name(&self) -> String {
        export_file_name(self.record.employer_name())
    }

    /// Pretty-printed JSON with two-space indentation.
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

static WHITESPACE_RUN: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(r"\s+").expect("static pattern is valid"));

/// Builds the export filename for an employer.
///
/// Whitespace runs and path separators become `-`, then the name is
/// lowercased.
///
/// ```
/// use life_event_form::export::export_file_name;
///
/// assert_eq!(export_file_name("Acme  Corp"), "life-event-acme-corp.json");
/// ```
pub fn export_file_name(employer_name: &str) -> String {
    let hyphenated = WHITESPACE_RUN.replace_all(employer_name, "-");
    let safe: String = hyphenated
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '-' } else { c })
        .collect();
    format!("life-event-{}.json", safe.to_lowercase())
}

/// Where an export ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReceipt {
    pub file_name: String,
    /// Set when the payload was written to the filesystem.
    pub path: Option<PathBuf>,
    pub bytes: usize,
}

/// A destination for exported life events.
///
/// The form host calls this once per successful submission with the
/// filename and the serialized payload.
#[async_trait]
pub trait Exporter: Send + Sync {
    async fn export(
        &self,
        file_name: &str,
        payload: &str,
    ) -> Result<ExportReceipt, ExportError>;
}

/// Writes each export as a file in `output_dir`, creating it if needed.
///
/// An existing file with the same name is overwritten.
#[derive(Debug, Clone)]
pub struct FileExporter {
    output_dir: PathBuf,
}

impl FileExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &std::path::Path {
        &self.output_dir
    }
}

#[async_trait]
impl Exporter for FileExporter {
    async fn export(
        &self,
        file_name: &str,
        payload: &str,
    ) -> Result<ExportReceipt, ExportError> {
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|source| ExportError::Write {
                path: self.output_dir.clone(),
                source,
            })?;

        let path = self.output_dir.join(file_name);
        debug!(path = %path.display(), bytes = payload.len(), "writing life event export");
        tokio::fs::write(&path, payload)
            .await
            .map_err(|source| ExportError::Write {
                path: path.clone(),
                source,
            })?;

        info!(path = %path.display(), "life event exported");
        Ok(ExportReceipt {
            file_name: file_name.to_string(),
            path: Some(path),
            bytes: payload.len(),
        })
    }
}

/// Prints each export to stdout instead of writing a file.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutExporter;

#[async_trait]
impl Exporter for StdoutExporter {
    async fn export(
        &self,
        file_name: &str,
        payload: &str,
    ) -> Result<ExportReceipt, ExportError> {
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(payload.as_bytes())
            .await
            .map_err(ExportError::Stdout)?;
        stdout.write_all(b"\n").await.map_err(ExportError::Stdout)?;
        stdout.flush().await.map_err(ExportError::Stdout)?;

        Ok(ExportReceipt {
            file_name: file_name.to_string(),
            path: None,
            bytes: payload.len(),
        })
    }
}
