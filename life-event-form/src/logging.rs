//! Tracing setup for the form host.
//!
//! One registry with a reloadable level filter feeding two layers: stdout
//! (colored on a terminal, switchable at runtime) and an optional log file
//! that can be attached after startup.

use std::{
    fs::File,
    io::{self, IsTerminal, Write},
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError},
};

use chrono::Local;
use thiserror::Error;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{
        FmtContext, MakeWriter,
        format::{FormatEvent, FormatFields, Writer},
    },
    layer::SubscriberExt,
    registry::LookupSpan,
    reload,
    util::SubscriberInitExt,
};

use crate::config::LoggingConfig;

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("logging not yet initialized")]
    NotInitialized,

    #[error("invalid log level '{level}': {message}")]
    InvalidLevel { level: String, message: String },

    #[error("filter reload failed: {0}")]
    Reload(String),

    #[error("cannot open log file '{path}': {source}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// `2025-03-10T09:30:00.123456-05:00  INFO form.rs:42 message key=value`
struct LocalTimeFormat;

impl<S, N> FormatEvent<S, N> for LocalTimeFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> std::fmt::Result {
        let meta = event.metadata();
        let ansi = writer.has_ansi_escapes();
        let timestamp = Local::now().format("%Y-%m-%dT%H:%M:%S%.6f%:z");

        if ansi {
            let color = match *meta.level() {
                Level::ERROR => "1;31",
                Level::WARN => "1;33",
                Level::INFO => "1;32",
                Level::DEBUG => "1;34",
                Level::TRACE => "1;35",
            };
            write!(writer, "\x1b[2m{timestamp}\x1b[0m \x1b[{color}m{:>5}\x1b[0m ", meta.level())?;
        } else {
            write!(writer, "{timestamp} {:>5} ", meta.level())?;
        }

        let file = meta.file().map(|f| {
            f.strip_prefix("src/")
                .or_else(|| f.strip_prefix("src\\"))
                .unwrap_or(f)
        });
        if let (Some(file), Some(line)) = (file, meta.line()) {
            if ansi {
                write!(writer, "\x1b[36m{file}:{line}\x1b[0m ")?;
            } else {
                write!(writer, "{file}:{line} ")?;
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

type SharedFile = Arc<Mutex<Option<File>>>;

/// A writer that can be pointed at a file after the subscriber is built.
/// Writes are dropped while no file is attached.
#[derive(Clone)]
struct FileSlot(SharedFile);

struct SlotWriter<'a>(MutexGuard<'a, Option<File>>);

impl Write for SlotWriter<'_> {
    fn write(
        &mut self,
        buf: &[u8],
    ) -> io::Result<usize> {
        match &mut *self.0 {
            Some(f) => f.write(buf),
            None => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match &mut *self.0 {
            Some(f) => f.flush(),
            None => Ok(()),
        }
    }
}

impl<'a> MakeWriter<'a> for FileSlot {
    type Writer = SlotWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        SlotWriter(lock(&self.0))
    }
}

fn lock(file: &SharedFile) -> MutexGuard<'_, Option<File>> {
    file.lock().unwrap_or_else(PoisonError::into_inner)
}

type SetLevelFn = Box<dyn Fn(&str) -> Result<(), LoggingError> + Send + Sync>;
type SetStdoutFn = Box<dyn Fn(bool) -> Result<(), LoggingError> + Send + Sync>;

static SET_LEVEL: OnceLock<SetLevelFn> = OnceLock::new();
static SET_STDOUT: OnceLock<SetStdoutFn> = OnceLock::new();
static FILE_SLOT: OnceLock<SharedFile> = OnceLock::new();

fn parse_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    EnvFilter::try_new(level).map_err(|e| LoggingError::InvalidLevel {
        level: level.to_string(),
        message: e.to_string(),
    })
}

fn stdout_filter(enabled: bool) -> EnvFilter {
    // The level filter stays the ceiling; this only opens or closes stdout.
    EnvFilter::new(if enabled { "trace" } else { "off" })
}

fn store_level_handle<S>(handle: reload::Handle<EnvFilter, S>)
where
    S: Subscriber + Send + Sync + 'static,
{
    let _ = SET_LEVEL.set(Box::new(move |value: &str| {
        let filter = parse_filter(value)?;
        handle
            .reload(filter)
            .map_err(|e| LoggingError::Reload(e.to_string()))
    }));
}

fn store_stdout_handle<S>(handle: reload::Handle<EnvFilter, S>)
where
    S: Subscriber + Send + Sync + 'static,
{
    let _ = SET_STDOUT.set(Box::new(move |enabled: bool| {
        handle
            .reload(stdout_filter(enabled))
            .map_err(|e| LoggingError::Reload(e.to_string()))
    }));
}

/// Picks the starting filter: an explicit override, then a valid `RUST_LOG`,
/// then the configured level.
fn initial_filter(
    level_override: Option<&str>,
    env: Option<&str>,
    config_level: &str,
) -> Result<EnvFilter, LoggingError> {
    if let Some(level) = level_override {
        return parse_filter(level);
    }
    match env.map(parse_filter) {
        Some(Ok(filter)) => Ok(filter),
        _ => parse_filter(config_level),
    }
}

/// Installs the global subscriber described by `config`.
///
/// `level_override` (the command line's `--log-level`) beats `RUST_LOG`,
/// which beats `config.level`. Calling this more than once leaves the first
/// subscriber in place.
pub fn init_logging(
    config: &LoggingConfig,
    level_override: Option<&str>,
) -> Result<(), LoggingError> {
    let env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let level = initial_filter(level_override, env.as_deref(), &config.level)?;

    let file_slot: SharedFile = Arc::new(Mutex::new(None));
    let _ = FILE_SLOT.set(file_slot.clone());

    let (level_filter, level_handle) = reload::Layer::new(level);
    let (stdout_gate, stdout_handle) = reload::Layer::new(stdout_filter(config.stdout));

    let stdout_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalTimeFormat)
        .with_ansi(io::stdout().is_terminal())
        .with_filter(stdout_gate);

    let file_layer = tracing_subscriber::fmt::layer()
        .event_format(LocalTimeFormat)
        .with_ansi(false)
        .with_writer(FileSlot(file_slot));

    if tracing_subscriber::registry()
        .with(level_filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .is_ok()
    {
        store_level_handle(level_handle);
        store_stdout_handle(stdout_handle);
    }

    if let Some(path) = &config.file {
        enable_file_logging(path)?;
    }
    Ok(())
}

/// Changes the active filter. Accepts a bare level or any `EnvFilter` directive.
pub fn set_log_level(level: &str) -> Result<(), LoggingError> {
    let set_level = SET_LEVEL.get().ok_or(LoggingError::NotInitialized)?;
    set_level(level)
}

/// Shows or hides stdout output without affecting file logging.
pub fn set_stdout_enabled(enabled: bool) -> Result<(), LoggingError> {
    let set_stdout = SET_STDOUT.get().ok_or(LoggingError::NotInitialized)?;
    set_stdout(enabled)
}

/// Starts appending log records to `path`, replacing any open log file.
/// The parent directory must exist.
pub fn enable_file_logging(path: &Path) -> Result<(), LoggingError> {
    let slot = FILE_SLOT.get().ok_or(LoggingError::NotInitialized)?;
    let file = File::options()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LoggingError::OpenFile {
            path: path.to_path_buf(),
            source,
        })?;
    *lock(slot) = Some(file);
    Ok(())
}

/// Detaches the log file. Later records go to stdout only.
pub fn disable_file_logging() {
    if let Some(slot) = FILE_SLOT.get() {
        *lock(slot) = None;
    }
}
