use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use life_event_core::numbers::format_with_thousands_separators;
use life_event_core::{Field, LifeEventInput};
use life_event_form::config::{self, FormConfig};
use life_event_form::{Exporter, FileExporter, FormError, LifeEventForm, StdoutExporter, logging};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Records an employment life event.
///
/// Validates the form, shows the prorated total income earned over the
/// employment span, and exports the record as JSON.
#[derive(Debug, Parser)]
#[command(name = "life-event", version, about, long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level or filter directive; overrides the config file.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Append logs to this file; overrides the config file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the live total income for an income and date range.
    Total(TotalArgs),

    /// Validate a form and print any field errors.
    Validate(FormArgs),

    /// Validate a form, then export it with its total income.
    Submit(SubmitArgs),

    /// Print a number the way the income input displays it.
    Format {
        /// Raw or partially formatted number, e.g. `1234567.5`.
        value: String,
    },
}

#[derive(Debug, Args)]
struct TotalArgs {
    /// Annual gross income, separators allowed (e.g. `85,000`).
    #[arg(long)]
    income: String,

    /// Employment start date (YYYY-MM-DD).
    #[arg(long)]
    start: String,

    /// Employment end date (YYYY-MM-DD); defaults to today.
    #[arg(long, default_value = "")]
    end: String,

    /// Date treated as today for an open-ended span.
    #[arg(long)]
    today: Option<NaiveDate>,
}

#[derive(Debug, Args)]
struct FormArgs {
    /// TOML file with prefilled fields; flags below override it.
    #[arg(long)]
    input: Option<PathBuf>,

    #[arg(long)]
    employer: Option<String>,

    #[arg(long)]
    income: Option<String>,

    #[arg(long)]
    start: Option<String>,

    #[arg(long)]
    end: Option<String>,

    #[arg(long)]
    notes: Option<String>,

    /// Date treated as today for an open-ended span.
    #[arg(long)]
    today: Option<NaiveDate>,
}

#[derive(Debug, Args)]
struct SubmitArgs {
    #[command(flatten)]
    form: FormArgs,

    /// Directory to write the export to; overrides the config file.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Print the export instead of writing a file.
    #[arg(long, default_value_t = false)]
    stdout: bool,
}

impl FormArgs {
    /// The prefilled input file, if any, with flag values layered on top.
    fn to_input(&self) -> Result<LifeEventInput> {
        let mut input = match &self.input {
            Some(path) => config::load_input(path)?,
            None => LifeEventInput::new(),
        };

        let overrides = [
            (Field::EmployerName, &self.employer),
            (Field::AnnualGrossIncome, &self.income),
            (Field::EmploymentStartDate, &self.start),
            (Field::EmploymentEndDate, &self.end),
            (Field::Notes, &self.notes),
        ];
        for (field, value) in overrides {
            if let Some(value) = value {
                input.set(field, value.as_str());
            }
        }
        Ok(input)
    }

    fn to_form(
        &self,
        config: &FormConfig,
    ) -> Result<LifeEventForm> {
        let mut form = LifeEventForm::new(config);
        if let Some(today) = self.today {
            form = form.with_today(today);
        }
        form.fill(&self.to_input()?);
        Ok(form)
    }
}

// ─── commands ────────────────────────────────────────────────────────────────

fn print_field_errors(form: &LifeEventForm) {
    for (field, message) in form.errors().iter() {
        eprintln!("{:<24} {message}", field.label());
    }
}

fn run_total(
    args: &TotalArgs,
    config: &FormConfig,
) {
    let mut form = LifeEventForm::new(config);
    if let Some(today) = args.today {
        form = form.with_today(today);
    }
    form.set_field(Field::AnnualGrossIncome, &args.income);
    form.set_field(Field::EmploymentStartDate, &args.start);
    form.set_field(Field::EmploymentEndDate, &args.end);

    println!("{}", form.total_income_display());
}

fn run_validate(
    args: &FormArgs,
    config: &FormConfig,
) -> Result<()> {
    let mut form = args.to_form(config)?;
    match form.validate() {
        Ok(_) => {
            println!("valid (total income {})", form.total_income_display());
            Ok(())
        }
        Err(errors) => {
            print_field_errors(&form);
            bail!("{} field(s) failed validation", errors.len())
        }
    }
}

async fn run_submit(
    args: &SubmitArgs,
    config: &FormConfig,
) -> Result<()> {
    let mut form = args.form.to_form(config)?;

    let exporter: Box<dyn Exporter> = if args.stdout {
        Box::new(StdoutExporter)
    } else {
        let output_dir = args
            .output_dir
            .clone()
            .unwrap_or_else(|| config.export.output_dir.clone());
        Box::new(FileExporter::new(output_dir))
    };

    match form.submit(exporter.as_ref()).await {
        Ok(receipt) => {
            if let Some(path) = receipt.path {
                println!("Exported {} ({} bytes)", path.display(), receipt.bytes);
            }
            Ok(())
        }
        Err(FormError::Invalid(errors)) => {
            print_field_errors(&form);
            bail!("{} field(s) failed validation", errors.len())
        }
        Err(e) => Err(e).context("failed to export life event"),
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = FormConfig::load_or_default(cli.config.as_deref())
        .context("failed to load configuration")?;
    if let Some(file) = &cli.log_file {
        config.logging.file = Some(file.clone());
    }
    logging::init_logging(&config.logging, cli.log_level.as_deref())
        .context("failed to initialize logging")?;
    debug!(?config, "configuration loaded");

    match &cli.command {
        Command::Total(args) => run_total(args, &config),
        Command::Validate(args) => run_validate(args, &config)?,
        Command::Submit(args) => run_submit(args, &config).await?,
        Command::Format { value } => println!("{}", format_with_thousands_separators(value)),
    }

    Ok(())
}
