//! Codetrace CLI - Command-line interface for session feature extraction
//!
//! Commands:
//! - extract: Turn a manifest of session logs into a feature table
//! - validate: Check the entries of one session log
//! - schema: Print the input vocabulary or the output columns

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use codetrace::config::DEFAULT_CONFIG_FILE;
use codetrace::encoder::{FeatureTableEncoder, OutputFormat};
use codetrace::schema::{
    EventValidator, ACTION_ERROR, ACTION_RUN, AUTOCOMPLETE_PREFIX, BACKSPACE_MARKER,
    FIELD_ERROR_DETAIL, KEYSTROKE_PREFIX, MENU_CLICK_PREFIX, REQUIRED_FIELDS,
};
use codetrace::{
    logging, ExtractorConfig, FeatureMatrixBuilder, FeatureScaler, SessionLoader,
    CODETRACE_VERSION, FEATURE_NAMES, SCHEMA_VERSION,
};
use tracing::info;

/// Codetrace - Per-session behavioral features from IDE event logs
#[derive(Parser)]
#[command(name = "codetrace")]
#[command(version = CODETRACE_VERSION)]
#[command(about = "Extract per-session feature vectors from programming-session logs")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file (JSON); defaults to ./codetrace.json when present
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract the feature table from a manifest of session logs
    Extract {
        /// Manifest file: JSON object of student id -> session log paths
        #[arg(short, long)]
        manifest: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Output format
        #[arg(long, default_value = "ndjson")]
        format: FormatArg,

        /// Process sessions one at a time instead of on the worker pool
        #[arg(long)]
        sequential: bool,

        /// Fit a standardization scaler on the table and save it here
        #[arg(long)]
        fit_scaler: Option<PathBuf>,
    },

    /// Validate the entries of one session log
    Validate {
        /// Session log path (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print schema information
    Schema {
        /// Schema to print (input or output)
        #[arg(value_enum)]
        schema_type: SchemaType,
    },
}

#[derive(Clone, ValueEnum)]
enum FormatArg {
    /// Newline-delimited JSON (one feature row per line)
    Ndjson,
    /// JSON table envelope
    Json,
    /// Pretty-printed JSON table envelope
    JsonPretty,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Ndjson => OutputFormat::Ndjson,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::JsonPretty => OutputFormat::JsonPretty,
        }
    }
}

#[derive(Clone, ValueEnum)]
enum SchemaType {
    /// Input schema (session log entries)
    Input,
    /// Output schema (feature table columns)
    Output,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CodetraceCliError> {
    let config = match &cli.config {
        Some(path) => ExtractorConfig::load(path)?,
        None => ExtractorConfig::load_or_default(Path::new(DEFAULT_CONFIG_FILE))?,
    };
    logging::init(&config.log);

    match cli.command {
        Commands::Extract {
            manifest,
            output,
            format,
            sequential,
            fit_scaler,
        } => cmd_extract(
            &config,
            &manifest,
            &output,
            format.into(),
            sequential,
            fit_scaler.as_deref(),
        ),

        Commands::Validate { input, json } => cmd_validate(&input, json),

        Commands::Schema { schema_type } => {
            cmd_schema(schema_type);
            Ok(())
        }
    }
}

fn cmd_extract(
    config: &ExtractorConfig,
    manifest: &Path,
    output: &Path,
    format: OutputFormat,
    sequential: bool,
    fit_scaler: Option<&Path>,
) -> Result<(), CodetraceCliError> {
    let mut loader = SessionLoader::new();
    loader.load_manifest(manifest)?;

    if loader.session_count() == 0 {
        return Err(CodetraceCliError::NoSessions);
    }

    let builder =
        FeatureMatrixBuilder::from_config(config).with_parallel(config.parallel && !sequential);
    let rows = builder.build(&loader.preprocess());

    if rows.is_empty() {
        return Err(CodetraceCliError::NoValidSessions);
    }

    if let Some(scaler_path) = fit_scaler {
        let scaler = FeatureScaler::fit(&rows)?;
        fs::write(scaler_path, scaler.to_json()?)?;
        info!(path = %scaler_path.display(), samples = scaler.samples(), "scaler saved");
    }

    let encoded = FeatureTableEncoder::new().encode(&rows, format)?;

    if output.to_string_lossy() == "-" {
        print!("{}", encoded);
    } else {
        fs::write(output, encoded)?;
        info!(path = %output.display(), rows = rows.len(), "feature table written");
    }

    Ok(())
}

fn cmd_validate(input: &Path, json: bool) -> Result<(), CodetraceCliError> {
    let input_data = if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(input)?
    };

    let events = EventValidator::parse_session(&input_data)?;
    let failures = EventValidator::validate_events(&events);

    let report = ValidationReport {
        total_events: events.len(),
        valid_events: events.len() - failures.len(),
        invalid_events: failures.len(),
        errors: failures
            .iter()
            .map(|f| ValidationErrorDetail {
                index: f.index,
                error: f.error.to_string(),
            })
            .collect(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total events:   {}", report.total_events);
        println!("Valid events:   {}", report.valid_events);
        println!("Invalid events: {}", report.invalid_events);

        if !report.errors.is_empty() {
            println!("\nDropped entries:");
            for err in &report.errors {
                println!("  - index {}: {}", err.index, err.error);
            }
        }
    }

    // Dropping entries is normal; only a log with nothing usable fails
    if report.total_events > 0 && report.valid_events == 0 {
        Err(CodetraceCliError::NoValidEvents)
    } else {
        Ok(())
    }
}

fn cmd_schema(schema_type: SchemaType) {
    match schema_type {
        SchemaType::Input => {
            println!("Input Schema: {}", SCHEMA_VERSION);
            println!();
            println!("A session log is a JSON array of entries. Required fields:");
            for field in REQUIRED_FIELDS {
                println!("  - {}", field);
            }
            println!(
                "Optional: {} (error list on error reports and failed runs)",
                FIELD_ERROR_DETAIL
            );
            println!();
            println!("Action vocabulary:");
            println!("  \"{}\"            error report", ACTION_ERROR);
            println!("  \"{}\" run attempt", ACTION_RUN);
            println!(
                "  \"{}...\"     keystroke (backspace if it contains {})",
                KEYSTROKE_PREFIX, BACKSPACE_MARKER
            );
            println!("  \"{}...\"    autocomplete", AUTOCOMPLETE_PREFIX);
            println!("  \"{}: <concept>\" side-menu click", MENU_CLICK_PREFIX);
        }
        SchemaType::Output => {
            println!("Output: one row per session");
            println!();
            println!("  - student_id");
            println!("  - session_id");
            for name in FEATURE_NAMES {
                println!("  - {}", name);
            }
        }
    }
}

// Error types

#[derive(Debug)]
enum CodetraceCliError {
    Io(io::Error),
    Compute(codetrace::ComputeError),
    Json(serde_json::Error),
    NoSessions,
    NoValidSessions,
    NoValidEvents,
}

impl From<io::Error> for CodetraceCliError {
    fn from(e: io::Error) -> Self {
        CodetraceCliError::Io(e)
    }
}

impl From<codetrace::ComputeError> for CodetraceCliError {
    fn from(e: codetrace::ComputeError) -> Self {
        CodetraceCliError::Compute(e)
    }
}

impl From<serde_json::Error> for CodetraceCliError {
    fn from(e: serde_json::Error) -> Self {
        CodetraceCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<CodetraceCliError> for CliError {
    fn from(e: CodetraceCliError) -> Self {
        match e {
            CodetraceCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            CodetraceCliError::Compute(e) => CliError {
                code: "COMPUTE_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check the manifest, session logs and configuration".to_string()),
            },
            CodetraceCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax".to_string()),
            },
            CodetraceCliError::NoSessions => CliError {
                code: "NO_SESSIONS".to_string(),
                message: "Manifest lists no session logs".to_string(),
                hint: Some("Add at least one student with one session file".to_string()),
            },
            CodetraceCliError::NoValidSessions => CliError {
                code: "NO_VALID_SESSIONS".to_string(),
                message: "No session had a valid event".to_string(),
                hint: Some("Run 'codetrace validate' on the session logs".to_string()),
            },
            CodetraceCliError::NoValidEvents => CliError {
                code: "NO_VALID_EVENTS".to_string(),
                message: "Every entry of the session log was rejected".to_string(),
                hint: Some("Run 'codetrace schema input' for the expected fields".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct ValidationReport {
    total_events: usize,
    valid_events: usize,
    invalid_events: usize,
    errors: Vec<ValidationErrorDetail>,
}

#[derive(serde::Serialize)]
struct ValidationErrorDetail {
    index: usize,
    error: String,
}
