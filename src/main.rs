//! ach_origination - NACHA file generator
//!
//! Reads a JSON batch, resolves its settlement date against the federal
//! holiday calendar, writes the NACHA file to the output directory and
//! advances the persisted file sequence. Stored files can be listed,
//! re-validated and marked as transmitted.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Datelike;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ach_origination::nacha::{FileSequenceStore, RandomTraceSource};
use ach_origination::workflow::DirectoryFileRepository;
use ach_origination::{
    AppError, BatchRequest, BusinessDayCalculator, Config, FileGenerationJob, NachaEncoder,
};

const USAGE: &str = "usage: ach_origination [--output-dir <dir>] \
    (--input <batch.json> | --list | --validate <file> | --mark-transmitted <file>)";

/// Initialize tracing/logging. Production logs are JSON lines.
fn init_tracing(json: bool) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ach_origination=info".into()),
        )
        .with(json.then(|| tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr)))
        .init();
}

enum Command {
    Generate(PathBuf),
    List,
    Validate(String),
    MarkTransmitted(String),
}

struct Args {
    command: Command,
    output_dir: Option<PathBuf>,
}

fn parse_args() -> anyhow::Result<Args> {
    let args: Vec<String> = std::env::args().collect();
    let value_of = |flag: &str| {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
            .cloned()
    };

    let command = if let Some(input) = value_of("--input") {
        Command::Generate(PathBuf::from(input))
    } else if let Some(filename) = value_of("--validate") {
        Command::Validate(filename)
    } else if let Some(filename) = value_of("--mark-transmitted") {
        Command::MarkTransmitted(filename)
    } else if args.iter().any(|a| a == "--list") {
        Command::List
    } else {
        anyhow::bail!(USAGE);
    };

    Ok(Args {
        command,
        output_dir: value_of("--output-dir").map(PathBuf::from),
    })
}

fn report_failure(e: AppError) -> anyhow::Error {
    tracing::error!(
        code = e.error_code(),
        client_error = e.is_client_error(),
        retryable = e.is_retryable(),
        error = %e,
        "Command failed"
    );
    e.into()
}

fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(config.is_production());

    let args = parse_args()?;

    let request = match &args.command {
        Command::Generate(input) => {
            let json = std::fs::read_to_string(input)?;
            Some(BatchRequest::from_json(&json)?.into_file_request()?)
        }
        _ => None,
    };

    // Credits can settle into the following year
    let year = request
        .as_ref()
        .map(|r| r.requested_date.year())
        .unwrap_or_else(|| chrono::Local::now().year());
    let calendar = BusinessDayCalculator::for_years([year, year + 1])?
        .with_additional_holidays(config.additional_holidays.iter().copied());

    let encoder = Arc::new(NachaEncoder::new(
        config.profile(),
        Arc::new(FileSequenceStore::new(&config.sequence_file)),
        Arc::new(RandomTraceSource),
    ));
    let output_dir = args.output_dir.unwrap_or_else(|| config.output_dir.clone());
    let repository = Arc::new(DirectoryFileRepository::new(output_dir));

    tracing::info!(
        environment = %config.environment,
        output_dir = %repository.directory().display(),
        "Starting ach_origination"
    );

    let job = FileGenerationJob::new(calendar, encoder, repository);

    let output = match (args.command, request) {
        (Command::Generate(_), Some(request)) => {
            let result = job.run(&request).map_err(report_failure)?;
            serde_json::json!({
                "file": result.file.summary(),
                "content_sha256": result.file.content_sha256,
                "file_id_modifier": result.file.file_id_modifier,
                "next_sequence": result.next_sequence,
                "warnings": result.warnings,
            })
        }
        (Command::Validate(filename), _) => {
            let report = job.validate_stored(&filename).map_err(report_failure)?;
            serde_json::to_value(report)?
        }
        (Command::MarkTransmitted(filename), _) => {
            let summary = job.mark_transmitted(&filename).map_err(report_failure)?;
            serde_json::to_value(summary)?
        }
        (Command::List, _) | (Command::Generate(_), None) => {
            serde_json::to_value(job.stored().map_err(report_failure)?)?
        }
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
