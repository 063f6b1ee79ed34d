//! WCPS command-line client.
//!
//! Builds a WCPS query from flags and either prints it (`--dry-run`) or
//! sends it to the configured endpoint:
//! - numeric results (CSV or no format) are printed comma-separated
//! - image results (PNG, JPEG) are written to `--output`, or to
//!   `wcps-result.<ext>` in the working directory

mod config;
mod query;

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use wcps_client::{Connection, ConnectionConfig};
use wcps_common::OutputFormat;
use wcps_query::{QueryBuilder, QueryResult};

use config::CliConfig;
use query::QueryOptions;

/// File name, without extension, for image results written without `--output`.
const DEFAULT_OUTPUT_STEM: &str = "wcps-result";

#[derive(Parser, Debug)]
#[command(name = "wcps")]
#[command(about = "Build and run WCPS queries against a coverage server")]
struct Args {
    /// WCPS endpoint URL
    #[arg(long, env = "WCPS_ENDPOINT")]
    endpoint: Option<String>,

    /// YAML configuration file
    #[arg(long, env = "WCPS_CONFIG")]
    config: Option<PathBuf>,

    /// Variable declaration, e.g. '$c in (AvgLandTemp)' (repeatable)
    #[arg(long = "var", required = true)]
    vars: Vec<String>,

    /// Subset as VAR=EXPR, e.g. '$c=ansi("2014-07")' (repeatable)
    #[arg(long = "subset")]
    subsets: Vec<String>,

    /// Filter condition for the where clause
    #[arg(long = "where")]
    filter: Option<String>,

    /// Aggregation: min, max, avg, sum or count
    #[arg(long)]
    aggregate: Option<String>,

    /// Condition scoping the aggregation
    #[arg(long)]
    condition: Option<String>,

    /// Transformation expression
    #[arg(long)]
    transform: Option<String>,

    /// Encoding expression over the bound variables
    #[arg(long, conflicts_with = "encode_literal")]
    encode: Option<String>,

    /// Literal value returned as-is
    #[arg(long)]
    encode_literal: Option<String>,

    /// Output format: CSV, PNG or JPEG
    #[arg(long)]
    format: Option<OutputFormat>,

    /// File for image output (default: wcps-result.png / wcps-result.jpg)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print the query text without sending it
    #[arg(long)]
    dry_run: bool,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);
    if args.json_logs {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    let file_config = match &args.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };

    let options = QueryOptions {
        variables: args.vars.clone(),
        subsets: args.subsets.clone(),
        filter: args.filter.clone(),
        aggregate: args.aggregate.clone(),
        condition: args.condition.clone(),
        transform: args.transform.clone(),
        encode: args.encode.clone(),
        encode_literal: args.encode_literal.clone(),
        format: args.format.or(file_config.format),
    };

    let connection_config = resolve_connection_config(&args, file_config.connection);
    let connection = Connection::from_config(&connection_config)
        .context("Failed to create connection")?;

    let mut query = QueryBuilder::new(&connection);
    options.apply(&mut query)?;

    if args.dry_run {
        println!("{}", query);
        return Ok(());
    }

    info!(endpoint = %connection.endpoint(), "Sending query");
    let result = query.execute().context("Query failed")?;

    match result {
        QueryResult::Values(values) => {
            let line = values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(",");
            println!("{}", line);
        }
        QueryResult::Image(bytes) => {
            let path = output_path(args.output.as_deref(), options.format)?;
            std::fs::write(&path, &bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), bytes = bytes.len(), "Wrote image");
        }
    }

    Ok(())
}

/// `--output` if given, else `wcps-result.<ext>` for the image format.
fn output_path(output: Option<&Path>, format: Option<OutputFormat>) -> Result<PathBuf> {
    match (output, format) {
        (Some(path), _) => Ok(path.to_path_buf()),
        (None, Some(format)) => Ok(PathBuf::from(format!(
            "{}.{}",
            DEFAULT_OUTPUT_STEM,
            format.extension()
        ))),
        (None, None) => Err(anyhow!("image results need --output")),
    }
}

/// Flag beats environment beats file. A dry run without any endpoint uses a
/// placeholder since nothing is sent.
fn resolve_connection_config(args: &Args, file: ConnectionConfig) -> ConnectionConfig {
    let mut config = file.merge_env();
    if let Some(endpoint) = &args.endpoint {
        config.endpoint = endpoint.clone();
    }
    if config.endpoint.is_empty() && args.dry_run {
        config.endpoint = "http://localhost/".to_string();
    }
    config
}
