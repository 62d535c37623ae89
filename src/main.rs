//! Prenatal Calc - pregnancy, fertility and prenatal health calculators.
//!
//! Reads one calculator request as JSON (from a file or stdin), runs it and
//! prints the JSON response on stdout. Logs go to stderr.
//!
//! # Example
//!
//! ```text
//! echo '{"calculator":"due_date","lmp":"2024-01-01"}' | prenatal-calc --today 2024-03-01
//! ```
//!
//! # Configuration
//!
//! - `RUST_LOG`: log filter (default `prenatal_calc=info`)
//! - `PRENATAL_CALC_TODAY`: reference date, overridden by `--today`

use std::env;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::Parser;
use serde_json::json;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use prenatal_calc::CalcError;
use prenatal_calc::api::handle_json;
use prenatal_calc::dates::parse_date;

/// Environment variable that pins the reference date.
const TODAY_ENV: &str = "PRENATAL_CALC_TODAY";

#[derive(Parser)]
#[command(name = "prenatal-calc")]
#[command(version)]
#[command(about = "Run a pregnancy or health calculator on a JSON request", long_about = None)]
struct Cli {
    /// Request file (stdin if not specified)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Reference date as YYYY-MM-DD (defaults to today's local date)
    #[arg(short, long)]
    today: Option<String>,

    /// Pretty-print the JSON response
    #[arg(short, long)]
    pretty: bool,
}

fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(EnvFilter::from_default_env().add_directive("prenatal_calc=info".parse()?))
        .init();

    let cli = Cli::parse();

    let today = resolve_today(cli.today.as_deref())?;
    info!(%today, "Reference date");

    let body = match &cli.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read request file {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read request from stdin")?;
            buf
        }
    };
    debug!(bytes = body.len(), "Request read");

    let (output, code) = match handle_json(&body, today) {
        Ok(response) => (serde_json::to_value(response)?, ExitCode::SUCCESS),
        Err(e) => (error_body(&e), ExitCode::FAILURE),
    };

    let rendered = if cli.pretty {
        serde_json::to_string_pretty(&output)?
    } else {
        serde_json::to_string(&output)?
    };
    println!("{rendered}");

    Ok(code)
}

/// `--today` wins over the environment, which wins over the local date.
fn resolve_today(flag: Option<&str>) -> anyhow::Result<NaiveDate> {
    let configured = flag
        .map(str::to_string)
        .or_else(|| env::var(TODAY_ENV).ok());

    match configured {
        Some(value) => Ok(parse_date("today", &value)?),
        None => Ok(Local::now().date_naive()),
    }
}

fn error_body(error: &CalcError) -> serde_json::Value {
    match error {
        CalcError::Validation(report) => json!({
            "error": error.to_string(),
            "fields": report.errors,
        }),
        other => json!({ "error": other.to_string() }),
    }
}
