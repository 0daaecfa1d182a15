//! # Receipt Dump
//!
//! Fetches one day's receipts and prints them as JSON on stdout.
//!
//! ## Usage
//! ```bash
//! # Today, in the configured time zone
//! OFD_LOGIN=user@example.com OFD_PASSWORD=secret cargo run -p ofd-client --bin ofd-receipts
//!
//! # A specific day
//! cargo run -p ofd-client --bin ofd-receipts -- 2024-01-15
//!
//! # Explicit config file
//! cargo run -p ofd-client --bin ofd-receipts -- --config ./ofd.toml
//! ```
//!
//! Logs go to stderr. The exit code is 1 when the run was aborted; whatever
//! was collected before the failure is still printed.

use chrono::{NaiveDate, NaiveTime};
use ofd_client::{OfdClient, OfdConfig};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,ofd=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_usage() {
    println!("OFD Receipts");
    println!();
    println!("Usage: ofd-receipts [DATE] [OPTIONS]");
    println!();
    println!("Arguments:");
    println!("  DATE                 Day to fetch, YYYY-MM-DD (default: today)");
    println!();
    println!("Options:");
    println!("  -c, --config <PATH>  Config file (default: platform config dir)");
    println!("  -h, --help           Show this help message");
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let mut config_path: Option<PathBuf> = None;
    let mut day: Option<NaiveDate> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    config_path = Some(PathBuf::from(&args[i + 1]));
                    i += 1;
                }
            }
            "--help" | "-h" => {
                print_usage();
                return ExitCode::SUCCESS;
            }
            other => match NaiveDate::parse_from_str(other, "%Y-%m-%d") {
                Ok(date) => day = Some(date),
                Err(_) => {
                    eprintln!("Unrecognized argument: {}", other);
                    print_usage();
                    return ExitCode::from(2);
                }
            },
        }
        i += 1;
    }

    let config = match OfdConfig::load(config_path) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Cannot load configuration");
            return ExitCode::from(2);
        }
    };
    let offset = config.utc_offset();

    let client = match OfdClient::new(config) {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "Cannot create OFD client");
            return ExitCode::from(2);
        }
    };

    let result = match day {
        Some(day) => {
            let Some(date) = day
                .and_time(NaiveTime::MIN)
                .and_local_timezone(offset)
                .single()
            else {
                error!(%day, "Day has no start in the configured offset");
                return ExitCode::from(2);
            };
            info!(%day, "Fetching receipts");
            client.get_receipts(&date).await
        }
        None => {
            info!("Fetching today's receipts");
            client.get_receipts_today().await
        }
    };

    let (batch, code) = match result {
        Ok(batch) => (batch, ExitCode::SUCCESS),
        Err(aborted) => {
            error!(error = %aborted.source, "Run aborted, printing partial result");
            (aborted.partial, ExitCode::FAILURE)
        }
    };

    if batch.is_empty() {
        info!("No receipts for this day");
    }
    for warning in &batch.warnings {
        warn!(%warning, "Receipt warning");
    }

    match serde_json::to_string_pretty(&batch.receipts) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            error!(error = %e, "Cannot serialize receipts");
            return ExitCode::FAILURE;
        }
    }

    code
}
