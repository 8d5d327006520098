// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! `netcup-dns` - manage individual DNS records in netcup-hosted zones.
//!
//! Credentials are read from `NETCUP_API_KEY`, `NETCUP_API_PASSWORD` and
//! `NETCUP_CUSTOMER_ID`; `NETCUP_ENDPOINT` optionally overrides the API
//! endpoint. Results are printed to stdout as JSON, logs go to stderr.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use netcup_dns::config::ProviderConfig;
use netcup_dns::constants::TOKIO_WORKER_THREADS;
use netcup_dns::reconcilers::DnsRecordReconciler;
use netcup_dns::record::{DesiredRecord, ReconciledState};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Parser)]
#[command(name = "netcup-dns", version, about = "Manage DNS records in netcup-hosted zones")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Normalize and validate a record without contacting the API
    Check(RecordArgs),

    /// Create a record and print its identifier and state
    Create {
        #[command(flatten)]
        record: RecordArgs,
        /// Validate and print a placeholder result without contacting the API
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the current state of a record
    Read {
        /// Composite identifier `domain:recordID`
        id: String,
    },

    /// Modify a record in place
    Update {
        /// Composite identifier `domain:recordID`
        id: String,
        #[command(flatten)]
        record: RecordArgs,
        /// Print the projected state without contacting the API
        #[arg(long)]
        dry_run: bool,
    },

    /// Delete a record
    Delete {
        /// Composite identifier `domain:recordID`
        id: String,
    },

    /// Compare a record against previously saved state
    Diff {
        /// JSON file holding the saved state
        #[arg(long)]
        state: PathBuf,
        #[command(flatten)]
        record: RecordArgs,
    },
}

#[derive(Debug, Args)]
struct RecordArgs {
    /// Zone the record belongs to
    #[arg(long)]
    domain: String,
    /// Hostname relative to the zone, `@` for the apex
    #[arg(long, default_value = "@")]
    name: String,
    /// Record type (A, AAAA, MX, CNAME, ...)
    #[arg(long = "type")]
    record_type: String,
    /// Destination value
    #[arg(long)]
    value: String,
    /// Priority, required for MX and SRV
    #[arg(long)]
    priority: Option<String>,
}

impl From<RecordArgs> for DesiredRecord {
    fn from(args: RecordArgs) -> Self {
        Self {
            domain: args.domain,
            name: args.name,
            record_type: args.record_type,
            value: args.value,
            priority: args.priority,
        }
    }
}

fn main() -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(TOKIO_WORKER_THREADS)
        .thread_name("netcup-dns")
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

async fn async_main() -> Result<()> {
    initialize_logging();

    let cli = Cli::parse();
    debug!(command = ?cli.command, "Parsed command line");

    run(cli.command).await
}

/// Initialize tracing.
///
/// Respects `RUST_LOG` for filtering and `RUST_LOG_FORMAT=json` for
/// structured output.
fn initialize_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_file(true)
                .with_line_number(true)
                .with_thread_names(true)
                .with_target(false)
                .with_ansi(true)
                .compact()
                .init();
        }
    }
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Check(record) => {
            let response = offline_reconciler()?.check(record.into());
            print_json(&response)?;
            if !response.is_valid() {
                bail!("{} validation failure(s)", response.failures.len());
            }
        }
        Command::Create { record, dry_run } => {
            let response = connect(dry_run)?.create(record.into(), dry_run).await?;
            print_json(&response)?;
        }
        Command::Read { id } => {
            let response = connect(false)?.read(&id).await?;
            if response.is_none() {
                info!(id = %id, "DNS record no longer exists");
            }
            print_json(&response)?;
        }
        Command::Update {
            id,
            record,
            dry_run,
        } => {
            let state = connect(dry_run)?
                .update(&id, record.into(), dry_run)
                .await?;
            print_json(&state)?;
        }
        Command::Delete { id } => {
            let outcome = connect(false)?.delete(&id).await?;
            print_json(&outcome)?;
        }
        Command::Diff { state, record } => {
            let saved = load_state(&state).await?;
            let reconciler = offline_reconciler()?;
            let desired = reconciler.check(record.into()).inputs;
            print_json(&reconciler.diff(&desired, &saved))?;
        }
    }
    Ok(())
}

/// Reconciler backed by the real API, configured from the environment.
///
/// Dry runs never contact the API, so placeholder credentials are accepted.
fn connect(dry_run: bool) -> Result<DnsRecordReconciler> {
    if dry_run {
        return offline_reconciler();
    }
    let config = ProviderConfig::from_env().context("Failed to load provider configuration")?;
    info!(endpoint = %config.endpoint, customer_id = %config.customer_id, "Using netcup API");
    Ok(DnsRecordReconciler::from_config(&config)?)
}

/// Reconciler for operations that never reach the API.
fn offline_reconciler() -> Result<DnsRecordReconciler> {
    let config = ProviderConfig::new("offline", "offline", "offline");
    Ok(DnsRecordReconciler::from_config(&config)?)
}

async fn load_state(path: &Path) -> Result<ReconciledState> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read state file {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse state file {}", path.display()))
}

/// Render a command result. An absent record renders as `null`.
fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", to_json(value)?);
    Ok(())
}
