//! Generate or reset the sample pantry inventory in PostgreSQL.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::io;

use clap::{Parser, Subcommand};
use pantry_backend::outbound::StoreAdapters;
use pantry_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use pantry_backend::sample_data::{DEFAULT_SAMPLE_SEED, run_sample_data};
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// `pantry-sample-data` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pantry-sample-data",
    about = "Populate the pantry inventory with sample floors, pantries and dispensers",
    version
)]
struct CliArgs {
    #[command(subcommand)]
    command: Command,
    /// Database connection URL. Falls back to `PANTRY_DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url", global = true)]
    database_url: Option<String>,
    /// Seed for the deterministic generator.
    #[arg(long, value_name = "n", default_value_t = DEFAULT_SAMPLE_SEED, global = true)]
    seed: u64,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum Command {
    /// Replace the inventory with a generated tree.
    Generate,
    /// Delete the inventory and the sample user, then generate.
    Reset,
}

fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|error| io::Error::other(format!("create Tokio runtime: {error}")))?;
    runtime.block_on(async_main())
}

async fn async_main() -> io::Result<()> {
    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let database_url = resolve_database_url(args.database_url)?;
    run_pending_migrations(&database_url)
        .await
        .map_err(|error| io::Error::other(format!("apply migrations: {error}")))?;
    let pool = DbPool::new(PoolConfig::new(&database_url))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))?;

    let reset = matches!(args.command, Command::Reset);
    let outcome = run_sample_data(&StoreAdapters::postgres(&pool), args.seed, reset)
        .await
        .map_err(|error| io::Error::other(format!("seed sample data: {error}")))?;

    if reset {
        println!("Removed {} floors.", outcome.removed_floors);
    }
    println!(
        "Sample data generated: {} floors, {} pantries, {} dispensers.",
        outcome.floors, outcome.pantries, outcome.dispensers
    );
    Ok(())
}

fn resolve_database_url(cli_value: Option<String>) -> io::Result<String> {
    cli_value
        .or_else(|| env::var("PANTRY_DATABASE_URL").ok())
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                "--database-url or PANTRY_DATABASE_URL is required",
            )
        })
}
