//! p4rt-replication-check - P4RT packet replication table tool
//!
//! Dumps, programs, and verifies the packet replication entries that P4RT
//! writes into APPL_DB.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use sonic_p4rt_replication::snapshot::{read_snapshot, render_snapshot};
use sonic_p4rt_replication::{
    append_update, compare_entries_labeled, load_all, AppDbTable, RedisDatabase, RedisTable,
    ReplicationConfig, SourceLabels, UpdateType,
};

/// Exit code when APPL_DB and the cache disagree.
const EXIT_MISMATCH: u8 = 1;
/// Exit code for operational errors.
const EXIT_ERROR: u8 = 2;

/// P4RT packet replication APPL_DB tool
#[derive(Parser, Debug)]
#[command(name = "p4rt-replication-check")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML configuration file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Redis server host
    #[arg(long)]
    redis_host: Option<String>,

    /// Redis server port
    #[arg(long)]
    redis_port: Option<u16>,

    /// Redis database index for APPL_DB
    #[arg(long)]
    appl_db: Option<u8>,

    /// APPL_DB table holding P4RT entries
    #[arg(long)]
    table: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short = 'l', long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every packet replication entry in APPL_DB as JSON
    Dump,

    /// Compare APPL_DB against a packet replication cache snapshot
    Check {
        /// JSON snapshot of the cached entries
        #[arg(long)]
        cache: PathBuf,
    },

    /// Write entries from a JSON snapshot into APPL_DB
    Apply {
        /// JSON snapshot of the entries to program
        #[arg(long)]
        entries: PathBuf,

        /// Update type (insert, modify, delete)
        #[arg(long, value_parser = parse_update_type)]
        op: UpdateType,
    },
}

fn parse_update_type(s: &str) -> std::result::Result<UpdateType, String> {
    UpdateType::parse(s).ok_or_else(|| format!("unknown update type '{}'", s))
}

/// Initializes structured logging on stderr.
///
/// RUST_LOG takes precedence over `log_level`.
fn init_logging(log_level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

fn build_config(args: &Args) -> Result<ReplicationConfig> {
    let mut config = match &args.config {
        Some(path) => ReplicationConfig::from_file(path)?,
        None => ReplicationConfig::default(),
    };

    if let Some(host) = &args.redis_host {
        config = config.with_redis_host(host.clone());
    }
    if let Some(port) = args.redis_port {
        config = config.with_redis_port(port);
    }
    if let Some(db) = args.appl_db {
        config = config.with_db(db);
    }
    if let Some(table) = &args.table {
        config = config.with_table_name(table.clone());
    }
    if let Some(level) = &args.log_level {
        config = config.with_log_level(level.clone());
    }

    Ok(config)
}

async fn open_table(config: &ReplicationConfig) -> Result<RedisTable> {
    let db = RedisDatabase::connect(config.redis.clone())
        .await
        .with_context(|| format!("connecting to {}", config.redis.uri()))?;
    Ok(db.table(config.table_name.clone()))
}

async fn dump(table: &mut RedisTable) -> Result<u8> {
    let entries = load_all(table).await.context("loading APPL_DB")?;
    println!("{}", render_snapshot(&entries)?);
    Ok(0)
}

async fn check(table: &mut RedisTable, cache: PathBuf) -> Result<u8> {
    let app_db = load_all(table).await.context("loading APPL_DB")?;
    let cached = read_snapshot(&cache)?;

    let failures = compare_entries_labeled(&app_db, &cached, &SourceLabels::app_db_and_cache());
    for failure in &failures {
        println!("{}", failure);
    }

    if failures.is_empty() {
        info!(
            "APPL_DB and cache agree on {} packet replication entries",
            app_db.len()
        );
        Ok(0)
    } else {
        warn!("Found {} packet replication discrepancies", failures.len());
        Ok(EXIT_MISMATCH)
    }
}

async fn apply(table: &mut RedisTable, entries: PathBuf, op: UpdateType) -> Result<u8> {
    let entries = read_snapshot(&entries)?;

    let mut updates = Vec::with_capacity(entries.len());
    for entry in &entries {
        let key = append_update(entry, op, &mut updates)?;
        info!("{} {}", op, key);
    }

    table
        .apply_all(&updates)
        .await
        .context("writing APPL_DB")?;
    info!("Applied {} packet replication updates", updates.len());
    Ok(0)
}

async fn run(args: Args, config: ReplicationConfig) -> Result<u8> {
    let mut table = open_table(&config).await?;

    match args.command {
        Command::Dump => dump(&mut table).await,
        Command::Check { cache } => check(&mut table, cache).await,
        Command::Apply { entries, op } => apply(&mut table, entries, op).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match build_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("p4rt-replication-check: {:#}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    init_logging(&config.log_level);
    info!(
        "Using {} table {}",
        config.redis.uri(),
        config.table_name
    );

    match run(args, config).await {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(EXIT_ERROR)
        }
    }
}
