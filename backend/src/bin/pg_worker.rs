//! Worker binary that `pg_embedded_setup_unpriv` spawns when ledger
//! integration tests run as root.
//!
//! Usage: `pg_worker <setup|start|stop> <payload.json>`. The payload is a
//! serialised [`pg_embedded_setup_unpriv::worker::WorkerPayload`].

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use color_eyre::eyre::{Context, Report, Result};
use pg_embedded_setup_unpriv::worker::{PlainSecret, WorkerPayload};
use postgresql_embedded::PostgreSQL;
use tokio::runtime::Builder;

#[derive(Debug, Parser)]
#[command(name = "pg_worker", about = "Drive an embedded PostgreSQL lifecycle step")]
struct WorkerArgs {
    /// Lifecycle step to run.
    #[arg(value_enum)]
    operation: Operation,
    /// JSON payload describing settings and environment.
    config_path: PathBuf,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Operation {
    Setup,
    Start,
    Stop,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Setup => "setup",
            Self::Start => "start",
            Self::Stop => "stop",
        })
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = WorkerArgs::parse();
    let payload = load_payload(&args.config_path)?;
    execute(args.operation, payload)
}

fn load_payload(path: &Path) -> Result<WorkerPayload> {
    let raw = fs::read(path).with_context(|| format!("read worker payload {}", path.display()))?;
    serde_json::from_slice(&raw).with_context(|| format!("parse worker payload {}", path.display()))
}

fn execute(operation: Operation, payload: WorkerPayload) -> Result<()> {
    let settings = payload
        .settings
        .into_settings()
        .map_err(|err| Report::new(err).wrap_err("rebuild postgres settings"))?;
    apply_environment(payload.environment);

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("build worker runtime")?;

    let mut postgres = PostgreSQL::new(settings);
    runtime
        .block_on(async move {
            match operation {
                Operation::Setup => postgres.setup().await,
                Operation::Start => postgres.start().await,
                Operation::Stop => postgres.stop().await,
            }
        })
        .with_context(|| format!("embedded postgres {operation} failed"))
}

fn apply_environment(vars: Vec<(String, Option<PlainSecret>)>) {
    for (key, value) in vars {
        // SAFETY: runs on the main thread before the runtime starts.
        match value {
            Some(val) => unsafe { env::set_var(&key, val.expose()) },
            None => unsafe { env::remove_var(&key) },
        }
    }
}
