//! Clinic record keeper: interactive shell
//!
//! Loads the last snapshot, then runs the numbered menu on stdin/stdout until
//! the operator chooses Exit. Logs go to stderr.
//!
//! Usage:
//!   cargo run -p clinic-shell
//!   cargo run -p clinic-shell -- --config clinic.toml
//!   cargo run -p clinic-shell -- --data-file /tmp/records.json --merge-on-load
//!   RUST_LOG=info cargo run -p clinic-shell -- --no-persist

mod shell;

use std::io;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use clinic_config::ClinicConfig;
use clinic_contracts::{error::ClinicResult, persistence::LoadMode};
use clinic_core::{load_into, RecordStore, SnapshotStore};
use clinic_persist::{InMemorySnapshotStore, JsonFileSnapshotStore};

use crate::shell::Shell;

// ── CLI definition ────────────────────────────────────────────────────────────

/// Menu-driven record keeping for a small clinic.
#[derive(Parser)]
#[command(
    name = "clinic",
    about = "Menu-driven clinic record keeper",
    long_about = "Registers patients and staff, books appointments, appends health-record\n\
                  notes, tracks charges and inventory, and saves everything to one file."
)]
struct Cli {
    /// TOML configuration file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Snapshot file to load from and save to (overrides the config).
    #[arg(long, value_name = "PATH")]
    data_file: Option<PathBuf>,

    /// Merge the snapshot into the store instead of replacing it.
    #[arg(long)]
    merge_on_load: bool,

    /// Start empty without reading the snapshot file.
    #[arg(long)]
    no_load: bool,

    /// Keep saves in memory only; never read or write the snapshot file.
    #[arg(long, conflicts_with_all = ["data_file", "no_load"])]
    no_persist: bool,
}

impl Cli {
    fn skips_load(&self) -> bool {
        self.no_load || self.no_persist
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Logs go to stderr so they never interleave with prompts.
    // Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let snapshots = open_snapshots(&cli, &config);

    let mut store = RecordStore::new();
    if cli.skips_load() {
        info!("skipping snapshot load");
    } else if let Err(e) = load_into(&mut store, snapshots.as_ref(), config.load_mode) {
        // A bad snapshot never stops the session; start empty instead.
        eprintln!("Could not load saved data ({}). Starting with no records.", e);
    }

    let mut shell = Shell::new(store, snapshots, &config);
    let stdin = io::stdin();
    let stdout = io::stdout();

    if let Err(e) = shell.run(stdin.lock(), stdout.lock()) {
        eprintln!("Terminal error: {}", e);
        std::process::exit(1);
    }
}

/// Build the effective config: file (if any), then command-line overrides.
fn resolve_config(cli: &Cli) -> ClinicResult<ClinicConfig> {
    let mut config = match &cli.config {
        Some(path) => ClinicConfig::from_file(path)?,
        None => ClinicConfig::default(),
    };
    if let Some(path) = &cli.data_file {
        config.data_file = path.clone();
    }
    if cli.merge_on_load {
        config.load_mode = LoadMode::Merge;
    }
    Ok(config)
}

/// The snapshot backend for this session.
fn open_snapshots(cli: &Cli, config: &ClinicConfig) -> Box<dyn SnapshotStore> {
    if cli.no_persist {
        Box::new(InMemorySnapshotStore::new())
    } else {
        Box::new(JsonFileSnapshotStore::new(&config.data_file))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
