//! CLI entry point for tasktrack.

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgGroup, Parser, Subcommand, ValueEnum};
use tasktrack_app::AppConfig;
use tasktrack_core::{StatusFilter, TaskId, TaskStatus};
use time::OffsetDateTime;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod commands;
mod view;

/// Personal to-do tracker.
#[derive(Parser, Debug)]
#[command(name = "tasktrack", version, about = "tasktrack: a personal task tracker")]
struct Cli {
    /// Directory holding the task data (overrides the config file).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Configuration file (defaults to <config dir>/tasktrack/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new task.
    #[command(group(ArgGroup::new("deadline").args(["due", "no_due"])))]
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Due date (RFC 3339 or YYYY-MM-DD); defaults to now.
        #[arg(long)]
        due: Option<String>,
        /// Create the task without a due date.
        #[arg(long)]
        no_due: bool,
    },

    /// Start a task, or pause it when already started.
    Start { id: TaskId },

    /// Mark a task as completed.
    Complete { id: TaskId },

    /// Edit a task. Omitted fields keep their value; the due date is always written.
    #[command(group(ArgGroup::new("deadline").args(["due", "no_due"]).required(true)))]
    Edit {
        id: TaskId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long, value_parser = parse_status)]
        status: Option<TaskStatus>,
        /// New due date (RFC 3339 or YYYY-MM-DD).
        #[arg(long)]
        due: Option<String>,
        /// Clear the due date.
        #[arg(long)]
        no_due: bool,
    },

    /// Delete a task.
    Delete { id: TaskId },

    /// List tasks visible under a filter.
    Ls {
        /// all, in-progress, completed or overdue (alias: list).
        #[arg(short, long)]
        filter: Option<StatusFilter>,
        #[arg(long, value_enum, default_value_t = LsFormat::Table)]
        format: LsFormat,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum LsFormat {
    Table,
    Json,
}

fn parse_status(raw: &str) -> Result<TaskStatus, String> {
    TaskStatus::from_token(raw)
        .ok_or_else(|| format!("unknown status '{raw}' (expected not-started, started or completed)"))
}

fn main() -> Result<()> {
    let Cli {
        data_dir,
        config,
        cmd,
    } = Cli::parse();

    // Resolve the local offset before anything else could spawn threads.
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    install_tracing();

    let config = AppConfig::load(config.as_deref())?;
    let mut store = config.open_store(data_dir.as_deref())?;
    let mut out = io::stdout().lock();
    commands::run(cmd, &mut store, &config, now, &mut out)
}

fn install_tracing() {
    // RUST_LOG controls verbosity; defaults to INFO. Logs go to stderr so JSON output stays clean.
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_span_events(FmtSpan::NONE)
        .compact()
        .try_init();
}
