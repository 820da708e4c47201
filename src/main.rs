//! # todolist
//!
//! A terminal task list with deadlines. Add tasks, tick them off, edit or
//! delete them; anything past its deadline and not yet done is shown in red.
//! Tasks live for the session only.
//!
//! ## Usage
//!
//! ```bash
//! todolist            # same as `todolist ui`
//! todolist replay session.json --now "2024-01-02 09:00"
//! todolist replay session.json --json
//! todolist completions zsh
//! ```
//!
//! #### TUI Key Bindings
//!
//! *   `a`: Focus the "New Task" form (`Tab` switches field, `Enter` adds, `Esc` leaves)
//! *   `Space`: Toggle done
//! *   `e` / `Enter`: Edit selected task (`Enter` saves, `Esc` cancels)
//! *   `d`: Delete selected task
//! *   `j` / `k`: Move selection
//! *   `q`: Quit
//!
//! Deadlines are typed as `DD/MM/YYYY HH:MM`, `YYYY-MM-DD HH:MM` or
//! `YYYY-MM-DD`. Leave the field empty for no deadline.
//!
//! ## Replay scripts
//!
//! `replay` reads a JSON array of actions and prints the resulting list:
//!
//! ```json
//! [
//!   {"action": "add", "text": "Buy milk", "deadline": "2024-01-01T10:00:00"},
//!   {"action": "toggle", "id": 1}
//! ]
//! ```
//!
//! Ids are handed out from 1 in creation order.
//!
//! ## Logging
//!
//! Set `TODOLIST_LOG` to a tracing filter (e.g. `todolist=debug`) to write
//! logs to `--log-file`.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::EnvFilter;

use todolist::commands::cmd_replay;
use todolist::tui::run_tui;

#[derive(Parser)]
#[command(name = "todolist")]
#[command(about = "Task list with deadlines", long_about = None)]
struct Cli {
    /// Where to write logs when TODOLIST_LOG is set
    #[arg(long, global = true, default_value = "todolist.log")]
    log_file: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open interactive TUI
    Ui {
        /// Redraw interval in milliseconds
        #[arg(long, default_value_t = 1000)]
        tick_ms: u64,
    },
    /// Apply a JSON list of actions to an empty list and print the result
    Replay {
        /// Path to the actions file
        file: PathBuf,
        /// Pin the current time, e.g. "2024-01-02 09:00"
        #[arg(long)]
        now: Option<String>,
        /// Print the final state as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn init_logging(path: &Path) -> Result<()> {
    let Ok(filter) = std::env::var("TODOLIST_LOG") else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    match cli.command {
        Some(Commands::Replay { file, now, json }) => cmd_replay(&file, now, json, false),
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "todolist", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Ui { tick_ms }) => run_tui(Duration::from_millis(tick_ms)),
        None => run_tui(Duration::from_millis(1000)),
    }
}
