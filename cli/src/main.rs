// Copyright (c) 2026 NE-AI Contributors
// SPDX-License-Identifier: AGPL-3.0

//! # NE-AI CLI
//!
//! The `neai` binary hosts the cognition engine.
//!
//! ## Commands
//!
//! - `neai observe text|vector` - Run a single input through the decision policy
//! - `neai run` - Serve a JSON-lines stream of perceive/feedback/confirm requests
//! - `neai feedback` - Reinforce or weaken a stored memory
//! - `neai memory list|show` - Inspect stored knowledge
//! - `neai history` - Show recent decisions
//! - `neai config show|validate|generate` - Configuration management
//!
//! Logs go to stderr; stdout carries command output only.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use neai_cli::commands::{
    self, ConfigCommand, FeedbackCommand, HistoryCommand, MemoryCommand, ObserveCommand, RunCommand,
};

/// NE-AI - perceive, decide, remember
#[derive(Parser)]
#[command(name = "neai")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "NEAI_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "NEAI_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one input through the decision policy
    #[command(name = "observe")]
    Observe {
        #[command(subcommand)]
        command: ObserveCommand,
    },

    /// Process a JSON-lines request stream until EOF or Ctrl+C
    #[command(name = "run")]
    Run {
        #[command(flatten)]
        command: RunCommand,
    },

    /// Give feedback on a stored memory
    #[command(name = "feedback")]
    Feedback {
        #[command(flatten)]
        command: FeedbackCommand,
    },

    /// Inspect stored knowledge
    #[command(name = "memory")]
    Memory {
        #[command(subcommand)]
        command: MemoryCommand,
    },

    /// Show recent history entries
    #[command(name = "history")]
    History {
        #[command(flatten)]
        command: HistoryCommand,
    },

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_logging(&cli.log_level)?;

    match cli.command {
        Commands::Observe { command } => commands::observe::handle_command(command, cli.config).await,
        Commands::Run { command } => commands::run::execute(command, cli.config).await,
        Commands::Feedback { command } => commands::feedback::execute(command, cli.config).await,
        Commands::Memory { command } => commands::memory::handle_command(command, cli.config).await,
        Commands::History { command } => commands::history::execute(command, cli.config).await,
        Commands::Config { command } => commands::config::handle_command(command, cli.config).await,
    }
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    Ok(())
}
