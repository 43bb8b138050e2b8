// Copyright (c) 2026 NE-AI Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Decision history viewer

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use neai_cortex::HistoryLog;

use crate::engine::{load_config, open_stores};

#[derive(Args)]
pub struct HistoryCommand {
    /// Number of most recent entries to show
    #[arg(short, long, default_value = "20")]
    pub limit: usize,

    /// Print raw JSON instead of one line per entry
    #[arg(long)]
    pub json: bool,
}

pub async fn execute(command: HistoryCommand, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    let (_, history) = open_stores(&config).await?;
    let entries = history.recent(command.limit).await?;

    if command.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("{}", "History is empty".dimmed());
        return Ok(());
    }

    for entry in entries {
        println!(
            "{}  {:<24} {}",
            entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string().dimmed(),
            entry.event_type.bold(),
            entry.payload
        );
    }

    Ok(())
}
