// Copyright (c) 2026 NE-AI Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Knowledge inspection commands
//!
//! Commands: list, show

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use neai_cortex::{KnowledgeId, KnowledgeItem, KnowledgeRepository};

use crate::engine::{load_config, open_stores};

#[derive(Subcommand)]
pub enum MemoryCommand {
    /// List stored knowledge items
    List {
        /// Print raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show one knowledge item
    Show {
        #[arg(value_name = "ID")]
        id: String,
    },
}

pub async fn handle_command(command: MemoryCommand, config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config(config_path)?;
    let (repository, _) = open_stores(&config).await?;

    match command {
        MemoryCommand::List { json } => {
            let items = repository.all().await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                print_table(&items);
            }
        }
        MemoryCommand::Show { id } => {
            let id = KnowledgeId::from(id);
            match repository.find_by_id(&id).await? {
                Some(item) => println!("{}", serde_json::to_string_pretty(&item)?),
                None => anyhow::bail!("Unknown knowledge id: {}", id),
            }
        }
    }

    Ok(())
}

fn print_table(items: &[KnowledgeItem]) {
    if items.is_empty() {
        println!("{}", "No knowledge stored yet".dimmed());
        return;
    }

    println!(
        "{}",
        format!(
            "{:<36}  {:<6}  {:>10}  {:>5}  {}",
            "ID", "TYPE", "CONFIDENCE", "SEEN", "CONTENT"
        )
        .bold()
    );
    for item in items {
        let confidence = format!("{:>10.2}", item.confidence);
        let confidence = if item.confidence >= 0.6 {
            confidence.green()
        } else {
            confidence.yellow()
        };
        println!(
            "{:<36}  {:<6}  {}  {:>5}  {}",
            item.id.as_str(),
            item.kind.as_str(),
            confidence,
            item.times_seen,
            item.content.summary(48)
        );
    }
    println!();
    println!("{} item(s)", items.len());
}
