// Copyright (c) 2026 NE-AI Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Human feedback on a stored memory

use anyhow::{Context, Result};
use clap::{ArgGroup, Args};
use colored::Colorize;
use std::path::PathBuf;

use neai_cortex::{CognitionService, KnowledgeId};

use crate::engine::Engine;

#[derive(Args)]
#[command(group(ArgGroup::new("direction").required(true).args(["positive", "negative"])))]
pub struct FeedbackCommand {
    /// Knowledge item id
    #[arg(value_name = "ID")]
    pub id: String,

    /// The memory was right
    #[arg(long)]
    pub positive: bool,

    /// The memory was wrong
    #[arg(long)]
    pub negative: bool,
}

pub async fn execute(command: FeedbackCommand, config_path: Option<PathBuf>) -> Result<()> {
    let engine = Engine::start(config_path).await?;
    let id = KnowledgeId::from(command.id.as_str());

    let item = engine
        .service
        .reinforce(&id, command.positive)
        .await
        .with_context(|| format!("Failed to apply feedback to {}", id))?;

    eprintln!(
        "{}",
        format!(
            "✓ {} confidence now {:.2} (seen {} times)",
            item.id, item.confidence, item.times_seen
        )
        .green()
    );
    println!("{}", serde_json::to_string_pretty(&item)?);

    Ok(())
}
