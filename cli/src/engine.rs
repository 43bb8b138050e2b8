// Copyright (c) 2026 NE-AI Contributors
// SPDX-License-Identifier: AGPL-3.0

//! In-process engine assembly
//!
//! Loads configuration and builds the cognition service over the JSON-file
//! stores it names.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use neai_cortex::{EngineConfig, JsonFileHistoryLog, JsonFileKnowledgeRepository, StandardCognitionService};

/// Load, override and validate configuration.
pub fn load_config(config_path: Option<PathBuf>) -> Result<EngineConfig> {
    let config = EngineConfig::load_or_default(config_path).context("Failed to load configuration")?;
    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

pub struct Engine {
    pub config: EngineConfig,
    pub service: Arc<StandardCognitionService>,
}

impl Engine {
    pub async fn start(config_path: Option<PathBuf>) -> Result<Self> {
        Self::from_config(load_config(config_path)?).await
    }

    pub async fn from_config(config: EngineConfig) -> Result<Self> {
        info!(
            memory_file = %config.storage.memory_file.display(),
            history_file = %config.storage.history_file.display(),
            "Starting cognition engine"
        );
        let service = StandardCognitionService::from_config(config.clone())
            .await
            .context("Failed to start cognition engine")?;

        Ok(Self {
            config,
            service: Arc::new(service),
        })
    }
}

/// Read-only access to the stores, without starting an engine.
pub async fn open_stores(config: &EngineConfig) -> Result<(JsonFileKnowledgeRepository, JsonFileHistoryLog)> {
    let repository = JsonFileKnowledgeRepository::open(&config.storage.memory_file)
        .await
        .with_context(|| format!("Failed to open memory file {}", config.storage.memory_file.display()))?;
    let history = JsonFileHistoryLog::open(&config.storage.history_file)
        .await
        .with_context(|| format!("Failed to open history file {}", config.storage.history_file.display()))?;
    Ok((repository, history))
}
