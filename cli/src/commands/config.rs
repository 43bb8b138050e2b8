// Copyright (c) 2026 NE-AI Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::{Path, PathBuf};

use neai_cortex::domain::engine_config::CONFIG_PATH_ENV;
use neai_cortex::EngineConfig;

const GENERATED_HEADER: &str = "\
# NE-AI cognition engine configuration
#
# Every key is optional; missing keys take the values shown here.
# Environment overrides: NEAI_MEMORY_FILE, NEAI_HISTORY_FILE,
# NEAI_KNOWN_THRESHOLD, NEAI_ASK_THRESHOLD.
";

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path
        #[arg(short, long, default_value = "./neai-config.yaml")]
        output: PathBuf,
    },
}

pub async fn handle_command(command: ConfigCommand, config_override: Option<PathBuf>) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, paths).await,
        ConfigCommand::Validate { file } => validate(file.or(config_override)).await,
        ConfigCommand::Generate { output } => generate(&output).await,
    }
}

async fn show(config_override: Option<PathBuf>, show_paths: bool) -> Result<()> {
    let config = EngineConfig::load_or_default(config_override.clone()).context("Failed to load configuration")?;

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        if let Some(path) = &config_override {
            println!("  1. --config flag: {}", path.display());
        } else {
            println!("  1. --config flag: {}", "(not set)".dimmed());
        }
        for (i, path) in EngineConfig::discovery_paths().iter().enumerate() {
            let marker = if path.exists() { "✓".green() } else { "-".dimmed() };
            println!("  {}. {} {}", i + 2, marker, path.display());
        }
        println!(
            "  ({}: {})",
            CONFIG_PATH_ENV,
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "(not set)".to_string())
        );
        println!();
    }

    println!("{}", "Current configuration:".bold());
    println!();

    println!("{}", "Storage:".bold());
    println!("  Memory file: {}", config.storage.memory_file.display());
    println!("  History file: {}", config.storage.history_file.display());
    println!();

    println!("{}", "Decision thresholds:".bold());
    println!("  Known similarity: {}", config.thresholds.known_similarity);
    println!("  Ask below confidence: {}", config.thresholds.ask_confidence);
    println!("  Question: {}", config.clarification_question.0);
    println!();

    println!("{}", "Relevance:".bold());
    println!("  Text length divisor: {}", config.relevance.text_length_divisor);
    println!("  Vision: {}", config.relevance.vision);
    println!("  Other: {}", config.relevance.other);
    println!();

    println!("{}", "Reinforcement:".bold());
    println!("  Increment: {}", config.reinforcement.increment);
    println!("  Decrement: {}", config.reinforcement.decrement);
    println!();

    println!("{}", "Vectorizer:".bold());
    println!(
        "  Frame resolution: {0}x{0}",
        config.vectorizer.frame_resolution
    );
    println!("  Seed corpus: {} text(s)", config.vectorizer.seed_corpus.len());
    println!("  Refit on learn: {}", config.vectorizer.refit_on_learn);
    println!();

    println!("{}", "Decision actor:".bold());
    println!("  Queue capacity: {}", config.actor.queue_capacity);
    println!("  Drain timeout: {} ms", config.actor.drain_timeout_ms);
    println!("  Max pending questions: {}", config.actor.max_pending_questions);
    println!();

    Ok(())
}

async fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config = EngineConfig::load_or_default(config_path).context("Failed to load configuration")?;

    config.validate().context("Configuration validation failed")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

/// Default configuration as commented YAML.
pub fn sample_config() -> Result<String> {
    let yaml = serde_yaml::to_string(&EngineConfig::default()).context("Failed to serialize configuration")?;
    Ok(format!("{GENERATED_HEADER}\n{yaml}"))
}

async fn generate(output: &Path) -> Result<()> {
    let sample = sample_config()?;

    tokio::fs::write(output, sample)
        .await
        .with_context(|| format!("Failed to write config to {:?}", output))?;

    println!(
        "{}",
        format!("✓ Configuration generated: {}", output.display()).green()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_config_parses_back_to_defaults() {
        let sample = sample_config().unwrap();
        assert!(sample.starts_with("# NE-AI"));

        let parsed = EngineConfig::from_yaml_str(&sample).unwrap();
        assert_eq!(parsed, EngineConfig::default());
        parsed.validate().unwrap();
    }

    #[tokio::test]
    async fn test_generate_writes_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("neai-config.yaml");

        generate(&output).await.unwrap();

        let written = std::fs::read_to_string(&output).unwrap();
        assert!(EngineConfig::from_yaml_str(&written).is_ok());
    }
}
