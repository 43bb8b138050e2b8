// Copyright (c) 2026 NE-AI Contributors
// SPDX-License-Identifier: AGPL-3.0

// Engine Configuration Types
//
// Defines the configuration schema for the cognition engine, including:
// - Storage locations for the memory and history files
// - Decision thresholds (known-similarity and ask-confidence)
// - Relevance heuristics and reinforcement step sizes
// - Vectorizer settings (frame resolution, seed corpus)
// - Decision actor sizing and shutdown behaviour

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_PATH_ENV: &str = "NEAI_CONFIG_PATH";

/// Top-level engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    pub storage: StorageConfig,
    pub thresholds: ThresholdConfig,
    pub relevance: RelevanceConfig,
    pub reinforcement: ReinforcementConfig,
    pub vectorizer: VectorizerConfig,
    pub actor: ActorConfig,
    /// Prompt returned with every `ask` decision
    pub clarification_question: ClarificationQuestion,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub memory_file: PathBuf,
    pub history_file: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            memory_file: PathBuf::from("storage/memory.json"),
            history_file: PathBuf::from("storage/history.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// Similarity at or above which an input counts as already known
    pub known_similarity: f64,
    /// Confidence below which the engine asks instead of learning
    pub ask_confidence: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            known_similarity: 0.8,
            ask_confidence: 0.6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelevanceConfig {
    /// Text relevance is `min(1, chars / text_length_divisor)`
    pub text_length_divisor: f64,
    pub vision: f64,
    pub other: f64,
}

impl Default for RelevanceConfig {
    fn default() -> Self {
        Self {
            text_length_divisor: 100.0,
            vision: 0.5,
            other: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReinforcementConfig {
    pub increment: f64,
    pub decrement: f64,
}

impl Default for ReinforcementConfig {
    fn default() -> Self {
        Self {
            increment: 0.1,
            decrement: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorizerConfig {
    /// Frames are reduced to `frame_resolution x frame_resolution` grayscale
    pub frame_resolution: u32,
    /// Texts the TF-IDF vocabulary is fitted on before any memory exists
    pub seed_corpus: Vec<String>,
    /// Refit the vocabulary after each learned text item
    pub refit_on_learn: bool,
}

impl Default for VectorizerConfig {
    fn default() -> Self {
        Self {
            frame_resolution: 32,
            seed_corpus: vec![
                "Botão iniciar".to_string(),
                "Abrir janela".to_string(),
                "Enviar dados".to_string(),
            ],
            refit_on_learn: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorConfig {
    /// Bounded queue between producers and the decision actor
    pub queue_capacity: usize,
    /// How long queued requests may keep draining after shutdown
    pub drain_timeout_ms: u64,
    /// Unanswered questions kept for confirmation; oldest dropped first
    pub max_pending_questions: usize,
}

impl Default for ActorConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 64,
            drain_timeout_ms: 5000,
            max_pending_questions: 256,
        }
    }
}

impl ActorConfig {
    pub fn drain_timeout(&self) -> Duration {
        Duration::from_millis(self.drain_timeout_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClarificationQuestion(pub String);

impl Default for ClarificationQuestion {
    fn default() -> Self {
        Self("Não tenho certeza sobre isso. Pode confirmar?".to_string())
    }
}

impl EngineConfig {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to YAML file
    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Discover configuration file using precedence order
    /// 1. NEAI_CONFIG_PATH environment variable
    /// 2. ./neai-config.yaml (working directory)
    /// 3. ~/.neai/config.yaml (user home)
    /// 4. /etc/neai/config.yaml (system, Unix) or C:\ProgramData\NEAI\config.yaml (Windows)
    pub fn discover_config() -> Option<PathBuf> {
        Self::discovery_paths().into_iter().find(|path| path.exists())
    }

    /// Candidate locations in discovery order, whether or not they exist
    pub fn discovery_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(path) = std::env::var(CONFIG_PATH_ENV) {
            paths.push(PathBuf::from(path));
        }

        paths.push(PathBuf::from("./neai-config.yaml"));

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".neai").join("config.yaml"));
        }

        #[cfg(unix)]
        paths.push(PathBuf::from("/etc/neai/config.yaml"));
        #[cfg(windows)]
        paths.push(PathBuf::from("C:\\ProgramData\\NEAI\\config.yaml"));

        paths
    }

    /// Load configuration with discovery, fallback to default
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        // 1. Explicit CLI path (Fail if missing/invalid)
        if let Some(path) = cli_path {
            tracing::info!("Loading configuration from explicit path: {:?}", path);
            let mut config = Self::from_yaml_file(&path)
                .map_err(|e| anyhow::anyhow!("Failed to load config at {:?}: {}", path, e))?;
            config.apply_env_overrides();
            return Ok(config);
        }

        // 2. Discovery (Env -> Cwd -> Home -> System)
        if let Some(config_path) = Self::discover_config() {
            tracing::info!("Loading configuration from discovered path: {:?}", config_path);
            let mut config = Self::from_yaml_file(config_path)?;
            config.apply_env_overrides();
            Ok(config)
        } else {
            tracing::debug!("No configuration file found in standard locations. Using defaults.");
            let mut config = Self::default();
            config.apply_env_overrides();
            Ok(config)
        }
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Apply overrides from an arbitrary variable lookup
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("NEAI_MEMORY_FILE") {
            tracing::info!("Environment override: NEAI_MEMORY_FILE={}", path);
            self.storage.memory_file = PathBuf::from(path);
        }

        if let Some(path) = lookup("NEAI_HISTORY_FILE") {
            tracing::info!("Environment override: NEAI_HISTORY_FILE={}", path);
            self.storage.history_file = PathBuf::from(path);
        }

        if let Some(raw) = lookup("NEAI_KNOWN_THRESHOLD") {
            match raw.trim().parse::<f64>() {
                Ok(value) => {
                    tracing::info!("Environment override: NEAI_KNOWN_THRESHOLD={}", value);
                    self.thresholds.known_similarity = value;
                }
                Err(_) => tracing::warn!("Ignoring invalid NEAI_KNOWN_THRESHOLD value: {}", raw),
            }
        }

        if let Some(raw) = lookup("NEAI_ASK_THRESHOLD") {
            match raw.trim().parse::<f64>() {
                Ok(value) => {
                    tracing::info!("Environment override: NEAI_ASK_THRESHOLD={}", value);
                    self.thresholds.ask_confidence = value;
                }
                Err(_) => tracing::warn!("Ignoring invalid NEAI_ASK_THRESHOLD value: {}", raw),
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        check_unit("thresholds.known_similarity", self.thresholds.known_similarity)?;
        check_unit("thresholds.ask_confidence", self.thresholds.ask_confidence)?;
        check_unit("relevance.vision", self.relevance.vision)?;
        check_unit("relevance.other", self.relevance.other)?;
        check_unit("reinforcement.increment", self.reinforcement.increment)?;
        check_unit("reinforcement.decrement", self.reinforcement.decrement)?;

        if !(self.relevance.text_length_divisor > 0.0) {
            anyhow::bail!(
                "relevance.text_length_divisor must be positive, got {}",
                self.relevance.text_length_divisor
            );
        }

        if self.vectorizer.frame_resolution == 0 {
            anyhow::bail!("vectorizer.frame_resolution must be at least 1");
        }

        if self.actor.queue_capacity == 0 {
            anyhow::bail!("actor.queue_capacity must be at least 1");
        }

        if self.actor.max_pending_questions == 0 {
            anyhow::bail!("actor.max_pending_questions must be at least 1");
        }

        if self.storage.memory_file.as_os_str().is_empty() {
            anyhow::bail!("storage.memory_file cannot be empty");
        }

        if self.storage.history_file.as_os_str().is_empty() {
            anyhow::bail!("storage.history_file cannot be empty");
        }

        if self.storage.memory_file == self.storage.history_file {
            anyhow::bail!("storage.memory_file and storage.history_file must differ");
        }

        if self.clarification_question.0.trim().is_empty() {
            anyhow::bail!("clarification_question cannot be empty");
        }

        Ok(())
    }
}

fn check_unit(name: &str, value: f64) -> anyhow::Result<()> {
    if !(0.0..=1.0).contains(&value) {
        anyhow::bail!("{} must be within [0, 1], got {}", name, value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.thresholds.known_similarity, 0.8);
        assert_eq!(config.thresholds.ask_confidence, 0.6);
        assert_eq!(config.reinforcement.increment, 0.1);
        assert_eq!(config.vectorizer.frame_resolution, 32);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
thresholds:
  known_similarity: 0.9
storage:
  memory_file: /tmp/neai/memory.json
"#;
        let config = EngineConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.thresholds.known_similarity, 0.9);
        assert_eq!(config.thresholds.ask_confidence, 0.6);
        assert_eq!(config.storage.memory_file, PathBuf::from("/tmp/neai/memory.json"));
        assert_eq!(config.storage.history_file, PathBuf::from("storage/history.json"));
        assert_eq!(config.actor.queue_capacity, 64);
    }

    #[test]
    fn test_yaml_roundtrip() {
        let mut config = EngineConfig::default();
        config.vectorizer.seed_corpus = vec!["hello world".to_string()];
        config.clarification_question = ClarificationQuestion("Confirma?".to_string());

        let yaml = serde_yaml::to_string(&config).unwrap();
        let parsed = EngineConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_overrides() {
        let vars = HashMap::from([
            ("NEAI_MEMORY_FILE", "/data/memory.json"),
            ("NEAI_KNOWN_THRESHOLD", "0.75"),
            ("NEAI_ASK_THRESHOLD", "not-a-number"),
        ]);

        let mut config = EngineConfig::default();
        config.apply_overrides_from(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.storage.memory_file, PathBuf::from("/data/memory.json"));
        assert_eq!(config.thresholds.known_similarity, 0.75);
        assert_eq!(config.thresholds.ask_confidence, 0.6);
    }

    #[test]
    fn test_validation() {
        let mut config = EngineConfig::default();

        config.thresholds.known_similarity = 1.5;
        assert!(config.validate().is_err());
        config.thresholds.known_similarity = 0.8;

        config.relevance.text_length_divisor = 0.0;
        assert!(config.validate().is_err());
        config.relevance.text_length_divisor = 100.0;

        config.actor.queue_capacity = 0;
        assert!(config.validate().is_err());
        config.actor.queue_capacity = 8;

        config.storage.history_file = config.storage.memory_file.clone();
        assert!(config.validate().is_err());
    }
}
