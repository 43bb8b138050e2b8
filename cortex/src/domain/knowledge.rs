// Copyright (c) 2026 NE-AI Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Knowledge items: the confidence-scored memories owned by the memory store.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::errors::CognitionError;

/// Opaque knowledge identifier.
///
/// New items get a v4 UUID rendered as a string; ids read back from disk are
/// kept verbatim so hand-edited or legacy stores still load.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KnowledgeId(pub String);

impl KnowledgeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for KnowledgeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for KnowledgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for KnowledgeId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for KnowledgeId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Canonical input category of a perception event or knowledge item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Text,
    Vision,
    Other,
}

impl InputKind {
    /// Map a raw producer tag onto a canonical kind.
    ///
    /// Producers disagree on spelling (`text` vs `text_signal`, `frame` vs
    /// `vision`), so the accepted aliases are listed here in one place.
    pub fn from_tag(tag: &str) -> Result<Self, CognitionError> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "text" | "text_signal" => Ok(InputKind::Text),
            "vision" | "frame" | "image" => Ok(InputKind::Vision),
            "file" | "other" => Ok(InputKind::Other),
            _ => Err(CognitionError::UnsupportedInputType(tag.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Text => "text",
            InputKind::Vision => "vision",
            InputKind::Other => "other",
        }
    }
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a knowledge item remembers: the original text, or the extracted
/// feature vector for inputs that have no textual form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KnowledgeContent {
    Text(String),
    Features(Vec<f32>),
}

impl KnowledgeContent {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            KnowledgeContent::Text(text) => Some(text),
            KnowledgeContent::Features(_) => None,
        }
    }

    /// Short human-readable rendering for logs and the CLI.
    pub fn summary(&self, max_chars: usize) -> String {
        match self {
            KnowledgeContent::Text(text) => {
                if text.chars().count() <= max_chars {
                    text.clone()
                } else {
                    let head: String = text.chars().take(max_chars).collect();
                    format!("{head}…")
                }
            }
            KnowledgeContent::Features(values) => format!("<{} features>", values.len()),
        }
    }
}

/// A persisted memory record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeItem {
    pub id: KnowledgeId,
    #[serde(rename = "type")]
    pub kind: InputKind,
    pub content: KnowledgeContent,
    pub confidence: f64,
    pub relevance: f64,
    pub times_seen: u64,
}

impl KnowledgeItem {
    /// Create a freshly learned item. Scores are clamped into `[0, 1]`.
    pub fn new(kind: InputKind, content: KnowledgeContent, confidence: f64, relevance: f64) -> Self {
        Self {
            id: KnowledgeId::new(),
            kind,
            content,
            confidence: unit_clamp(confidence),
            relevance: unit_clamp(relevance),
            times_seen: 1,
        }
    }

    /// Apply one round of human feedback.
    pub fn apply_feedback(&mut self, positive: bool, increment: f64, decrement: f64) {
        self.times_seen += 1;
        let delta = if positive { increment } else { -decrement };
        self.confidence = unit_clamp(self.confidence + delta);
    }

    /// Record that the same information was perceived again.
    pub fn mark_seen(&mut self) {
        self.times_seen += 1;
    }
}

/// Clamp into `[0, 1]`, mapping NaN to 0.
pub(crate) fn unit_clamp(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_aliases() {
        assert_eq!(InputKind::from_tag("text").unwrap(), InputKind::Text);
        assert_eq!(InputKind::from_tag("text_signal").unwrap(), InputKind::Text);
        assert_eq!(InputKind::from_tag(" Frame ").unwrap(), InputKind::Vision);
        assert_eq!(InputKind::from_tag("file").unwrap(), InputKind::Other);
        assert!(matches!(
            InputKind::from_tag("audio"),
            Err(CognitionError::UnsupportedInputType(tag)) if tag == "audio"
        ));
    }

    #[test]
    fn test_item_serialization_layout() {
        let item = KnowledgeItem {
            id: KnowledgeId::from("k-1"),
            kind: InputKind::Text,
            content: KnowledgeContent::Text("Botão iniciar".to_string()),
            confidence: 0.8,
            relevance: 0.13,
            times_seen: 1,
        };

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["id"], "k-1");
        assert_eq!(value["type"], "text");
        assert_eq!(value["content"], "Botão iniciar");
        assert_eq!(value["times_seen"], 1);
    }

    #[test]
    fn test_feature_content_roundtrip() {
        let json = r#"{"id":"v","type":"vision","content":[0.0,0.5,1.0],"confidence":0.5,"relevance":0.5,"times_seen":3}"#;
        let item: KnowledgeItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.content, KnowledgeContent::Features(vec![0.0, 0.5, 1.0]));
        assert_eq!(item.times_seen, 3);
    }

    #[test]
    fn test_feedback_clamps() {
        let mut item = KnowledgeItem::new(
            InputKind::Text,
            KnowledgeContent::Text("x".to_string()),
            0.95,
            0.1,
        );
        item.apply_feedback(true, 0.1, 0.1);
        assert_eq!(item.confidence, 1.0);
        assert_eq!(item.times_seen, 2);

        item.confidence = 0.05;
        item.apply_feedback(false, 0.1, 0.1);
        assert_eq!(item.confidence, 0.0);
        assert_eq!(item.times_seen, 3);
    }

    #[test]
    fn test_summary_truncates() {
        let content = KnowledgeContent::Text("abcdefghij".to_string());
        assert_eq!(content.summary(4), "abcd…");
        assert_eq!(KnowledgeContent::Features(vec![0.0; 4]).summary(4), "<4 features>");
    }
}
