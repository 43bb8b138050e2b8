// Copyright (c) 2026 NE-AI Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Domain events for the cognition bounded context.
//! Every decision and feedback call is recorded as one of these in the
//! history log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::decision::CandidateId;
use super::knowledge::{InputKind, KnowledgeId};

/// Cognition domain events
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CognitionEvent {
    /// Input type was not recognized; nothing was stored
    InputIgnored {
        input_type: String,
        source: String,
        reason: String,
    },

    /// Input matched an existing memory above the known threshold
    KnowledgeRecognized {
        knowledge_id: KnowledgeId,
        input_type: InputKind,
        source: String,
        similarity: f64,
        times_seen: u64,
    },

    /// Confidence too low; a human was asked to confirm
    ClarificationRequested {
        candidate_id: CandidateId,
        input_type: InputKind,
        source: String,
        confidence: f64,
        relevance: f64,
        best_similarity: f64,
    },

    /// A new knowledge item was stored
    KnowledgeLearned {
        knowledge_id: KnowledgeId,
        input_type: InputKind,
        source: String,
        confidence: f64,
        relevance: f64,
        best_similarity: f64,
    },

    /// Human feedback adjusted an item's confidence
    KnowledgeReinforced {
        knowledge_id: KnowledgeId,
        positive: bool,
        old_confidence: f64,
        new_confidence: f64,
        times_seen: u64,
    },

    /// A pending question was answered yes
    CandidateConfirmed {
        candidate_id: CandidateId,
        knowledge_id: KnowledgeId,
        recognized: bool,
    },

    /// A pending question was answered no
    CandidateRejected { candidate_id: CandidateId },

    /// The text vectorizer was (re)fitted
    CorpusFitted {
        documents: usize,
        vocabulary_size: usize,
    },

    EngineStarted { knowledge_items: usize },

    EngineStopped { drained: usize, abandoned: usize },
}

impl CognitionEvent {
    /// Get the event type as a string
    pub fn event_type(&self) -> &'static str {
        match self {
            CognitionEvent::InputIgnored { .. } => "input_ignored",
            CognitionEvent::KnowledgeRecognized { .. } => "knowledge_recognized",
            CognitionEvent::ClarificationRequested { .. } => "clarification_requested",
            CognitionEvent::KnowledgeLearned { .. } => "knowledge_learned",
            CognitionEvent::KnowledgeReinforced { .. } => "knowledge_reinforced",
            CognitionEvent::CandidateConfirmed { .. } => "candidate_confirmed",
            CognitionEvent::CandidateRejected { .. } => "candidate_rejected",
            CognitionEvent::CorpusFitted { .. } => "corpus_fitted",
            CognitionEvent::EngineStarted { .. } => "engine_started",
            CognitionEvent::EngineStopped { .. } => "engine_stopped",
        }
    }

    /// Event fields without the type tag, as stored in a history entry.
    pub fn payload(&self) -> Value {
        let mut value = serde_json::to_value(self).unwrap_or(Value::Null);
        if let Value::Object(map) = &mut value {
            map.remove("type");
        }
        value
    }
}

/// One audit record. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "type")]
    pub event_type: String,
    pub payload: Value,
}

impl HistoryEntry {
    pub fn new(event_type: impl Into<String>, payload: Value) -> Self {
        Self {
            timestamp: Utc::now(),
            event_type: event_type.into(),
            payload,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_payload_drops_tag() {
        let event = CognitionEvent::KnowledgeReinforced {
            knowledge_id: KnowledgeId::from("k-1"),
            positive: true,
            old_confidence: 0.5,
            new_confidence: 0.6,
            times_seen: 2,
        };

        assert_eq!(event.event_type(), "knowledge_reinforced");
        let payload = event.payload();
        assert!(payload.get("type").is_none());
        assert_eq!(payload["knowledge_id"], "k-1");
        assert_eq!(payload["times_seen"], 2);
    }

    #[test]
    fn test_history_entry_layout() {
        let entry = HistoryEntry::new("input_ignored", serde_json::json!({"reason": "x"}));
        let value = serde_json::to_value(&entry).unwrap();

        assert_eq!(value["type"], "input_ignored");
        assert!(value["timestamp"].is_string());
        assert_eq!(value["payload"]["reason"], "x");
    }
}
