// Copyright (c) 2026 NE-AI Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Decision records returned to producers, and the candidates held back for
//! human confirmation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use uuid::Uuid;

use super::knowledge::{InputKind, KnowledgeContent, KnowledgeItem};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub Uuid);

impl CandidateId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CandidateId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An input the engine was not confident enough to learn on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub candidate_id: CandidateId,
    #[serde(rename = "type")]
    pub kind: InputKind,
    pub source: String,
    pub content: KnowledgeContent,
    pub confidence: f64,
    pub relevance: f64,
    #[serde(default)]
    pub meta: Map<String, Value>,
    pub asked_at: DateTime<Utc>,
}

impl Candidate {
    pub fn into_knowledge(self) -> KnowledgeItem {
        KnowledgeItem::new(self.kind, self.content, self.confidence, self.relevance)
    }
}

/// Why an input was dropped without touching memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IgnoredInput {
    #[serde(rename = "type")]
    pub kind: String,
    pub source: String,
    pub reason: String,
}

/// Outcome of one evaluation. Serialized as `{action, payload}` with an
/// extra `question` for `ask`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Decision {
    /// Novel and confident: stored as a new item.
    Learn { payload: KnowledgeItem },

    /// Matches an existing same-type item.
    Reinforce { payload: KnowledgeItem, similarity: f64 },

    /// Needs a human to confirm before anything is stored.
    Ask { question: String, payload: Candidate },

    Ignore { payload: IgnoredInput },
}

impl Decision {
    pub fn action(&self) -> &'static str {
        match self {
            Decision::Learn { .. } => "learn",
            Decision::Reinforce { .. } => "reinforce",
            Decision::Ask { .. } => "ask",
            Decision::Ignore { .. } => "ignore",
        }
    }

    /// The knowledge item this decision produced or matched, if any.
    pub fn knowledge(&self) -> Option<&KnowledgeItem> {
        match self {
            Decision::Learn { payload } | Decision::Reinforce { payload, .. } => Some(payload),
            _ => None,
        }
    }

    pub fn is_learn(&self) -> bool {
        matches!(self, Decision::Learn { .. })
    }

    pub fn is_reinforce(&self) -> bool {
        matches!(self, Decision::Reinforce { .. })
    }

    pub fn is_ask(&self) -> bool {
        matches!(self, Decision::Ask { .. })
    }

    pub fn is_ignore(&self) -> bool {
        matches!(self, Decision::Ignore { .. })
    }
}
