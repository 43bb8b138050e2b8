// Copyright (c) 2026 NE-AI Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Error types for the cognition bounded context.

use std::path::PathBuf;
use thiserror::Error;

use super::decision::CandidateId;
use super::knowledge::KnowledgeId;

/// Errors surfaced by the cognition engine to its callers.
#[derive(Debug, Error)]
pub enum CognitionError {
    /// The text vectorizer was used before a reference corpus was fitted.
    #[error("Text corpus not fitted: fit the vectorizer before vectorizing text")]
    CorpusNotFitted,

    #[error("Unknown knowledge id: {0}")]
    UnknownKnowledgeId(KnowledgeId),

    #[error("Unknown candidate id: {0}")]
    UnknownCandidate(CandidateId),

    /// Handled inside the decision policy (ignore transition); only escapes
    /// when callers parse tags themselves.
    #[error("Unsupported input type: {0}")]
    UnsupportedInputType(String),

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("Cognition engine is stopped")]
    EngineStopped,
}

/// Errors raised by the file-backed repositories.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Never escapes `load()`: a corrupt file is reset to an empty record set.
    #[error("Corrupt file {path}: {reason}")]
    CorruptFile { path: PathBuf, reason: String },

    #[error("Duplicate knowledge id: {0}")]
    DuplicateId(KnowledgeId),
}

impl PersistenceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PersistenceError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type CognitionResult<T> = Result<T, CognitionError>;
