// Copyright (c) 2026 NE-AI Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Repository interfaces for the cognition bounded context
//! Defines the contracts for knowledge storage and the decision history

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{CognitionEvent, CognitionResult, HistoryEntry, KnowledgeId, KnowledgeItem};

/// Durable store of knowledge items, kept in insertion order
#[async_trait]
pub trait KnowledgeRepository: Send + Sync {
    /// Re-read the backing store and return every item
    async fn load(&self) -> CognitionResult<Vec<KnowledgeItem>>;

    /// Replace the full contents of the store
    async fn save(&self, items: &[KnowledgeItem]) -> CognitionResult<()>;

    /// Add a new item at the end; fails on a duplicate id
    async fn append(&self, item: KnowledgeItem) -> CognitionResult<()>;

    async fn find_by_id(&self, id: &KnowledgeId) -> CognitionResult<Option<KnowledgeItem>>;

    /// Overwrite an existing item in place (confidence / times_seen updates)
    async fn update(&self, item: &KnowledgeItem) -> CognitionResult<()>;

    /// All items in insertion order, from the in-process view
    async fn all(&self) -> CognitionResult<Vec<KnowledgeItem>>;

    async fn len(&self) -> CognitionResult<usize>;
}

/// Append-only log of decision events
#[async_trait]
pub trait HistoryLog: Send + Sync {
    /// Append one timestamped entry and return it
    async fn log_event(&self, event_type: &str, payload: Value) -> CognitionResult<HistoryEntry>;

    /// Every entry, oldest first
    async fn entries(&self) -> CognitionResult<Vec<HistoryEntry>>;

    /// The newest `limit` entries, oldest first
    async fn recent(&self, limit: usize) -> CognitionResult<Vec<HistoryEntry>> {
        let entries = self.entries().await?;
        let skip = entries.len().saturating_sub(limit);
        Ok(entries.into_iter().skip(skip).collect())
    }

    async fn record(&self, event: &CognitionEvent) -> CognitionResult<HistoryEntry> {
        self.log_event(event.event_type(), event.payload()).await
    }
}
