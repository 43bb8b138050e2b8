// Copyright (c) 2026 NE-AI Contributors
// SPDX-License-Identifier: AGPL-3.0

//! In-memory knowledge store and history log.
//!
//! Used for tests and ephemeral engines. Reads and writes can be made to fail
//! on demand to exercise the engine's error paths.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{
    CognitionError, CognitionResult, HistoryEntry, KnowledgeId, KnowledgeItem, PersistenceError,
};
use crate::infrastructure::repository::{HistoryLog, KnowledgeRepository};

fn disabled(what: &str) -> CognitionError {
    PersistenceError::io(
        "<memory>",
        std::io::Error::new(std::io::ErrorKind::Other, format!("{what} disabled")),
    )
    .into()
}

/// In-memory implementation of KnowledgeRepository
#[derive(Clone, Default)]
pub struct InMemoryKnowledgeRepository {
    items: Arc<RwLock<Vec<KnowledgeItem>>>,
    fail_writes: Arc<AtomicBool>,
    fail_reads: Arc<AtomicBool>,
}

impl InMemoryKnowledgeRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<KnowledgeItem>) -> Self {
        Self {
            items: Arc::new(RwLock::new(items)),
            ..Self::default()
        }
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make `load` and `all` fail; lookups by id keep working.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> CognitionResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(disabled("writes"));
        }
        Ok(())
    }

    fn check_readable(&self) -> CognitionResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(disabled("reads"));
        }
        Ok(())
    }
}

#[async_trait]
impl KnowledgeRepository for InMemoryKnowledgeRepository {
    async fn load(&self) -> CognitionResult<Vec<KnowledgeItem>> {
        self.check_readable()?;
        Ok(self.items.read().await.clone())
    }

    async fn save(&self, items: &[KnowledgeItem]) -> CognitionResult<()> {
        self.check_writable()?;
        *self.items.write().await = items.to_vec();
        Ok(())
    }

    async fn append(&self, item: KnowledgeItem) -> CognitionResult<()> {
        self.check_writable()?;
        let mut items = self.items.write().await;
        if items.iter().any(|existing| existing.id == item.id) {
            return Err(PersistenceError::DuplicateId(item.id).into());
        }
        items.push(item);
        Ok(())
    }

    async fn find_by_id(&self, id: &KnowledgeId) -> CognitionResult<Option<KnowledgeItem>> {
        Ok(self.items.read().await.iter().find(|item| &item.id == id).cloned())
    }

    async fn update(&self, item: &KnowledgeItem) -> CognitionResult<()> {
        let mut items = self.items.write().await;
        let slot = items
            .iter_mut()
            .find(|existing| existing.id == item.id)
            .ok_or_else(|| CognitionError::UnknownKnowledgeId(item.id.clone()))?;
        self.check_writable()?;
        *slot = item.clone();
        Ok(())
    }

    async fn all(&self) -> CognitionResult<Vec<KnowledgeItem>> {
        self.check_readable()?;
        Ok(self.items.read().await.clone())
    }

    async fn len(&self) -> CognitionResult<usize> {
        Ok(self.items.read().await.len())
    }
}

/// In-memory implementation of HistoryLog
#[derive(Clone, Default)]
pub struct InMemoryHistoryLog {
    entries: Arc<RwLock<Vec<HistoryEntry>>>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryHistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl HistoryLog for InMemoryHistoryLog {
    async fn log_event(&self, event_type: &str, payload: Value) -> CognitionResult<HistoryEntry> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(disabled("writes"));
        }
        let entry = HistoryEntry::new(event_type, payload);
        self.entries.write().await.push(entry.clone());
        Ok(entry)
    }

    async fn entries(&self) -> CognitionResult<Vec<HistoryEntry>> {
        Ok(self.entries.read().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InputKind, KnowledgeContent};

    #[tokio::test]
    async fn test_failed_write_leaves_store_untouched() {
        let repo = InMemoryKnowledgeRepository::new();
        let item = KnowledgeItem::new(InputKind::Other, KnowledgeContent::Features(vec![1.0]), 0.5, 0.3);
        repo.append(item.clone()).await.unwrap();

        repo.set_fail_writes(true);
        let mut changed = item.clone();
        changed.mark_seen();
        assert!(repo.update(&changed).await.is_err());
        assert_eq!(repo.find_by_id(&item.id).await.unwrap(), Some(item));
    }

    #[tokio::test]
    async fn test_unknown_id_wins_over_write_failure() {
        let repo = InMemoryKnowledgeRepository::new();
        repo.set_fail_writes(true);
        let ghost = KnowledgeItem::new(InputKind::Other, KnowledgeContent::Features(vec![1.0]), 0.5, 0.3);
        assert!(matches!(
            repo.update(&ghost).await,
            Err(CognitionError::UnknownKnowledgeId(_))
        ));
    }
}
