// Copyright (c) 2026 NE-AI Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Decision history persisted as a JSON array of `{timestamp, type, payload}`
//! entries. Entries are only ever appended.

use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::json_file::{read_records, write_records};
use super::repository::HistoryLog;
use crate::domain::{CognitionResult, HistoryEntry};

pub struct JsonFileHistoryLog {
    path: PathBuf,
    entries: Mutex<Vec<HistoryEntry>>,
}

impl JsonFileHistoryLog {
    pub async fn open(path: impl Into<PathBuf>) -> CognitionResult<Self> {
        let path = path.into();
        let entries: Vec<HistoryEntry> = read_records(&path).await?;
        info!(path = %path.display(), entries = entries.len(), "Opened history log");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl HistoryLog for JsonFileHistoryLog {
    async fn log_event(&self, event_type: &str, payload: Value) -> CognitionResult<HistoryEntry> {
        let entry = HistoryEntry::new(event_type, payload);

        let mut entries = self.entries.lock().await;
        entries.push(entry.clone());
        if let Err(e) = write_records(&self.path, &entries).await {
            entries.pop();
            return Err(e.into());
        }

        debug!(event_type, total = entries.len(), "History entry appended");
        Ok(entry)
    }

    async fn entries(&self) -> CognitionResult<Vec<HistoryEntry>> {
        Ok(self.entries.lock().await.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CognitionEvent, KnowledgeId};
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_entries_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");

        let log = JsonFileHistoryLog::open(&path).await.unwrap();
        log.log_event("knowledge_learned", json!({"knowledge_id": "a"}))
            .await
            .unwrap();
        log.record(&CognitionEvent::KnowledgeReinforced {
            knowledge_id: KnowledgeId::from("a"),
            positive: true,
            old_confidence: 0.5,
            new_confidence: 0.6,
            times_seen: 2,
        })
        .await
        .unwrap();

        let reopened = JsonFileHistoryLog::open(&path).await.unwrap();
        let entries = reopened.entries().await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].event_type, "knowledge_learned");
        assert_eq!(entries[1].event_type, "knowledge_reinforced");
        assert_eq!(entries[1].payload["new_confidence"], 0.6);
        assert!(entries[0].timestamp <= entries[1].timestamp);
    }

    #[tokio::test]
    async fn test_file_layout() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");

        let log = JsonFileHistoryLog::open(&path).await.unwrap();
        log.log_event("input_ignored", json!({"reason": "unsupported"}))
            .await
            .unwrap();

        let raw: Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        let first = &raw[0];
        assert_eq!(first["type"], "input_ignored");
        assert_eq!(first["payload"]["reason"], "unsupported");
        assert!(first["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_recent_returns_tail() {
        let dir = TempDir::new().unwrap();
        let log = JsonFileHistoryLog::open(dir.path().join("history.json"))
            .await
            .unwrap();
        for i in 0..5 {
            log.log_event("input_ignored", json!({"n": i})).await.unwrap();
        }

        let recent = log.recent(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].payload["n"], 3);
        assert_eq!(recent[1].payload["n"], 4);
        assert_eq!(log.recent(50).await.unwrap().len(), 5);
    }
}
