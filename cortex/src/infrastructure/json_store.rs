// Copyright (c) 2026 NE-AI Contributors
// SPDX-License-Identifier: AGPL-3.0

//! JSON file knowledge store.
//!
//! The whole memory lives in one JSON array. Every mutation rewrites the file
//! atomically and only then updates the in-process view, so a failed write
//! leaves both untouched.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::json_file::{read_records, write_records};
use super::repository::KnowledgeRepository;
use crate::domain::{CognitionError, CognitionResult, KnowledgeId, KnowledgeItem, PersistenceError};

pub struct JsonFileKnowledgeRepository {
    path: PathBuf,
    items: RwLock<Vec<KnowledgeItem>>,
}

impl JsonFileKnowledgeRepository {
    /// Open the store, reading whatever is already on disk.
    pub async fn open(path: impl Into<PathBuf>) -> CognitionResult<Self> {
        let path = path.into();
        let items: Vec<KnowledgeItem> = read_records(&path).await?;
        info!(path = %path.display(), items = items.len(), "Opened knowledge store");

        Ok(Self {
            path,
            items: RwLock::new(items),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl KnowledgeRepository for JsonFileKnowledgeRepository {
    async fn load(&self) -> CognitionResult<Vec<KnowledgeItem>> {
        let loaded: Vec<KnowledgeItem> = read_records(&self.path).await?;
        let mut items = self.items.write().await;
        *items = loaded.clone();
        Ok(loaded)
    }

    async fn save(&self, new_items: &[KnowledgeItem]) -> CognitionResult<()> {
        let mut items = self.items.write().await;
        write_records(&self.path, new_items).await?;
        *items = new_items.to_vec();
        debug!(items = items.len(), "Saved knowledge store");
        Ok(())
    }

    async fn append(&self, item: KnowledgeItem) -> CognitionResult<()> {
        let mut items = self.items.write().await;
        if items.iter().any(|existing| existing.id == item.id) {
            return Err(PersistenceError::DuplicateId(item.id).into());
        }

        let mut next = items.clone();
        next.push(item);
        write_records(&self.path, &next).await?;
        *items = next;
        Ok(())
    }

    async fn find_by_id(&self, id: &KnowledgeId) -> CognitionResult<Option<KnowledgeItem>> {
        let items = self.items.read().await;
        Ok(items.iter().find(|item| &item.id == id).cloned())
    }

    async fn update(&self, item: &KnowledgeItem) -> CognitionResult<()> {
        let mut items = self.items.write().await;
        let index = items
            .iter()
            .position(|existing| existing.id == item.id)
            .ok_or_else(|| CognitionError::UnknownKnowledgeId(item.id.clone()))?;

        let mut next = items.clone();
        next[index] = item.clone();
        write_records(&self.path, &next).await?;
        *items = next;
        Ok(())
    }

    async fn all(&self) -> CognitionResult<Vec<KnowledgeItem>> {
        Ok(self.items.read().await.clone())
    }

    async fn len(&self) -> CognitionResult<usize> {
        Ok(self.items.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InputKind, KnowledgeContent};
    use crate::infrastructure::json_file::corrupt_path;
    use tempfile::TempDir;

    fn item(text: &str) -> KnowledgeItem {
        KnowledgeItem::new(InputKind::Text, KnowledgeContent::Text(text.to_string()), 0.9, 0.1)
    }

    #[tokio::test]
    async fn test_append_persists_in_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("memory.json");

        let repo = JsonFileKnowledgeRepository::open(&path).await.unwrap();
        repo.append(item("abrir janela")).await.unwrap();
        repo.append(item("enviar dados")).await.unwrap();

        let reopened = JsonFileKnowledgeRepository::open(&path).await.unwrap();
        let items = reopened.all().await.unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].content.as_text(), Some("abrir janela"));
        assert_eq!(items[1].content.as_text(), Some("enviar dados"));
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileKnowledgeRepository::open(dir.path().join("memory.json"))
            .await
            .unwrap();

        let first = item("abrir janela");
        repo.append(first.clone()).await.unwrap();
        let err = repo.append(first).await.unwrap_err();
        assert!(matches!(
            err,
            CognitionError::Persistence(PersistenceError::DuplicateId(_))
        ));
        assert_eq!(repo.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_in_place() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("memory.json");
        let repo = JsonFileKnowledgeRepository::open(&path).await.unwrap();

        let mut stored = item("abrir janela");
        repo.append(stored.clone()).await.unwrap();
        repo.append(item("enviar dados")).await.unwrap();

        stored.apply_feedback(false, 0.1, 0.1);
        repo.update(&stored).await.unwrap();

        let reloaded = repo.load().await.unwrap();
        assert_eq!(reloaded[0].id, stored.id);
        assert!((reloaded[0].confidence - 0.8).abs() < 1e-9);
        assert_eq!(reloaded[0].times_seen, 2);
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let dir = TempDir::new().unwrap();
        let repo = JsonFileKnowledgeRepository::open(dir.path().join("memory.json"))
            .await
            .unwrap();

        let err = repo.update(&item("ghost")).await.unwrap_err();
        assert!(matches!(err, CognitionError::UnknownKnowledgeId(_)));
    }

    #[tokio::test]
    async fn test_save_load_fixed_point() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("memory.json");
        let repo = JsonFileKnowledgeRepository::open(&path).await.unwrap();

        repo.append(item("abrir janela")).await.unwrap();
        repo.append(KnowledgeItem::new(
            InputKind::Vision,
            KnowledgeContent::Features(vec![0.25, 0.5]),
            0.5,
            0.5,
        ))
        .await
        .unwrap();

        let first = repo.load().await.unwrap();
        repo.save(&first).await.unwrap();
        let bytes_before = std::fs::read(&path).unwrap();
        let second = repo.load().await.unwrap();
        repo.save(&second).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(bytes_before, std::fs::read(&path).unwrap());
    }

    #[tokio::test]
    async fn test_corrupt_file_recovers_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("memory.json");
        std::fs::write(&path, "[{\"id\": ").unwrap();

        let repo = JsonFileKnowledgeRepository::open(&path).await.unwrap();
        assert_eq!(repo.len().await.unwrap(), 0);
        assert!(corrupt_path(&path).exists());

        repo.append(item("abrir janela")).await.unwrap();
        assert_eq!(repo.load().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_non_utf8_file_recovers_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("memory.json");
        std::fs::write(&path, [0xff, 0xfe, 0x5b, 0x00]).unwrap();

        let repo = JsonFileKnowledgeRepository::open(&path).await.unwrap();
        assert_eq!(repo.len().await.unwrap(), 0);
        assert_eq!(std::fs::read(corrupt_path(&path)).unwrap(), vec![0xff, 0xfe, 0x5b, 0x00]);
    }
}
