// Copyright (c) 2026 NE-AI Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Infrastructure layer for the cognition bounded context

pub mod history_log;
pub mod in_memory;
pub mod json_file;
pub mod json_store;
pub mod repository;
pub mod vectorizer;

pub use history_log::JsonFileHistoryLog;
pub use in_memory::{InMemoryHistoryLog, InMemoryKnowledgeRepository};
pub use json_store::JsonFileKnowledgeRepository;
pub use repository::{HistoryLog, KnowledgeRepository};
pub use vectorizer::{FrameVectorizer, TextVectorizer, Vectorizer};
