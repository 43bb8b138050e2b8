// Copyright (c) 2026 NE-AI Contributors
// SPDX-License-Identifier: AGPL-3.0
//! # CognitionService - Decision Loop
//!
//! Application service implementing the decision loop: every perception
//! event is vectorized, compared against memories of the same input kind and
//! turned into exactly one [`Decision`].
//!
//! ## Decision policy
//!
//! 1. Unknown input type: **ignore**, nothing stored.
//! 2. Best same-kind similarity at or above `thresholds.known_similarity`:
//!    **reinforce** the matched memory (`times_seen` only).
//! 3. Blended confidence below `thresholds.ask_confidence`: **ask** a human;
//!    the input waits in a bounded pending set until [`CognitionService::confirm`].
//! 4. Otherwise **learn** a new knowledge item.
//!
//! ## Reinforcement
//!
//! Human feedback moves an item's confidence up or down by a fixed step
//! (`reinforcement.increment` / `reinforcement.decrement`), clamped to `[0, 1]`.
//!
//! The compare-decide-mutate sequence runs under one async mutex. Query
//! vectorization happens before the lock is taken; if the text model was
//! refitted in between, the query is vectorized again under the lock.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::domain::confidence::{confidence, relevance};
use crate::domain::similarity::find_most_similar;
use crate::domain::{
    Candidate, CandidateId, CognitionError, CognitionEvent, CognitionResult, Decision,
    EngineConfig, HistoryEntry, IgnoredInput, InputKind, KnowledgeContent, KnowledgeId,
    KnowledgeItem, PerceptionData, PerceptionEvent,
};
use crate::infrastructure::{
    HistoryLog, JsonFileHistoryLog, JsonFileKnowledgeRepository, KnowledgeRepository, Vectorizer,
};

/// CognitionService interface
#[async_trait]
pub trait CognitionService: Send + Sync {
    /// Run one perception event through the decision policy
    async fn decide(&self, event: PerceptionEvent) -> CognitionResult<Decision>;

    /// Apply human feedback to a stored item and return its new state
    async fn reinforce(&self, id: &KnowledgeId, positive: bool) -> CognitionResult<KnowledgeItem>;

    /// Answer a pending question raised by an ask decision
    async fn confirm(&self, candidate_id: CandidateId, accepted: bool) -> CognitionResult<Decision>;

    async fn get_knowledge(&self, id: &KnowledgeId) -> CognitionResult<Option<KnowledgeItem>>;

    async fn list_knowledge(&self) -> CognitionResult<Vec<KnowledgeItem>>;

    /// History entries, oldest first; `Some(n)` keeps only the newest n
    async fn history(&self, limit: Option<usize>) -> CognitionResult<Vec<HistoryEntry>>;

    /// Questions still waiting for an answer, oldest first
    async fn pending_questions(&self) -> Vec<Candidate>;

    /// Append a lifecycle event to the history. Failures are logged, not returned.
    async fn record_event(&self, event: CognitionEvent);
}

struct IndexedVector {
    id: KnowledgeId,
    kind: InputKind,
    vector: Vec<f32>,
}

/// State only touched while the decision lock is held
struct DecisionState {
    index: Vec<IndexedVector>,
    pending: VecDeque<Candidate>,
}

struct VectorSpace {
    vectorizer: Vectorizer,
    /// Bumped on every successful refit so stale query vectors can be detected
    generation: u64,
}

/// Standard implementation of CognitionService
pub struct StandardCognitionService {
    repository: Arc<dyn KnowledgeRepository>,
    history: Arc<dyn HistoryLog>,
    config: EngineConfig,
    space: RwLock<VectorSpace>,
    state: Mutex<DecisionState>,
}

impl StandardCognitionService {
    /// Build the service over existing stores, fit the text model and log
    /// `engine_started`.
    pub async fn new(
        repository: Arc<dyn KnowledgeRepository>,
        history: Arc<dyn HistoryLog>,
        config: EngineConfig,
    ) -> CognitionResult<Self> {
        let service = Self {
            repository,
            history,
            space: RwLock::new(VectorSpace {
                vectorizer: Vectorizer::new(config.vectorizer.frame_resolution),
                generation: 0,
            }),
            state: Mutex::new(DecisionState {
                index: Vec::new(),
                pending: VecDeque::new(),
            }),
            config,
        };

        {
            let mut state = service.state.lock().await;
            service.refit_locked(&mut state).await?;
        }
        let knowledge_items = service.repository.len().await?;

        info!(knowledge_items, "Cognition engine started");
        service
            .record_event(CognitionEvent::EngineStarted { knowledge_items })
            .await;

        Ok(service)
    }

    /// Open the JSON-file stores named in the configuration.
    pub async fn from_config(config: EngineConfig) -> CognitionResult<Self> {
        let repository = JsonFileKnowledgeRepository::open(&config.storage.memory_file).await?;
        let history = JsonFileHistoryLog::open(&config.storage.history_file).await?;
        Self::new(Arc::new(repository), Arc::new(history), config).await
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Refit the text model on seed texts plus text memories and rebuild the
    /// memory vector index. A corpus with no usable tokens keeps the
    /// previous fit.
    async fn refit_locked(&self, state: &mut DecisionState) -> CognitionResult<()> {
        let items = self.repository.all().await?;

        let mut corpus: Vec<&str> = self
            .config
            .vectorizer
            .seed_corpus
            .iter()
            .map(String::as_str)
            .collect();
        corpus.extend(items.iter().filter_map(|item| item.content.as_text()));

        let mut space = self.space.write().await;
        match space.vectorizer.fit_text(&corpus) {
            Ok(()) => {
                space.generation += 1;
                let vocabulary_size = space.vectorizer.text().dimension();
                debug!(documents = corpus.len(), vocabulary_size, "Text corpus fitted");
                self.record_event(CognitionEvent::CorpusFitted {
                    documents: corpus.len(),
                    vocabulary_size,
                })
                .await;
            }
            Err(CognitionError::CorpusNotFitted) => {
                warn!(
                    documents = corpus.len(),
                    "Text corpus has no usable tokens; text inputs cannot be vectorized yet"
                );
            }
            Err(e) => return Err(e),
        }

        let mut index = Vec::with_capacity(items.len());
        for item in items {
            match space.vectorizer.vectorize_content(&item.content) {
                Ok(vector) => index.push(IndexedVector {
                    id: item.id,
                    kind: item.kind,
                    vector,
                }),
                Err(e) => debug!(knowledge_id = %item.id, error = %e, "Memory left out of index"),
            }
        }
        state.index = index;

        Ok(())
    }

    /// Best same-kind match as `(similarity, knowledge id)`.
    fn best_match(state: &DecisionState, kind: InputKind, query: &[f32]) -> (f64, Option<KnowledgeId>) {
        let same_kind: Vec<&IndexedVector> = state.index.iter().filter(|entry| entry.kind == kind).collect();
        let vectors: Vec<&[f32]> = same_kind.iter().map(|entry| entry.vector.as_slice()).collect();
        let (score, index) = find_most_similar(query, &vectors);
        (score, index.map(|i| same_kind[i].id.clone()))
    }

    /// Count one more sighting of a stored item.
    async fn recognize_locked(&self, id: &KnowledgeId) -> CognitionResult<KnowledgeItem> {
        let mut item = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| CognitionError::UnknownKnowledgeId(id.clone()))?;
        item.mark_seen();
        self.repository.update(&item).await?;
        Ok(item)
    }

    /// Store a new item and keep the index in step with it.
    async fn learn_locked(
        &self,
        state: &mut DecisionState,
        item: KnowledgeItem,
        vector: Vec<f32>,
    ) -> CognitionResult<KnowledgeItem> {
        self.repository.append(item.clone()).await?;

        // the item is stored from here on; a failed refit keeps the old fit
        let refit = self.config.vectorizer.refit_on_learn && item.content.as_text().is_some();
        let refitted = if refit {
            match self.refit_locked(state).await {
                Ok(()) => true,
                Err(e) => {
                    warn!(knowledge_id = %item.id, error = %e, "Refit after learn failed, indexing with current fit");
                    false
                }
            }
        } else {
            false
        };
        if !refitted {
            state.index.push(IndexedVector {
                id: item.id.clone(),
                kind: item.kind,
                vector,
            });
        }

        info!(
            knowledge_id = %item.id,
            input_type = %item.kind,
            confidence = item.confidence,
            "Learned new knowledge"
        );
        Ok(item)
    }

    fn push_pending(&self, state: &mut DecisionState, candidate: Candidate) {
        let max = self.config.actor.max_pending_questions.max(1);
        while state.pending.len() >= max {
            if let Some(dropped) = state.pending.pop_front() {
                warn!(candidate_id = %dropped.candidate_id, "Pending question dropped, queue full");
            }
        }
        state.pending.push_back(candidate);
    }

    async fn vectorize(&self, kind: InputKind, data: &PerceptionData) -> CognitionResult<(Vec<f32>, u64)> {
        let space = self.space.read().await;
        let vector = space.vectorizer.vectorize(kind, data)?;
        Ok((vector, space.generation))
    }
}

fn content_for(data: &PerceptionData, vector: &[f32]) -> KnowledgeContent {
    match data {
        PerceptionData::Text(text) => KnowledgeContent::Text(text.clone()),
        PerceptionData::Frame(_) | PerceptionData::Vector(_) => KnowledgeContent::Features(vector.to_vec()),
    }
}

#[async_trait]
impl CognitionService for StandardCognitionService {
    async fn decide(&self, event: PerceptionEvent) -> CognitionResult<Decision> {
        let kind = match InputKind::from_tag(&event.kind) {
            Ok(kind) => kind,
            Err(e) => {
                debug!(input_type = %event.kind, source = %event.source, "Ignoring input");
                let reason = e.to_string();
                self.record_event(CognitionEvent::InputIgnored {
                    input_type: event.kind.clone(),
                    source: event.source.clone(),
                    reason: reason.clone(),
                })
                .await;
                return Ok(Decision::Ignore {
                    payload: IgnoredInput {
                        kind: event.kind,
                        source: event.source,
                        reason,
                    },
                });
            }
        };

        let relevance = relevance(kind, &event.data, &self.config.relevance);
        let confidence = confidence(relevance, event.confidence);
        let (mut vector, generation) = self.vectorize(kind, &event.data).await?;

        let mut state = self.state.lock().await;

        {
            let space = self.space.read().await;
            if space.generation != generation {
                vector = space.vectorizer.vectorize(kind, &event.data)?;
            }
        }

        let (similarity, best) = Self::best_match(&state, kind, &vector);
        debug!(
            input_type = %kind,
            source = %event.source,
            similarity,
            confidence,
            "Similarity search complete"
        );

        if let Some(id) = best.filter(|_| similarity >= self.config.thresholds.known_similarity) {
            let item = self.recognize_locked(&id).await?;
            info!(knowledge_id = %item.id, similarity, times_seen = item.times_seen, "Recognized known input");
            self.record_event(CognitionEvent::KnowledgeRecognized {
                knowledge_id: item.id.clone(),
                input_type: kind,
                source: event.source,
                similarity,
                times_seen: item.times_seen,
            })
            .await;
            return Ok(Decision::Reinforce {
                payload: item,
                similarity,
            });
        }

        if confidence < self.config.thresholds.ask_confidence {
            let candidate = Candidate {
                candidate_id: CandidateId::new(),
                kind,
                source: event.source,
                content: content_for(&event.data, &vector),
                confidence,
                relevance,
                meta: event.meta,
                asked_at: Utc::now(),
            };
            info!(candidate_id = %candidate.candidate_id, confidence, "Asking for clarification");
            self.record_event(CognitionEvent::ClarificationRequested {
                candidate_id: candidate.candidate_id,
                input_type: kind,
                source: candidate.source.clone(),
                confidence,
                relevance,
                best_similarity: similarity,
            })
            .await;
            self.push_pending(&mut state, candidate.clone());
            return Ok(Decision::Ask {
                question: self.config.clarification_question.0.clone(),
                payload: candidate,
            });
        }

        let item = KnowledgeItem::new(kind, content_for(&event.data, &vector), confidence, relevance);
        let item = self.learn_locked(&mut state, item, vector).await?;
        self.record_event(CognitionEvent::KnowledgeLearned {
            knowledge_id: item.id.clone(),
            input_type: kind,
            source: event.source,
            confidence: item.confidence,
            relevance: item.relevance,
            best_similarity: similarity,
        })
        .await;

        Ok(Decision::Learn { payload: item })
    }

    async fn reinforce(&self, id: &KnowledgeId, positive: bool) -> CognitionResult<KnowledgeItem> {
        let _state = self.state.lock().await;

        let mut item = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| CognitionError::UnknownKnowledgeId(id.clone()))?;

        let old_confidence = item.confidence;
        item.apply_feedback(
            positive,
            self.config.reinforcement.increment,
            self.config.reinforcement.decrement,
        );
        self.repository.update(&item).await?;

        info!(
            knowledge_id = %item.id,
            positive,
            old_confidence,
            new_confidence = item.confidence,
            "Applied feedback"
        );
        self.record_event(CognitionEvent::KnowledgeReinforced {
            knowledge_id: item.id.clone(),
            positive,
            old_confidence,
            new_confidence: item.confidence,
            times_seen: item.times_seen,
        })
        .await;

        Ok(item)
    }

    async fn confirm(&self, candidate_id: CandidateId, accepted: bool) -> CognitionResult<Decision> {
        let mut state = self.state.lock().await;

        let position = state
            .pending
            .iter()
            .position(|candidate| candidate.candidate_id == candidate_id)
            .ok_or(CognitionError::UnknownCandidate(candidate_id))?;

        if !accepted {
            let candidate = state.pending.remove(position).ok_or(CognitionError::UnknownCandidate(candidate_id))?;
            info!(candidate_id = %candidate_id, "Candidate rejected");
            self.record_event(CognitionEvent::CandidateRejected { candidate_id }).await;
            return Ok(Decision::Ignore {
                payload: IgnoredInput {
                    kind: candidate.kind.to_string(),
                    source: candidate.source,
                    reason: "rejected".to_string(),
                },
            });
        }

        let vector = {
            let candidate = &state.pending[position];
            let space = self.space.read().await;
            space.vectorizer.vectorize_content(&candidate.content)?
        };
        let candidate = state.pending.remove(position).ok_or(CognitionError::UnknownCandidate(candidate_id))?;

        let (similarity, best) = Self::best_match(&state, candidate.kind, &vector);
        if let Some(id) = best.filter(|_| similarity >= self.config.thresholds.known_similarity) {
            let item = self.recognize_locked(&id).await?;
            info!(candidate_id = %candidate_id, knowledge_id = %item.id, "Confirmed candidate matches known input");
            self.record_event(CognitionEvent::CandidateConfirmed {
                candidate_id,
                knowledge_id: item.id.clone(),
                recognized: true,
            })
            .await;
            return Ok(Decision::Reinforce {
                payload: item,
                similarity,
            });
        }

        let kind = candidate.kind;
        let source = candidate.source.clone();
        let item = self.learn_locked(&mut state, candidate.into_knowledge(), vector).await?;
        self.record_event(CognitionEvent::KnowledgeLearned {
            knowledge_id: item.id.clone(),
            input_type: kind,
            source,
            confidence: item.confidence,
            relevance: item.relevance,
            best_similarity: similarity,
        })
        .await;
        self.record_event(CognitionEvent::CandidateConfirmed {
            candidate_id,
            knowledge_id: item.id.clone(),
            recognized: false,
        })
        .await;

        Ok(Decision::Learn { payload: item })
    }

    async fn get_knowledge(&self, id: &KnowledgeId) -> CognitionResult<Option<KnowledgeItem>> {
        self.repository.find_by_id(id).await
    }

    async fn list_knowledge(&self) -> CognitionResult<Vec<KnowledgeItem>> {
        self.repository.all().await
    }

    async fn history(&self, limit: Option<usize>) -> CognitionResult<Vec<HistoryEntry>> {
        match limit {
            Some(limit) => self.history.recent(limit).await,
            None => self.history.entries().await,
        }
    }

    async fn pending_questions(&self) -> Vec<Candidate> {
        self.state.lock().await.pending.iter().cloned().collect()
    }

    async fn record_event(&self, event: CognitionEvent) {
        if let Err(e) = self.history.record(&event).await {
            warn!(event_type = event.event_type(), error = %e, "Failed to write history entry");
        }
    }
}
