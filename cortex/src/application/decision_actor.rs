// Copyright (c) 2026 NE-AI Contributors
// SPDX-License-Identifier: AGPL-3.0
//! Decision Actor - single owner of the decide/mutate sequence
//!
//! Producers (one per perception source) hold a cloneable [`DecisionHandle`]
//! and send requests over a bounded channel. One background task answers
//! them in arrival order, so at most one learn or reinforce is in flight.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Serializes access to the cognition service and drains on shutdown

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::application::CognitionService;
use crate::domain::engine_config::ActorConfig;
use crate::domain::{
    CandidateId, CognitionError, CognitionEvent, CognitionResult, Decision, KnowledgeId,
    KnowledgeItem, PerceptionEvent,
};

/// A unit of work for the actor, with the channel its answer goes back on.
#[derive(Debug)]
pub enum DecisionRequest {
    Perceive {
        event: PerceptionEvent,
        reply: oneshot::Sender<CognitionResult<Decision>>,
    },
    Feedback {
        knowledge_id: KnowledgeId,
        positive: bool,
        reply: oneshot::Sender<CognitionResult<KnowledgeItem>>,
    },
    Confirm {
        candidate_id: CandidateId,
        accepted: bool,
        reply: oneshot::Sender<CognitionResult<Decision>>,
    },
}

impl DecisionRequest {
    fn reject(self) {
        // the caller may already be gone
        match self {
            DecisionRequest::Perceive { reply, .. } => {
                let _ = reply.send(Err(CognitionError::EngineStopped));
            }
            DecisionRequest::Feedback { reply, .. } => {
                let _ = reply.send(Err(CognitionError::EngineStopped));
            }
            DecisionRequest::Confirm { reply, .. } => {
                let _ = reply.send(Err(CognitionError::EngineStopped));
            }
        }
    }
}

/// Producer side of the actor.
#[derive(Clone)]
pub struct DecisionHandle {
    sender: mpsc::Sender<DecisionRequest>,
    shutdown_token: CancellationToken,
}

impl DecisionHandle {
    pub async fn perceive(&self, event: PerceptionEvent) -> CognitionResult<Decision> {
        let (reply, answer) = oneshot::channel();
        self.send(DecisionRequest::Perceive { event, reply }).await?;
        answer.await.map_err(|_| CognitionError::EngineStopped)?
    }

    pub async fn feedback(&self, knowledge_id: KnowledgeId, positive: bool) -> CognitionResult<KnowledgeItem> {
        let (reply, answer) = oneshot::channel();
        self.send(DecisionRequest::Feedback {
            knowledge_id,
            positive,
            reply,
        })
        .await?;
        answer.await.map_err(|_| CognitionError::EngineStopped)?
    }

    pub async fn confirm(&self, candidate_id: CandidateId, accepted: bool) -> CognitionResult<Decision> {
        let (reply, answer) = oneshot::channel();
        self.send(DecisionRequest::Confirm {
            candidate_id,
            accepted,
            reply,
        })
        .await?;
        answer.await.map_err(|_| CognitionError::EngineStopped)?
    }

    /// Stop accepting work. Already queued requests are drained by the actor.
    pub fn shutdown(&self) {
        self.shutdown_token.cancel();
    }

    pub fn is_stopped(&self) -> bool {
        self.shutdown_token.is_cancelled() || self.sender.is_closed()
    }

    async fn send(&self, request: DecisionRequest) -> CognitionResult<()> {
        if self.shutdown_token.is_cancelled() {
            return Err(CognitionError::EngineStopped);
        }
        self.sender
            .send(request)
            .await
            .map_err(|_| CognitionError::EngineStopped)
    }
}

/// What the actor did over its lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActorReport {
    /// Requests answered before shutdown
    pub processed: usize,
    /// Queued requests answered after shutdown, within the drain timeout
    pub drained: usize,
    /// Queued requests answered with `EngineStopped`
    pub abandoned: usize,
}

/// Decision Actor - background task
pub struct DecisionActor {
    service: Arc<dyn CognitionService>,
    receiver: mpsc::Receiver<DecisionRequest>,
    shutdown_token: CancellationToken,
    drain_timeout: Duration,
}

impl DecisionActor {
    pub fn new(service: Arc<dyn CognitionService>, config: &ActorConfig) -> (Self, DecisionHandle) {
        let (sender, receiver) = mpsc::channel(config.queue_capacity.max(1));
        let shutdown_token = CancellationToken::new();

        let handle = DecisionHandle {
            sender,
            shutdown_token: shutdown_token.clone(),
        };
        let actor = Self {
            service,
            receiver,
            shutdown_token,
            drain_timeout: config.drain_timeout(),
        };
        (actor, handle)
    }

    /// Get a handle to trigger shutdown
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown_token.clone()
    }

    /// Start the actor background task
    pub fn start(self) -> tokio::task::JoinHandle<ActorReport> {
        tokio::spawn(self.run())
    }

    /// Answer requests until shutdown or until every handle is dropped, then drain
    pub async fn run(mut self) -> ActorReport {
        info!(drain_timeout_ms = self.drain_timeout.as_millis() as u64, "Starting decision actor");

        let mut report = ActorReport::default();

        loop {
            tokio::select! {
                biased;
                _ = self.shutdown_token.cancelled() => {
                    info!("Shutdown signal received, stopping decision actor");
                    break;
                }
                request = self.receiver.recv() => match request {
                    Some(request) => {
                        self.handle(request).await;
                        report.processed += 1;
                    }
                    None => {
                        debug!("All decision handles dropped");
                        break;
                    }
                }
            }
        }

        self.receiver.close();
        let deadline = Instant::now() + self.drain_timeout;
        while let Ok(request) = self.receiver.try_recv() {
            if Instant::now() < deadline {
                self.handle(request).await;
                report.drained += 1;
            } else {
                request.reject();
                report.abandoned += 1;
            }
        }

        if report.abandoned > 0 {
            warn!(abandoned = report.abandoned, "Queued requests abandoned at shutdown");
        }

        self.service
            .record_event(CognitionEvent::EngineStopped {
                drained: report.drained,
                abandoned: report.abandoned,
            })
            .await;

        info!(
            processed = report.processed,
            drained = report.drained,
            abandoned = report.abandoned,
            "Decision actor stopped"
        );
        report
    }

    async fn handle(&self, request: DecisionRequest) {
        // a dropped receiver only means the caller stopped waiting
        match request {
            DecisionRequest::Perceive { event, reply } => {
                let _ = reply.send(self.service.decide(event).await);
            }
            DecisionRequest::Feedback {
                knowledge_id,
                positive,
                reply,
            } => {
                let _ = reply.send(self.service.reinforce(&knowledge_id, positive).await);
            }
            DecisionRequest::Confirm {
                candidate_id,
                accepted,
                reply,
            } => {
                let _ = reply.send(self.service.confirm(candidate_id, accepted).await);
            }
        }
    }
}
