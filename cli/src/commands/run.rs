// Copyright (c) 2026 NE-AI Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Stream runner
//!
//! Reads one JSON request per line and writes one JSON reply per line:
//!
//! ```text
//! {"op":"perceive","type":"text","source":"ocr","data":"Abrir janela","confidence":0.9}
//! {"op":"feedback","knowledge_id":"<id>","positive":true}
//! {"op":"confirm","candidate_id":"<uuid>","accepted":true}
//! ```
//!
//! Requests go through a decision actor. EOF or Ctrl+C stops intake and the
//! actor drains whatever is still queued.

use anyhow::{Context, Result};
use clap::Args;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::PathBuf;
use tokio::fs::File;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::signal;
use tracing::{info, warn};

use neai_cortex::{
    CandidateId, CognitionResult, DecisionActor, DecisionHandle, KnowledgeId, PerceptionEvent,
};

use crate::engine::Engine;

#[derive(Args)]
pub struct RunCommand {
    /// Read requests from FILE instead of stdin
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,
}

/// One line of the request stream
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StreamRequest {
    Perceive(PerceptionEvent),
    Feedback {
        knowledge_id: KnowledgeId,
        positive: bool,
    },
    Confirm {
        candidate_id: CandidateId,
        accepted: bool,
    },
}

fn reply<T: Serialize>(result: CognitionResult<T>) -> Value {
    let value = result
        .map_err(|e| e.to_string())
        .and_then(|ok| serde_json::to_value(ok).map_err(|e| e.to_string()));
    match value {
        Ok(value) => value,
        Err(message) => json!({ "error": message }),
    }
}

/// Answer one request line. Blank lines produce no reply.
pub async fn handle_line(handle: &DecisionHandle, line: &str) -> Option<Value> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let request: StreamRequest = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => return Some(json!({ "error": format!("invalid request: {e}") })),
    };

    let answer = match request {
        StreamRequest::Perceive(event) => reply(handle.perceive(event).await),
        StreamRequest::Feedback {
            knowledge_id,
            positive,
        } => match handle.feedback(knowledge_id, positive).await {
            Ok(item) => reply(Ok(json!({ "action": "feedback", "payload": item }))),
            Err(e) => reply::<Value>(Err(e)),
        },
        StreamRequest::Confirm {
            candidate_id,
            accepted,
        } => reply(handle.confirm(candidate_id, accepted).await),
    };
    Some(answer)
}

pub async fn execute(command: RunCommand, config_path: Option<PathBuf>) -> Result<()> {
    let engine = Engine::start(config_path).await?;
    let (actor, handle) = DecisionActor::new(engine.service.clone(), &engine.config.actor);
    let actor_task = actor.start();

    let reader: Box<dyn AsyncBufRead + Unpin + Send> = match &command.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path)
                .await
                .with_context(|| format!("Failed to open input {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(tokio::io::stdin())),
    };
    let mut lines = reader.lines();
    let mut stdout = tokio::io::stdout();

    let stop = shutdown_signal();
    tokio::pin!(stop);

    loop {
        tokio::select! {
            _ = &mut stop => break,
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read request stream")? else {
                    info!("End of request stream");
                    break;
                };
                if let Some(answer) = handle_line(&handle, &line).await {
                    let mut out = serde_json::to_vec(&answer)?;
                    out.push(b'\n');
                    stdout.write_all(&out).await?;
                    stdout.flush().await?;
                }
            }
        }
    }

    handle.shutdown();
    let report = actor_task.await.context("Decision actor panicked")?;
    info!(
        processed = report.processed,
        drained = report.drained,
        abandoned = report.abandoned,
        "Stream runner stopped"
    );

    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C signal"),
        Err(e) => {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neai_cortex::{EngineConfig, InMemoryHistoryLog, InMemoryKnowledgeRepository, StandardCognitionService};
    use std::sync::Arc;

    async fn running_handle() -> DecisionHandle {
        let service = StandardCognitionService::new(
            Arc::new(InMemoryKnowledgeRepository::new()),
            Arc::new(InMemoryHistoryLog::new()),
            EngineConfig::default(),
        )
        .await
        .unwrap();
        let (actor, handle) = DecisionActor::new(Arc::new(service), &EngineConfig::default().actor);
        actor.start();
        handle
    }

    #[test]
    fn test_parse_requests() {
        let perceive: StreamRequest =
            serde_json::from_str(r#"{"op":"perceive","type":"text","data":"Abrir janela","confidence":0.9}"#).unwrap();
        match perceive {
            StreamRequest::Perceive(event) => {
                assert_eq!(event.kind, "text");
                assert_eq!(event.source, "");
                assert_eq!(event.confidence, 0.9);
            }
            other => panic!("expected perceive, got {other:?}"),
        }

        let frame: StreamRequest = serde_json::from_str(
            r#"{"op":"perceive","type":"frame","data":{"width":1,"height":1,"channels":1,"pixels":[128]}}"#,
        )
        .unwrap();
        assert!(matches!(frame, StreamRequest::Perceive(_)));

        let confirm: StreamRequest = serde_json::from_str(
            r#"{"op":"confirm","candidate_id":"6f1c1f1e-8a55-4d8e-9a47-0d3a3c5c2b10","accepted":false}"#,
        )
        .unwrap();
        assert!(matches!(confirm, StreamRequest::Confirm { accepted: false, .. }));
    }

    #[tokio::test]
    async fn test_stream_round_trip() {
        let handle = running_handle().await;

        assert!(handle_line(&handle, "   ").await.is_none());

        let asked = handle_line(
            &handle,
            r#"{"op":"perceive","type":"text","data":"abrir janela","confidence":0.7}"#,
        )
        .await
        .unwrap();
        assert_eq!(asked["action"], "ask");
        let candidate_id = asked["payload"]["candidate_id"].as_str().unwrap().to_string();

        let confirmed = handle_line(
            &handle,
            &format!(r#"{{"op":"confirm","candidate_id":"{candidate_id}","accepted":true}}"#),
        )
        .await
        .unwrap();
        assert_eq!(confirmed["action"], "learn");
        let id = confirmed["payload"]["id"].as_str().unwrap().to_string();

        let feedback = handle_line(
            &handle,
            &format!(r#"{{"op":"feedback","knowledge_id":"{id}","positive":false}}"#),
        )
        .await
        .unwrap();
        assert_eq!(feedback["action"], "feedback");
        assert_eq!(feedback["payload"]["times_seen"], 2);
    }

    #[tokio::test]
    async fn test_errors_become_replies() {
        let handle = running_handle().await;

        let invalid = handle_line(&handle, "{not json").await.unwrap();
        assert!(invalid["error"].as_str().unwrap().starts_with("invalid request"));

        let unknown = handle_line(&handle, r#"{"op":"feedback","knowledge_id":"missing-id","positive":true}"#)
            .await
            .unwrap();
        assert_eq!(unknown["error"], "Unknown knowledge id: missing-id");

        handle.shutdown();
        let stopped = handle_line(&handle, r#"{"op":"perceive","type":"text","data":"x"}"#)
            .await
            .unwrap();
        assert_eq!(stopped["error"], "Cognition engine is stopped");
    }
}
