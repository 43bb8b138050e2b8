// Copyright (c) 2026 NE-AI Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Single-shot observation commands
//!
//! Commands: text, vector

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use neai_cortex::{CognitionService, Decision, PerceptionData, PerceptionEvent};

use crate::engine::Engine;

#[derive(Subcommand)]
pub enum ObserveCommand {
    /// Observe a piece of text
    Text {
        #[arg(value_name = "TEXT")]
        text: String,

        /// Producer's own confidence in the input
        #[arg(long, default_value = "0.9")]
        confidence: f64,

        /// Name of the producing source
        #[arg(long, default_value = "cli")]
        source: String,
    },

    /// Observe a pre-computed feature vector
    Vector {
        /// Comma-separated components, e.g. 0.1,0.5,0.9
        #[arg(
            value_name = "VALUES",
            value_delimiter = ',',
            allow_negative_numbers = true,
            required = true
        )]
        values: Vec<f32>,

        /// Input type tag (vision, other, ...)
        #[arg(short = 't', long = "type", default_value = "vision")]
        input_type: String,

        #[arg(long, default_value = "0.5")]
        confidence: f64,

        #[arg(long, default_value = "cli")]
        source: String,
    },
}

impl ObserveCommand {
    pub fn into_event(self) -> PerceptionEvent {
        match self {
            ObserveCommand::Text {
                text,
                confidence,
                source,
            } => PerceptionEvent::text(text, confidence).with_source(source),
            ObserveCommand::Vector {
                values,
                input_type,
                confidence,
                source,
            } => PerceptionEvent::new(input_type, PerceptionData::Vector(values), confidence).with_source(source),
        }
    }
}

pub async fn handle_command(command: ObserveCommand, config_path: Option<PathBuf>) -> Result<()> {
    let engine = Engine::start(config_path).await?;
    let decision = engine
        .service
        .decide(command.into_event())
        .await
        .context("Decision failed")?;

    print_decision(&decision)
}

/// Decision as pretty JSON on stdout, with a colored summary on stderr.
pub(crate) fn print_decision(decision: &Decision) -> Result<()> {
    let summary = match decision {
        Decision::Learn { payload } => format!("learned {}", payload.id).green(),
        Decision::Reinforce { payload, similarity } => {
            format!("recognized {} (similarity {:.3})", payload.id, similarity).cyan()
        }
        Decision::Ask { question, payload } => {
            format!("{} [candidate {}]", question, payload.candidate_id).yellow()
        }
        Decision::Ignore { payload } => format!("ignored: {}", payload.reason).dimmed(),
    };
    eprintln!("{}", summary);

    println!("{}", serde_json::to_string_pretty(decision)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_event() {
        let event = ObserveCommand::Vector {
            values: vec![0.1, -0.5],
            input_type: "frame".to_string(),
            confidence: 0.5,
            source: "camera".to_string(),
        }
        .into_event();

        assert_eq!(event.kind, "frame");
        assert_eq!(event.source, "camera");
        assert_eq!(event.data, PerceptionData::Vector(vec![0.1, -0.5]));
    }
}
