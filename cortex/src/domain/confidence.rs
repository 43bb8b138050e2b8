// Copyright (c) 2026 NE-AI Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Confidence model: a relevance heuristic blended with the producer's stated
//! base confidence. Both functions are pure and always land in `[0, 1]`.

use super::engine_config::RelevanceConfig;
use super::knowledge::{unit_clamp, InputKind};
use super::perception::PerceptionData;

/// Heuristic importance of an input.
///
/// Longer texts are treated as more relevant; frames and other inputs get
/// fixed weights.
pub fn relevance(kind: InputKind, data: &PerceptionData, weights: &RelevanceConfig) -> f64 {
    match kind {
        InputKind::Text => {
            let length = data.as_text().map(|text| text.chars().count()).unwrap_or(0);
            text_relevance(length, weights.text_length_divisor)
        }
        InputKind::Vision => unit_clamp(weights.vision),
        InputKind::Other => unit_clamp(weights.other),
    }
}

/// `min(1, length / divisor)`
pub fn text_relevance(length: usize, divisor: f64) -> f64 {
    if divisor <= 0.0 {
        return 1.0;
    }
    unit_clamp(length as f64 / divisor)
}

/// `clamp((relevance + base_confidence) / 2, 0, 1)`
pub fn confidence(relevance: f64, base_confidence: f64) -> f64 {
    let relevance = if relevance.is_nan() { 0.0 } else { relevance };
    let base = if base_confidence.is_nan() { 0.0 } else { base_confidence };
    unit_clamp((relevance + base) / 2.0)
}
