// Copyright (c) 2026 NE-AI Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Normalized perception events handed to the engine by capture, upload and
//! OCR producers.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raw frame buffer, row-major, interleaved channels (1 = gray, 3 = BGR,
/// 4 = BGRA).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub pixels: Vec<u8>,
}

impl Frame {
    pub fn new(width: u32, height: u32, channels: u8, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            channels,
            pixels,
        }
    }

    /// Buffer length implied by the header, `None` if it does not fit in memory.
    pub fn expected_len(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(self.channels as usize)
    }
}

/// Event body: text, a frame to be reduced to features, or features that a
/// producer already extracted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PerceptionData {
    Text(String),
    Frame(Frame),
    Vector(Vec<f32>),
}

impl PerceptionData {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PerceptionData::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// One unit of sensed input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerceptionEvent {
    /// Producer tag; mapped onto [`InputKind`](super::InputKind) by the policy.
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(default)]
    pub source: String,

    pub data: PerceptionData,

    /// Producer-stated base confidence.
    #[serde(default)]
    pub confidence: f64,

    #[serde(default)]
    pub meta: Map<String, Value>,
}

impl PerceptionEvent {
    pub fn new(kind: impl Into<String>, data: PerceptionData, confidence: f64) -> Self {
        Self {
            kind: kind.into(),
            source: String::new(),
            data,
            confidence,
            meta: Map::new(),
        }
    }

    pub fn text(text: impl Into<String>, confidence: f64) -> Self {
        Self::new("text", PerceptionData::Text(text.into()), confidence)
    }

    pub fn frame(frame: Frame, confidence: f64) -> Self {
        Self::new("vision", PerceptionData::Frame(frame), confidence)
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    pub fn with_meta(mut self, key: impl Into<String>, value: Value) -> Self {
        self.meta.insert(key.into(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_from_producer_json() {
        let json = r#"{"type":"text","source":"ocr","data":"abrir janela","confidence":0.7}"#;
        let event: PerceptionEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.kind, "text");
        assert_eq!(event.source, "ocr");
        assert_eq!(event.data.as_text(), Some("abrir janela"));
        assert!(event.meta.is_empty());
    }

    #[test]
    fn test_event_data_variants() {
        let vector: PerceptionEvent =
            serde_json::from_str(r#"{"type":"vision","data":[0.1,0.2]}"#).unwrap();
        assert_eq!(vector.data, PerceptionData::Vector(vec![0.1, 0.2]));
        assert_eq!(vector.confidence, 0.0);

        let frame: PerceptionEvent = serde_json::from_str(
            r#"{"type":"frame","data":{"width":1,"height":1,"channels":1,"pixels":[255]}}"#,
        )
        .unwrap();
        assert!(matches!(frame.data, PerceptionData::Frame(ref f) if f.expected_len() == Some(1)));
    }
}
