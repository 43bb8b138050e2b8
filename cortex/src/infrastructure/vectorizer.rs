// Copyright (c) 2026 NE-AI Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Feature extraction for perception events.
//!
//! Text goes through a TF-IDF model fitted on a reference corpus; frames are
//! reduced to a small normalized grayscale thumbnail. Neither is a learned
//! embedding: they only need to be deterministic and cheap.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::domain::{CognitionError, Frame, InputKind, KnowledgeContent, PerceptionData};

/// Words of two or more word characters.
static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b\w\w+\b").unwrap());

fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    TOKEN_PATTERN
        .find_iter(&lowered)
        .map(|m| m.as_str().to_string())
        .collect()
}

/// TF-IDF text vectorizer with a vocabulary fixed at fit time.
#[derive(Debug, Clone, Default)]
pub struct TextVectorizer {
    /// term -> column, columns assigned in sorted term order
    vocabulary: BTreeMap<String, usize>,
    idf: Vec<f64>,
    documents: usize,
}

impl TextVectorizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fit the vocabulary and IDF weights. Replaces any previous fit.
    pub fn fit<S: AsRef<str>>(&mut self, corpus: &[S]) -> Result<(), CognitionError> {
        let tokenized: Vec<BTreeSet<String>> = corpus
            .iter()
            .map(|doc| tokenize(doc.as_ref()).into_iter().collect())
            .collect();

        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();
        for terms in &tokenized {
            for term in terms {
                *document_frequency.entry(term.clone()).or_insert(0) += 1;
            }
        }

        if document_frequency.is_empty() {
            return Err(CognitionError::CorpusNotFitted);
        }

        let n_docs = corpus.len() as f64;
        let mut vocabulary = BTreeMap::new();
        let mut idf = Vec::with_capacity(document_frequency.len());
        for (column, (term, df)) in document_frequency.into_iter().enumerate() {
            // Smoothed IDF: every term behaves as if seen in one extra document.
            idf.push(((1.0 + n_docs) / (1.0 + df as f64)).ln() + 1.0);
            vocabulary.insert(term, column);
        }

        debug!(
            documents = corpus.len(),
            vocabulary_size = vocabulary.len(),
            "Fitted text vectorizer"
        );

        self.vocabulary = vocabulary;
        self.idf = idf;
        self.documents = corpus.len();
        Ok(())
    }

    pub fn is_fitted(&self) -> bool {
        !self.vocabulary.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn documents(&self) -> usize {
        self.documents
    }

    /// L2-normalized TF-IDF vector; all zeros when no term is in the vocabulary.
    pub fn transform(&self, text: &str) -> Result<Vec<f32>, CognitionError> {
        if !self.is_fitted() {
            return Err(CognitionError::CorpusNotFitted);
        }

        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        for token in tokenize(text) {
            if let Some(&column) = self.vocabulary.get(&token) {
                *counts.entry(column).or_insert(0.0) += 1.0;
            }
        }

        let mut weights = vec![0.0f64; self.vocabulary.len()];
        for (column, count) in counts {
            weights[column] = count * self.idf[column];
        }

        let norm = weights.iter().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for w in &mut weights {
                *w /= norm;
            }
        }

        Ok(weights.into_iter().map(|w| w as f32).collect())
    }
}

/// Reduces frames to `resolution x resolution` grayscale values in `[0, 1]`.
#[derive(Debug, Clone)]
pub struct FrameVectorizer {
    resolution: u32,
}

impl FrameVectorizer {
    pub fn new(resolution: u32) -> Self {
        Self {
            resolution: resolution.max(1),
        }
    }

    pub fn dimension(&self) -> usize {
        (self.resolution * self.resolution) as usize
    }

    pub fn vectorize(&self, frame: &Frame) -> Result<Vec<f32>, CognitionError> {
        if frame.width == 0 || frame.height == 0 {
            return Err(CognitionError::MalformedInput(format!(
                "frame has zero size ({}x{})",
                frame.width, frame.height
            )));
        }
        if !matches!(frame.channels, 1 | 3 | 4) {
            return Err(CognitionError::MalformedInput(format!(
                "unsupported channel count {}",
                frame.channels
            )));
        }
        let expected = frame.expected_len().ok_or_else(|| {
            CognitionError::MalformedInput(format!(
                "frame size {}x{}x{} overflows",
                frame.width, frame.height, frame.channels
            ))
        })?;
        if frame.pixels.len() != expected {
            return Err(CognitionError::MalformedInput(format!(
                "frame buffer has {} bytes, expected {}",
                frame.pixels.len(),
                expected
            )));
        }

        let width = frame.width as usize;
        let height = frame.height as usize;
        let channels = frame.channels as usize;
        let resolution = self.resolution as usize;

        let gray = |x: usize, y: usize| -> f64 {
            let offset = (y * width + x) * channels;
            let px = &frame.pixels[offset..offset + channels];
            match channels {
                1 => px[0] as f64,
                // BGR(A) byte order
                _ => 0.114 * px[0] as f64 + 0.587 * px[1] as f64 + 0.299 * px[2] as f64,
            }
        };

        let mut out = Vec::with_capacity(resolution * resolution);
        for oy in 0..resolution {
            let y0 = oy * height / resolution;
            let y1 = ((oy + 1) * height / resolution).max(y0 + 1).min(height);
            for ox in 0..resolution {
                let x0 = ox * width / resolution;
                let x1 = ((ox + 1) * width / resolution).max(x0 + 1).min(width);

                let mut sum = 0.0;
                for y in y0..y1 {
                    for x in x0..x1 {
                        sum += gray(x, y);
                    }
                }
                let area = ((y1 - y0) * (x1 - x0)) as f64;
                out.push(((sum / area) / 255.0).clamp(0.0, 1.0) as f32);
            }
        }

        Ok(out)
    }
}

/// Dispatches perception data to the right extractor.
#[derive(Debug, Clone)]
pub struct Vectorizer {
    text: TextVectorizer,
    frame: FrameVectorizer,
}

impl Vectorizer {
    pub fn new(frame_resolution: u32) -> Self {
        Self {
            text: TextVectorizer::new(),
            frame: FrameVectorizer::new(frame_resolution),
        }
    }

    pub fn fit_text<S: AsRef<str>>(&mut self, corpus: &[S]) -> Result<(), CognitionError> {
        self.text.fit(corpus)
    }

    pub fn text(&self) -> &TextVectorizer {
        &self.text
    }

    /// Vectorize an incoming event body of the given kind.
    pub fn vectorize(&self, kind: InputKind, data: &PerceptionData) -> Result<Vec<f32>, CognitionError> {
        match (kind, data) {
            (InputKind::Vision, PerceptionData::Text(_)) => Err(CognitionError::MalformedInput(
                "vision input carries text instead of a frame or feature vector".to_string(),
            )),
            (InputKind::Text, PerceptionData::Frame(_)) => Err(CognitionError::MalformedInput(
                "text input carries a frame".to_string(),
            )),
            (_, PerceptionData::Text(text)) => self.text.transform(text),
            (_, PerceptionData::Frame(frame)) => self.frame.vectorize(frame),
            (_, PerceptionData::Vector(values)) => check_features(values).map(|_| values.clone()),
        }
    }

    /// Vectorize a stored memory so it can be compared with a query.
    pub fn vectorize_content(&self, content: &KnowledgeContent) -> Result<Vec<f32>, CognitionError> {
        match content {
            KnowledgeContent::Text(text) => self.text.transform(text),
            KnowledgeContent::Features(values) => Ok(values.clone()),
        }
    }
}

fn check_features(values: &[f32]) -> Result<(), CognitionError> {
    if values.is_empty() {
        return Err(CognitionError::MalformedInput("empty feature vector".to_string()));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(CognitionError::MalformedInput(
            "feature vector contains non-finite values".to_string(),
        ));
    }
    Ok(())
}
