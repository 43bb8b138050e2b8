// Copyright (c) 2026 NE-AI Contributors
// SPDX-License-Identifier: AGPL-3.0

//! Nearest-neighbour search over memory vectors.

/// Calculate cosine similarity between two vectors.
///
/// Vectors of different length, or with zero magnitude, score 0.0.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }

    let dot_product: f64 = a.iter().zip(b.iter()).map(|(x, y)| *x as f64 * *y as f64).sum();
    let magnitude_a: f64 = a.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt();
    let magnitude_b: f64 = b.iter().map(|x| (*x as f64) * (*x as f64)).sum::<f64>().sqrt();

    if magnitude_a == 0.0 || magnitude_b == 0.0 {
        return 0.0;
    }

    dot_product / (magnitude_a * magnitude_b)
}

/// Find the candidate most similar to `query`.
///
/// The scan starts from `(0.0, None)` and only a strictly greater score
/// replaces the best match, so ties resolve to the earliest candidate and
/// candidates scoring 0.0 or less are never reported.
pub fn find_most_similar<V: AsRef<[f32]>>(query: &[f32], candidates: &[V]) -> (f64, Option<usize>) {
    let mut best_score = 0.0;
    let mut best_index = None;

    for (index, candidate) in candidates.iter().enumerate() {
        let score = cosine_similarity(query, candidate.as_ref());
        if score > best_score {
            best_score = score;
            best_index = Some(index);
        }
    }

    (best_score, best_index)
}
