use super::embedding::EmbeddingVector;

const NORM_EPSILON: f64 = 1e-12;

/// Cosine distance between two speaker embeddings and the similarity derived
/// from it. Higher similarity means more likely the same speaker; no decision
/// threshold is applied here.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityResult {
    pub distance: f64,
    pub similarity: f64,
}

impl SimilarityResult {
    fn from_distance(distance: f64) -> Self {
        let distance = distance.clamp(0.0, 2.0);
        Self {
            distance,
            similarity: 1.0 - distance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoreError {
    #[error("embedding dimensions differ: {left} vs {right}")]
    DimensionMismatch { left: usize, right: usize },
    #[error("degenerate embedding: {0}")]
    DegenerateEmbedding(&'static str),
}

pub fn score(a: &EmbeddingVector, b: &EmbeddingVector) -> Result<SimilarityResult, ScoreError> {
    if a.dimensions() != b.dimensions() {
        return Err(ScoreError::DimensionMismatch {
            left: a.dimensions(),
            right: b.dimensions(),
        });
    }
    if a.dimensions() == 0 {
        return Err(ScoreError::DegenerateEmbedding("empty vector"));
    }
    if !a.is_finite() || !b.is_finite() {
        return Err(ScoreError::DegenerateEmbedding("non-finite component"));
    }

    let norm_a = a.norm();
    let norm_b = b.norm();
    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(ScoreError::DegenerateEmbedding("zero norm"));
    }

    let cosine = a.dot(b) / (norm_a * norm_b).max(NORM_EPSILON);

    Ok(SimilarityResult::from_distance(1.0 - cosine))
}
