use voxgate::domain::similarity::score;
use voxgate::domain::{EmbeddingVector, ScoreError};

fn vector(values: &[f32]) -> EmbeddingVector {
    EmbeddingVector::new(values.to_vec())
}

#[test]
fn given_identical_vectors_when_scoring_then_similarity_is_one() {
    let a = vector(&[0.3, -1.2, 4.0]);

    let result = score(&a, &a.clone()).unwrap();

    assert!((result.similarity - 1.0).abs() < 1e-9);
    assert!(result.distance.abs() < 1e-9);
}

#[test]
fn given_orthogonal_vectors_when_scoring_then_similarity_is_zero() {
    let result = score(&vector(&[1.0, 0.0]), &vector(&[0.0, 1.0])).unwrap();

    assert!(result.similarity.abs() < 1e-9);
    assert!((result.distance - 1.0).abs() < 1e-9);
}

#[test]
fn given_opposite_vectors_when_scoring_then_distance_is_two() {
    let result = score(&vector(&[1.0, 2.0]), &vector(&[-1.0, -2.0])).unwrap();

    assert!((result.distance - 2.0).abs() < 1e-9);
    assert!((result.similarity + 1.0).abs() < 1e-9);
}

#[test]
fn given_scaled_vector_when_scoring_then_magnitude_is_ignored() {
    let result = score(&vector(&[1.0, 2.0, 3.0]), &vector(&[10.0, 20.0, 30.0])).unwrap();

    assert!((result.similarity - 1.0).abs() < 1e-9);
}

#[test]
fn given_swapped_arguments_when_scoring_then_result_is_symmetric() {
    let a = vector(&[0.2, 0.9, -0.4]);
    let b = vector(&[0.5, -0.1, 0.7]);

    assert_eq!(score(&a, &b).unwrap(), score(&b, &a).unwrap());
}

#[test]
fn given_different_dimensions_when_scoring_then_returns_dimension_mismatch() {
    let result = score(&vector(&[1.0, 0.0]), &vector(&[1.0, 0.0, 0.0]));

    assert_eq!(
        result,
        Err(ScoreError::DimensionMismatch { left: 2, right: 3 })
    );
}

#[test]
fn given_zero_vector_when_scoring_then_returns_degenerate() {
    let result = score(&vector(&[0.0, 0.0]), &vector(&[1.0, 0.0]));

    assert!(matches!(result, Err(ScoreError::DegenerateEmbedding(_))));
}

#[test]
fn given_nan_component_when_scoring_then_returns_degenerate() {
    let result = score(&vector(&[f32::NAN, 1.0]), &vector(&[1.0, 0.0]));

    assert!(matches!(result, Err(ScoreError::DegenerateEmbedding(_))));
}

#[test]
fn given_empty_vectors_when_scoring_then_returns_degenerate() {
    let result = score(&vector(&[]), &vector(&[]));

    assert!(matches!(result, Err(ScoreError::DegenerateEmbedding(_))));
}
