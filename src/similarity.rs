//! Cosine similarity between embedding vectors

/// Cosine similarity of two vectors of equal length.
///
/// A zero vector produces a zero denominator, so the result is NaN. No guard is
/// applied; callers receive the raw IEEE 754 value.
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let magnitude_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let magnitude_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    dot / (magnitude_a * magnitude_b)
}

/// Render a similarity as a percentage with two decimals, e.g. `"87.65%"`.
///
/// Ties round half away from zero, so `0.87125` renders as `"87.13%"`.
pub fn similarity_percentage(similarity: f64) -> String {
    let percent = similarity * 100.0;
    format!("{:.2}%", (percent * 100.0).round() / 100.0)
}
