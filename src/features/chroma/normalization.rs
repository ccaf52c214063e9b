//! Chroma normalization strategies

/// Numerical stability epsilon added to norms
const EPSILON: f32 = 1e-10;

/// Mean-center and L2-normalize a chroma vector (or key template)
///
/// After centering, the dot product of two normalized vectors is their
/// Pearson correlation.
///
/// # Arguments
///
/// * `chroma` - 12-element vector
///
/// # Returns
///
/// Centered, unit-norm vector (all zeros for a flat input)
pub fn center_and_normalize(chroma: &[f32]) -> Vec<f32> {
    if chroma.is_empty() {
        return Vec::new();
    }
    let mean = chroma.iter().sum::<f32>() / chroma.len() as f32;
    let centered: Vec<f32> = chroma.iter().map(|&x| x - mean).collect();
    let norm = centered.iter().map(|x| x * x).sum::<f32>().sqrt() + EPSILON;
    centered.iter().map(|&x| x / norm).collect()
}
