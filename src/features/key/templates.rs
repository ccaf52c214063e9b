//! Krumhansl-Schmuckler key templates
//!
//! Defines tonal profiles for 24 keys (12 major + 12 minor). Each template is
//! the reference profile rotated to its root, mean-centered and L2-normalized,
//! so a dot product with a normalized chroma vector is a Pearson correlation.

use crate::analysis::result::{Key, N_KEYS};
use crate::config::KeyConfig;
use crate::features::chroma::normalization::center_and_normalize;

/// Key templates for all 24 keys, indexed by composite key index
#[derive(Debug, Clone)]
pub struct KeyTemplates {
    templates: Vec<[f32; 12]>,
}

impl KeyTemplates {
    /// Create key templates from the configured major/minor profiles
    pub fn new(config: &KeyConfig) -> Self {
        let templates = (0..N_KEYS)
            .map(|idx| {
                let (profile, root) = if idx < 12 {
                    (&config.major_profile, idx)
                } else {
                    (&config.minor_profile, idx - 12)
                };
                let rotated = rotate(profile, root);
                let normalized = center_and_normalize(&rotated);
                let mut out = [0.0f32; 12];
                out.copy_from_slice(&normalized);
                out
            })
            .collect();
        Self { templates }
    }

    /// Template for a key
    pub fn get(&self, key: Key) -> &[f32; 12] {
        &self.templates[key.index()]
    }

    /// Correlation of an already centered/normalized chroma vector with all 24 keys
    pub fn score(&self, normalized_chroma: &[f32]) -> [f32; N_KEYS] {
        let mut scores = [0.0f32; N_KEYS];
        for (s, t) in scores.iter_mut().zip(self.templates.iter()) {
            *s = crate::array::dot(normalized_chroma, t);
        }
        scores
    }
}

impl Default for KeyTemplates {
    fn default() -> Self {
        Self::new(&KeyConfig::default())
    }
}

/// Rotate a profile so its tonic lands on `root`: `out[j] = profile[(j - root) mod 12]`
fn rotate(profile: &[f32; 12], root: usize) -> [f32; 12] {
    let mut out = [0.0f32; 12];
    for (j, slot) in out.iter_mut().enumerate() {
        *slot = profile[(j + 12 - root % 12) % 12];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_moves_tonic() {
        let config = KeyConfig::default();
        let rotated = rotate(&config.major_profile, 7);
        assert_eq!(rotated[7], config.major_profile[0]);
        assert_eq!(rotated[2], config.major_profile[7]);
    }

    #[test]
    fn test_templates_are_normalized() {
        let templates = KeyTemplates::default();
        for idx in 0..N_KEYS {
            let t = templates.get(Key::from_index(idx).unwrap());
            let norm: f32 = t.iter().map(|x| x * x).sum::<f32>().sqrt();
            assert!((norm - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_template_scores_itself_highest() {
        let templates = KeyTemplates::default();
        for idx in 0..N_KEYS {
            let key = Key::from_index(idx).unwrap();
            let scores = templates.score(templates.get(key));
            let (best, value) = crate::array::argmax(&scores).unwrap();
            assert_eq!(best, idx);
            assert!((value - 1.0).abs() < 1e-5);
        }
    }
}
