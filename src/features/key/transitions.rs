//! Key transition model
//!
//! A 24-state Markov chain over keys. Staying in the current key dominates;
//! modulations to the relative, dominant/subdominant and parallel keys are
//! weighted above an arbitrary jump.

use crate::analysis::result::{Key, N_KEYS};
use crate::config::KeyHmmParams;

/// Build the row-stochastic 24x24 key transition matrix
///
/// Row `i` holds `P(next = j | current = i)` for composite key indices.
///
/// # Example
///
/// ```
/// use solfege_dsp::config::KeyHmmParams;
/// use solfege_dsp::features::key::build_transition_matrix;
///
/// let trans = build_transition_matrix(&KeyHmmParams::default());
/// for row in &trans {
///     assert!((row.iter().sum::<f64>() - 1.0).abs() < 1e-12);
/// }
/// ```
pub fn build_transition_matrix(params: &KeyHmmParams) -> Vec<Vec<f64>> {
    let mut trans = vec![vec![params.floor_prob; N_KEYS]; N_KEYS];

    for (i, row) in trans.iter_mut().enumerate() {
        let Some(key) = Key::from_index(i) else {
            continue;
        };
        row[i] = params.stable_prob;
        row[key.dominant().index()] = params.fifth_prob;
        row[key.subdominant().index()] = params.fifth_prob;
        row[key.relative().index()] = params.relative_prob;
        row[key.parallel().index()] = params.parallel_prob;
    }

    for row in trans.iter_mut() {
        let sum: f64 = row.iter().sum();
        if sum > 0.0 {
            row.iter_mut().for_each(|p| *p /= sum);
        } else {
            row.iter_mut().for_each(|p| *p = 1.0 / N_KEYS as f64);
        }
    }

    trans
}

/// Initial key distribution: uniform with a boosted prior on the global key
pub fn initial_distribution(global_key: Key, params: &KeyHmmParams) -> Vec<f64> {
    let mut p_init = vec![params.init_prob; N_KEYS];
    p_init[global_key.index()] = params.init_global_prob;

    let sum: f64 = p_init.iter().sum();
    if sum > 0.0 {
        p_init.iter_mut().for_each(|p| *p /= sum);
    } else {
        p_init.iter_mut().for_each(|p| *p = 1.0 / N_KEYS as f64);
    }
    p_init
}
