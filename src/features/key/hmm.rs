//! HMM Viterbi decoding
//!
//! Finds the most likely hidden-state sequence given per-step emission
//! probabilities, a transition matrix and an initial distribution. Runs in the
//! log domain; every probability is offset by a tiny epsilon before the log so
//! zero entries stay finite.

use crate::error::AnalysisError;

/// Offset added before taking logs
const EPSILON: f64 = f64::MIN_POSITIVE;

/// Most likely state path
///
/// # Arguments
///
/// * `emissions` - `emissions[t][s]` = P(observation t | state s)
/// * `transition` - `transition[i][j]` = P(state j at t+1 | state i at t)
/// * `p_init` - Initial state distribution
///
/// # Returns
///
/// One state index per step (empty for empty input). Ties resolve to the
/// lowest state index.
///
/// # Errors
///
/// Returns `AnalysisError::InputShapeMismatch` if dimensions disagree
pub fn viterbi(
    emissions: &[Vec<f64>],
    transition: &[Vec<f64>],
    p_init: &[f64],
) -> Result<Vec<usize>, AnalysisError> {
    let n_states = p_init.len();
    if transition.len() != n_states || transition.iter().any(|r| r.len() != n_states) {
        return Err(AnalysisError::InputShapeMismatch(format!(
            "transition matrix must be {}x{}",
            n_states, n_states
        )));
    }
    if let Some((t, row)) = emissions
        .iter()
        .enumerate()
        .find(|(_, r)| r.len() != n_states)
    {
        return Err(AnalysisError::InputShapeMismatch(format!(
            "emission row {} has {} states, expected {}",
            t,
            row.len(),
            n_states
        )));
    }
    if emissions.is_empty() || n_states == 0 {
        return Ok(Vec::new());
    }

    log::debug!(
        "Viterbi decoding: {} steps x {} states",
        emissions.len(),
        n_states
    );

    let ln = |p: f64| (p + EPSILON).ln();
    let log_trans: Vec<Vec<f64>> = transition
        .iter()
        .map(|row| row.iter().map(|&p| ln(p)).collect())
        .collect();

    let mut value: Vec<f64> = p_init
        .iter()
        .zip(emissions[0].iter())
        .map(|(&p, &e)| ln(p) + ln(e))
        .collect();
    let mut backpointers: Vec<Vec<usize>> = Vec::with_capacity(emissions.len());
    backpointers.push(vec![0; n_states]);

    for obs in emissions.iter().skip(1) {
        let mut next = vec![f64::NEG_INFINITY; n_states];
        let mut back = vec![0usize; n_states];
        for (j, slot) in next.iter_mut().enumerate() {
            let mut best = f64::NEG_INFINITY;
            let mut best_prev = 0;
            for (i, &v) in value.iter().enumerate() {
                let score = v + log_trans[i][j];
                if score > best {
                    best = score;
                    best_prev = i;
                }
            }
            *slot = best + ln(obs[j]);
            back[j] = best_prev;
        }
        value = next;
        backpointers.push(back);
    }

    let mut state = 0;
    let mut best = f64::NEG_INFINITY;
    for (s, &v) in value.iter().enumerate() {
        if v > best {
            best = v;
            state = s;
        }
    }

    let mut path = vec![state; emissions.len()];
    for t in (1..emissions.len()).rev() {
        path[t - 1] = backpointers[t][path[t]];
    }

    Ok(path)
}
