//! Beam search decoding
//!
//! Model-agnostic: the caller supplies a function returning next-token log-probabilities
//! for a decoder prefix, so the search can be exercised without loading a network.

use crate::error::{BrieflyError, Result};
use serde::{Deserialize, Serialize};

/// Decoding parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Beam width
    pub num_beams: usize,
    /// Maximum decoder length, counting the start token
    pub max_length: usize,
    /// Stop as soon as `num_beams` hypotheses have finished
    pub early_stopping: bool,
    /// Finished scores are divided by `generated_len ^ length_penalty`
    pub length_penalty: f32,
    /// Token the decoder starts from
    pub decoder_start_token_id: u32,
    /// End-of-sequence token
    pub eos_token_id: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            num_beams: 4,
            max_length: 150,
            early_stopping: true,
            length_penalty: 1.0,
            decoder_start_token_id: 0,
            eos_token_id: 1,
        }
    }
}

#[derive(Debug, Clone)]
struct Hypothesis {
    tokens: Vec<u32>,
    score: f32,
}

/// Run beam search and return the best generated ids (start and eos tokens removed).
///
/// `next_log_probs` receives the full decoder prefix (start token first) and must return
/// one log-probability per vocabulary entry.
pub fn beam_search<F>(config: &GenerationConfig, mut next_log_probs: F) -> Result<Vec<u32>>
where
    F: FnMut(&[u32]) -> Result<Vec<f32>>,
{
    if config.num_beams == 0 {
        return Err(BrieflyError::MachineLearning(
            "num_beams must be greater than 0".to_string(),
        ));
    }

    let mut beams = vec![Hypothesis {
        tokens: vec![config.decoder_start_token_id],
        score: 0.0,
    }];
    let mut finished: Vec<Hypothesis> = Vec::new();

    while !beams.is_empty() && beams[0].tokens.len() < config.max_length {
        let mut candidates: Vec<Hypothesis> = Vec::with_capacity(beams.len() * config.num_beams * 2);

        for beam in &beams {
            let log_probs = next_log_probs(&beam.tokens)?;
            for (token, log_prob) in top_k(&log_probs, config.num_beams * 2) {
                let mut tokens = beam.tokens.clone();
                tokens.push(token);
                candidates.push(Hypothesis {
                    tokens,
                    score: beam.score + log_prob,
                });
            }
        }

        candidates.sort_by(|a, b| b.score.total_cmp(&a.score));

        let mut next_beams = Vec::with_capacity(config.num_beams);
        for (rank, candidate) in candidates.into_iter().enumerate() {
            let ended = candidate.tokens.last() == Some(&config.eos_token_id);
            if ended {
                // Only eos continuations ranked within the beam width count as finished
                if rank < config.num_beams {
                    finished.push(candidate);
                }
            } else {
                next_beams.push(candidate);
            }
            if next_beams.len() == config.num_beams {
                break;
            }
        }
        beams = next_beams;

        if config.early_stopping && finished.len() >= config.num_beams {
            break;
        }
    }

    // Sequences that hit the length cap compete with the finished ones
    if finished.len() < config.num_beams {
        finished.extend(beams);
    }

    let best = finished
        .into_iter()
        .max_by(|a, b| {
            normalized_score(a, config).total_cmp(&normalized_score(b, config))
        })
        .ok_or_else(|| BrieflyError::MachineLearning("Beam search produced no hypotheses".to_string()))?;

    Ok(best
        .tokens
        .into_iter()
        .skip(1)
        .filter(|&token| token != config.eos_token_id)
        .collect())
}

fn normalized_score(hypothesis: &Hypothesis, config: &GenerationConfig) -> f32 {
    let generated = hypothesis.tokens.len().saturating_sub(1).max(1) as f32;
    hypothesis.score / generated.powf(config.length_penalty)
}

/// Indices and values of the `k` largest entries, highest first
fn top_k(values: &[f32], k: usize) -> Vec<(u32, f32)> {
    let mut indexed: Vec<(u32, f32)> = values
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .map(|(i, &v)| (i as u32, v))
        .collect();
    indexed.sort_by(|a, b| b.1.total_cmp(&a.1));
    indexed.truncate(k);
    indexed
}
