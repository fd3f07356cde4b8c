//! Head outputs → plain-data prediction result.

use candle_core::Tensor;
use neuropilot_core::errors::PredictionError;
use neuropilot_core::models::PredictionResult;
use neuropilot_model::HeadOutputs;

/// Convert raw head outputs for a single sample into a result.
///
/// `hesitation` is true only when the probability is strictly above
/// `threshold`. Suggestions are the `max_suggestions` most likely command
/// indices, most likely first, ties broken by the lower index.
pub fn format_outputs(
    outputs: &HeadOutputs,
    threshold: f32,
    max_suggestions: usize,
) -> Result<PredictionResult, PredictionError> {
    let hesitation = scalar(&outputs.hesitation, "hesitation")?;
    let confidence = scalar(&outputs.confidence, "confidence")?;
    let commands = probabilities(&outputs.commands, "command")?;

    Ok(PredictionResult {
        hesitation: hesitation > threshold,
        confidence: f64::from(confidence),
        suggested_commands: top_indices(&commands, max_suggestions),
    })
}

/// Indices of the `k` largest values, descending, ties by lower index.
pub fn top_indices(values: &[f32], k: usize) -> Vec<usize> {
    let mut indexed: Vec<(usize, f32)> = values.iter().copied().enumerate().collect();
    indexed.sort_by(|(ia, a), (ib, b)| b.total_cmp(a).then(ia.cmp(ib)));
    indexed.into_iter().take(k).map(|(i, _)| i).collect()
}

fn scalar(tensor: &Tensor, head: &str) -> Result<f32, PredictionError> {
    match probabilities(tensor, head)?.as_slice() {
        [value] => Ok(*value),
        _ => Err(invalid(head)),
    }
}

fn probabilities(tensor: &Tensor, head: &str) -> Result<Vec<f32>, PredictionError> {
    let values = tensor
        .flatten_all()
        .and_then(|t| t.to_vec1::<f32>())
        .map_err(|e| PredictionError::InferenceFailed {
            reason: format!("reading {head} head: {e}"),
        })?;
    if values.iter().all(|v| v.is_finite() && (0.0..=1.0).contains(v)) {
        Ok(values)
    } else {
        Err(invalid(head))
    }
}

fn invalid(head: &str) -> PredictionError {
    PredictionError::InvalidOutput {
        head: head.to_string(),
    }
}
