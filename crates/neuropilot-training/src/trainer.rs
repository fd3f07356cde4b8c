//! Mini-batch training loop for the hesitation head.

use candle_core::Tensor;
use candle_nn::{AdamW, Optimizer, ParamsAdamW};
use neuropilot_core::config::TrainingConfig;
use neuropilot_core::errors::TrainingError;
use neuropilot_model::HesitationNetwork;
use rand::Rng;
use tracing::debug;

use crate::dataset::SyntheticDataset;
use crate::{tensor_error, TrainingResult};

/// Keeps `ln` finite at saturated probabilities.
const PROBABILITY_EPSILON: f32 = 1e-7;

/// Average loss of one epoch, handed to the progress callback.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EpochReport {
    /// 1-based.
    pub epoch: usize,
    pub epochs: usize,
    pub average_loss: f32,
}

/// Fits a network in place.
///
/// Only the hesitation head's loss is optimized; the command and
/// confidence heads receive no gradient and keep their initialization.
pub struct Trainer<'a> {
    network: &'a HesitationNetwork,
    config: &'a TrainingConfig,
}

impl<'a> Trainer<'a> {
    pub fn new(network: &'a HesitationNetwork, config: &'a TrainingConfig) -> Self {
        Self { network, config }
    }

    /// Run every epoch and return the average loss of each.
    ///
    /// `on_report` is called every `report_every` epochs.
    pub fn fit<R, F>(
        &self,
        dataset: &SyntheticDataset,
        rng: &mut R,
        mut on_report: F,
    ) -> TrainingResult<Vec<f32>>
    where
        R: Rng + ?Sized,
        F: FnMut(&EpochReport),
    {
        if dataset.is_empty() {
            return Err(TrainingError::EmptyDataset);
        }

        let params = ParamsAdamW {
            lr: self.config.learning_rate,
            weight_decay: 0.0,
            ..Default::default()
        };
        let mut optimizer =
            AdamW::new(self.network.varmap().all_vars(), params).map_err(tensor_error)?;

        let epochs = self.config.epochs;
        let mut epoch_losses = Vec::with_capacity(epochs);
        for epoch in 1..=epochs {
            let mut total = 0.0f32;
            let mut batches = 0usize;

            for indices in dataset.shuffled_batches(self.config.batch_size, rng) {
                let (xs, ys) = dataset.batch_tensors(&indices, self.network.device())?;
                let outputs = self.network.forward_t(&xs, true).map_err(tensor_error)?;
                let loss = binary_cross_entropy(&outputs.hesitation, &ys).map_err(tensor_error)?;

                optimizer
                    .backward_step(&loss)
                    .map_err(|e| TrainingError::OptimizerStep {
                        epoch,
                        reason: e.to_string(),
                    })?;
                total += loss.to_scalar::<f32>().map_err(tensor_error)?;
                batches += 1;
            }

            let average_loss = total / batches as f32;
            if !average_loss.is_finite() {
                return Err(TrainingError::Diverged { epoch });
            }
            debug!(epoch, average_loss, "epoch finished");
            epoch_losses.push(average_loss);

            if self.config.report_every > 0 && epoch % self.config.report_every == 0 {
                on_report(&EpochReport {
                    epoch,
                    epochs,
                    average_loss,
                });
            }
        }
        Ok(epoch_losses)
    }
}

/// Mean binary cross-entropy between probabilities and 0/1 targets.
pub fn binary_cross_entropy(probs: &Tensor, targets: &Tensor) -> candle_core::Result<Tensor> {
    let probs = probs.clamp(PROBABILITY_EPSILON, 1.0 - PROBABILITY_EPSILON)?;
    let positive = targets.mul(&probs.log()?)?;
    let negative = targets
        .affine(-1.0, 1.0)?
        .mul(&probs.affine(-1.0, 1.0)?.log()?)?;
    positive.add(&negative)?.mean_all()?.neg()
}

#[cfg(test)]
mod tests {
    use super::*;
    use candle_core::Device;

    fn tensor(values: &[f32]) -> Tensor {
        Tensor::from_slice(values, (values.len(), 1), &Device::Cpu).unwrap()
    }

    #[test]
    fn bce_matches_closed_form() {
        let loss = binary_cross_entropy(&tensor(&[0.9, 0.2]), &tensor(&[1.0, 0.0]))
            .unwrap()
            .to_scalar::<f32>()
            .unwrap();
        let expected = -((0.9f32).ln() + (0.8f32).ln()) / 2.0;
        assert!((loss - expected).abs() < 1e-5, "{loss} vs {expected}");
    }

    #[test]
    fn bce_is_finite_at_saturation() {
        let loss = binary_cross_entropy(&tensor(&[1.0, 0.0]), &tensor(&[0.0, 1.0]))
            .unwrap()
            .to_scalar::<f32>()
            .unwrap();
        assert!(loss.is_finite());
        assert!(loss > 10.0);
    }
}
