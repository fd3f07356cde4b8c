//! The hesitation network: shared trunk, three independent heads.

use std::collections::BTreeMap;
use std::path::Path;

use candle_core::{DType, Device, Tensor, D};
use candle_nn::{linear, Dropout, Linear, Module, VarBuilder, VarMap};
use neuropilot_core::config::ModelConfig;
use neuropilot_core::errors::ModelError;
use tracing::debug;

use crate::ModelResult;

/// Raw outputs of the three heads, each shaped `[batch, width]`.
#[derive(Debug, Clone)]
pub struct HeadOutputs {
    /// Hesitation probability, `[batch, 1]`.
    pub hesitation: Tensor,
    /// Probability simplex over command classes, `[batch, num_commands]`.
    pub commands: Tensor,
    /// Confidence score, `[batch, 1]`.
    pub confidence: Tensor,
}

/// Feed-forward network with a two-layer trunk and three output heads.
///
/// All parameters live in the owned [`VarMap`], which is what gets saved to
/// and restored from an artifact.
pub struct HesitationNetwork {
    fc1: Linear,
    fc2: Linear,
    trunk_dropout: Dropout,
    hidden_dropout: Dropout,
    hesitation_head: Linear,
    command_head: Linear,
    confidence_head: Linear,
    varmap: VarMap,
    device: Device,
    config: ModelConfig,
}

impl HesitationNetwork {
    /// Build a freshly initialized network on the CPU.
    pub fn new(config: &ModelConfig) -> ModelResult<Self> {
        Self::build(config, VarMap::new(), Device::Cpu).map_err(|e| {
            ModelError::ConstructionFailed {
                reason: e.to_string(),
            }
        })
    }

    /// Build a network and restore its parameters from a safetensors artifact.
    ///
    /// Fails if the file is unreadable, lacks a parameter, or holds a
    /// parameter whose shape differs from `config`.
    pub fn load(config: &ModelConfig, path: &Path) -> ModelResult<Self> {
        let mut network = Self::new(config)?;
        network
            .varmap
            .load(path)
            .map_err(|e| ModelError::LoadFailed {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        debug!(path = %path.display(), "network parameters restored");
        Ok(network)
    }

    fn build(config: &ModelConfig, varmap: VarMap, device: Device) -> candle_core::Result<Self> {
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &device);
        let trunk = vb.pp("trunk");
        let fc1 = linear(config.input_size, config.trunk_size, trunk.pp("fc1"))?;
        let fc2 = linear(config.trunk_size, config.hidden_size, trunk.pp("fc2"))?;
        let hesitation_head = linear(config.hidden_size, 1, vb.pp("hesitation_head"))?;
        let command_head = linear(config.hidden_size, config.num_commands, vb.pp("command_head"))?;
        let confidence_head = linear(config.hidden_size, 1, vb.pp("confidence_head"))?;

        Ok(Self {
            fc1,
            fc2,
            trunk_dropout: Dropout::new(config.trunk_dropout),
            hidden_dropout: Dropout::new(config.hidden_dropout),
            hesitation_head,
            command_head,
            confidence_head,
            varmap,
            device,
            config: config.clone(),
        })
    }

    /// Forward pass over a `[batch, input_size]` tensor.
    ///
    /// Dropout is applied only when `train` is true.
    pub fn forward_t(&self, xs: &Tensor, train: bool) -> candle_core::Result<HeadOutputs> {
        let h = self.fc1.forward(xs)?.relu()?;
        let h = self.trunk_dropout.forward(&h, train)?;
        let h = self.fc2.forward(&h)?.relu()?;
        let h = self.hidden_dropout.forward(&h, train)?;

        Ok(HeadOutputs {
            hesitation: sigmoid(&self.hesitation_head.forward(&h)?)?,
            commands: candle_nn::ops::softmax(&self.command_head.forward(&h)?, D::Minus1)?,
            confidence: sigmoid(&self.confidence_head.forward(&h)?)?,
        })
    }

    /// Inference on a single feature vector, detached from the autograd graph.
    pub fn infer(&self, features: &[f32]) -> ModelResult<HeadOutputs> {
        let forward = || -> candle_core::Result<HeadOutputs> {
            let xs = Tensor::from_slice(features, (1, features.len()), &self.device)?;
            let out = self.forward_t(&xs, false)?;
            Ok(HeadOutputs {
                hesitation: out.hesitation.detach(),
                commands: out.commands.detach(),
                confidence: out.confidence.detach(),
            })
        };
        forward().map_err(|e| ModelError::ForwardFailed {
            reason: e.to_string(),
        })
    }

    /// Write all parameters to a safetensors file at `path`.
    pub fn save(&self, path: &Path) -> candle_core::Result<()> {
        self.varmap.save(path)
    }

    /// Every parameter flattened, keyed by name.
    pub fn named_parameters(&self) -> ModelResult<BTreeMap<String, Vec<f32>>> {
        let data = self
            .varmap
            .data()
            .lock()
            .map_err(|e| ModelError::ConstructionFailed {
                reason: format!("parameter map lock poisoned: {e}"),
            })?;

        let mut params = BTreeMap::new();
        for (name, var) in data.iter() {
            let values = var
                .as_tensor()
                .flatten_all()
                .and_then(|t| t.to_vec1::<f32>())
                .map_err(|e| ModelError::ConstructionFailed {
                    reason: format!("reading parameter {name}: {e}"),
                })?;
            params.insert(name.clone(), values);
        }
        Ok(params)
    }

    /// Total number of scalar parameters.
    pub fn parameter_count(&self) -> usize {
        self.varmap
            .all_vars()
            .iter()
            .map(|v| v.as_tensor().elem_count())
            .sum()
    }

    pub fn varmap(&self) -> &VarMap {
        &self.varmap
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }
}

/// Logistic sigmoid built from differentiable primitives.
fn sigmoid(xs: &Tensor) -> candle_core::Result<Tensor> {
    xs.neg()?.exp()?.affine(1.0, 1.0)?.recip()
}
