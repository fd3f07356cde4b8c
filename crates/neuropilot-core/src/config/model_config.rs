use serde::{Deserialize, Serialize};

use super::defaults;

/// Shape of the hesitation network. Artifacts only load into a network
/// built from the same shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Width of the feature vector.
    pub input_size: usize,
    /// Output width of the first trunk layer.
    pub trunk_size: usize,
    /// Output width of the second trunk layer (shared by all heads).
    pub hidden_size: usize,
    /// Number of command classes scored by the command head.
    pub num_commands: usize,
    /// Dropout after the first trunk layer (training only).
    pub trunk_dropout: f32,
    /// Dropout after the second trunk layer (training only).
    pub hidden_dropout: f32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            input_size: defaults::DEFAULT_INPUT_SIZE,
            trunk_size: defaults::DEFAULT_TRUNK_SIZE,
            hidden_size: defaults::DEFAULT_HIDDEN_SIZE,
            num_commands: defaults::DEFAULT_NUM_COMMANDS,
            trunk_dropout: defaults::DEFAULT_TRUNK_DROPOUT,
            hidden_dropout: defaults::DEFAULT_HIDDEN_DROPOUT,
        }
    }
}
