//! # neuropilot-model
//!
//! The hesitation network and everything needed to keep one trained copy of
//! it live in the process.
//!
//! ## Network
//!
//! | Stage | Layers |
//! |-------|--------|
//! | Trunk | `Linear(4→64) → ReLU → Dropout(0.2) → Linear(64→128) → ReLU → Dropout(0.3)` |
//! | Hesitation head | `Linear(128→1) → sigmoid` |
//! | Command head | `Linear(128→N) → softmax` |
//! | Confidence head | `Linear(128→1) → sigmoid` |
//!
//! ## Parameter store
//!
//! One `<version>_model.safetensors` per version plus a `current.json` alias
//! record. Both are written to a temp file and renamed into place.

pub mod manager;
pub mod network;
pub mod store;

use neuropilot_core::errors::ModelError;

pub use manager::{LoadedModel, ModelManager};
pub use network::{HeadOutputs, HesitationNetwork};
pub use store::ParameterStore;

/// Result type for model operations.
pub type ModelResult<T> = Result<T, ModelError>;
