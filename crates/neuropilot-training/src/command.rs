//! The `train` command: generate data, fit, save under a version.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use neuropilot_core::config::TrainingConfig;
use neuropilot_core::errors::{ModelError, TrainingError};
use neuropilot_model::{HesitationNetwork, ModelManager, ParameterStore};
use neuropilot_observability::training_span;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{error, info};

use crate::dataset::SyntheticDataset;
use crate::trainer::{EpochReport, Trainer};
use crate::TrainingResult;

/// Summary of a completed training run.
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub version: String,
    pub artifact: PathBuf,
    pub epoch_losses: Vec<f32>,
    pub elapsed: Duration,
}

impl TrainingReport {
    pub fn final_loss(&self) -> Option<f32> {
        self.epoch_losses.last().copied()
    }
}

/// Train a fresh network and save it as `config.model_version`.
///
/// The saved version becomes "current" in the store; the manager's live
/// model is not replaced. A failure leaves the store untouched.
pub fn run_training<F>(
    config: &TrainingConfig,
    manager: &ModelManager,
    on_report: F,
) -> TrainingResult<TrainingReport>
where
    F: FnMut(&EpochReport),
{
    let version = config.model_version.as_str();
    let _span = training_span!(version, config.epochs).entered();
    let started = Instant::now();

    let result = train_and_save(config, manager, on_report);
    match &result {
        Ok(report) => info!(
            version,
            artifact = %report.artifact.display(),
            final_loss = ?report.final_loss(),
            elapsed_ms = report.elapsed.as_millis() as u64,
            "training finished"
        ),
        Err(e) => error!(version, error = %e, elapsed_ms = started.elapsed().as_millis() as u64, "training failed"),
    }
    result
}

fn train_and_save<F>(
    config: &TrainingConfig,
    manager: &ModelManager,
    on_report: F,
) -> TrainingResult<TrainingReport>
where
    F: FnMut(&EpochReport),
{
    let started = Instant::now();
    ParameterStore::validate_version(&config.model_version).map_err(ModelError::from)?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let dataset = SyntheticDataset::generate(config.num_samples, config.label_threshold, &mut rng);
    if dataset.is_empty() {
        return Err(TrainingError::EmptyDataset);
    }
    info!(
        samples = dataset.len(),
        positive_fraction = dataset.positive_fraction(),
        "synthetic dataset generated"
    );

    let network = HesitationNetwork::new(manager.config())?;
    let epoch_losses = Trainer::new(&network, config).fit(&dataset, &mut rng, on_report)?;
    let artifact = manager.save(&network, &config.model_version)?;

    Ok(TrainingReport {
        version: config.model_version.clone(),
        artifact,
        epoch_losses,
        elapsed: started.elapsed(),
    })
}
