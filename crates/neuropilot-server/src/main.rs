//! `neuropilot` binary: serve predictions, train a model, or load one.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use neuropilot_core::constants::VERSION;
use neuropilot_core::NeuropilotConfig;
use neuropilot_model::ModelManager;
use neuropilot_observability::init_tracing;
use neuropilot_server::{bind, serve, NeuropilotRuntime};
use neuropilot_training::run_training;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "neuropilot", version, about = "Hesitation prediction service")]
struct Cli {
    /// Path to a TOML config file (default: ./neuropilot.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the prediction endpoints over HTTP
    Serve {
        /// Socket address to bind (overrides server.bind_addr)
        #[arg(long)]
        bind: Option<String>,
    },
    /// Train a model on synthetic data and make it current
    Train {
        /// Number of training epochs
        #[arg(long)]
        epochs: Option<usize>,
        /// AdamW learning rate
        #[arg(long)]
        learning_rate: Option<f64>,
        /// Version label the trained model is saved under
        #[arg(long)]
        model_version: Option<String>,
        /// Seed for data generation and shuffling
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Load a saved model to check that it is usable
    Load {
        /// Version to load, or "current"
        #[arg(long, default_value = "current")]
        model_version: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match NeuropilotConfig::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    if cli.verbose {
        config.observability.log_level = "debug".to_string();
    }
    init_tracing(&config.observability);

    let result = match cli.command {
        Command::Serve { bind: bind_addr } => {
            if let Some(addr) = bind_addr {
                config.server.bind_addr = addr;
            }
            run_server(config)
        }
        Command::Train {
            epochs,
            learning_rate,
            model_version,
            seed,
        } => {
            if let Some(epochs) = epochs {
                config.training.epochs = epochs;
            }
            if let Some(lr) = learning_rate {
                config.training.learning_rate = lr;
            }
            if let Some(version) = model_version {
                config.training.model_version = version;
            }
            if seed.is_some() {
                config.training.seed = seed;
            }
            config
                .validate()
                .context("invalid training options")
                .and_then(|()| train(&config))
        }
        Command::Load { model_version } => load(&config, &model_version),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("command failed: {e:#}");
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run_server(config: NeuropilotConfig) -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new().context("failed to start async runtime")?;
    runtime.block_on(async move {
        let addr = config.server.bind_addr.clone();
        let listener = bind(&addr)
            .await
            .with_context(|| format!("failed to bind {addr}"))?;
        let service = NeuropilotRuntime::new(config).context("failed to start service")?;
        info!(version = VERSION, "neuropilot started");

        tokio::select! {
            result = serve(service, listener) => result.context("server stopped"),
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown requested");
                Ok(())
            }
        }
    })
}

fn train(config: &NeuropilotConfig) -> anyhow::Result<()> {
    let manager = ModelManager::new(&config.store, config.model.clone());
    println!(
        "Training model {} for {} epochs",
        config.training.model_version, config.training.epochs
    );

    match run_training(&config.training, &manager, |report| {
        println!(
            "Epoch [{}/{}], Loss: {:.4}",
            report.epoch, report.epochs, report.average_loss
        );
    }) {
        Ok(report) => {
            println!(
                "Model trained and saved successfully as {} ({})",
                report.version,
                report.artifact.display()
            );
            Ok(())
        }
        Err(e) => Err(anyhow::Error::new(e).context("Failed to train model")),
    }
}

fn load(config: &NeuropilotConfig, version: &str) -> anyhow::Result<()> {
    let manager = ModelManager::new(&config.store, config.model.clone());
    let loaded = manager
        .try_load(version)
        .with_context(|| format!("Failed to load model {version}"))?;
    println!("Model {} loaded successfully", loaded.version());
    Ok(())
}
