/// Neuropilot service version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the alias that resolves to the active artifact version.
pub const CURRENT_ALIAS: &str = "current";

/// File name of the alias record inside the parameter store.
pub const ALIAS_RECORD_FILENAME: &str = "current.json";

/// Suffix appended to a version label to form its artifact file name.
pub const ARTIFACT_SUFFIX: &str = "_model.safetensors";

/// Number of features produced by the extractor. Fixed by the network's input layer.
pub const FEATURE_COUNT: usize = 4;

/// Component name used in degradation events raised by the prediction engine.
pub const PREDICTION_COMPONENT: &str = "prediction_engine";
