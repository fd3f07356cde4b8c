// Single source of truth for all default values.

// --- Model ---
pub const DEFAULT_INPUT_SIZE: usize = 4;
pub const DEFAULT_TRUNK_SIZE: usize = 64;
pub const DEFAULT_HIDDEN_SIZE: usize = 128;
pub const DEFAULT_NUM_COMMANDS: usize = 20;
pub const DEFAULT_TRUNK_DROPOUT: f32 = 0.2;
pub const DEFAULT_HIDDEN_DROPOUT: f32 = 0.3;

// --- Parameter store ---
pub const DEFAULT_STORE_ROOT: &str = "trained_models";

// --- Prediction ---
pub const DEFAULT_HISTORY_CAPACITY: usize = 15;
pub const DEFAULT_HESITATION_THRESHOLD: f32 = 0.5;
pub const DEFAULT_MAX_SUGGESTIONS: usize = 3;

// --- Training ---
pub const DEFAULT_EPOCHS: usize = 10;
pub const DEFAULT_LEARNING_RATE: f64 = 0.001;
pub const DEFAULT_MODEL_VERSION: &str = "v1.0";
pub const DEFAULT_BATCH_SIZE: usize = 32;
pub const DEFAULT_NUM_SAMPLES: usize = 1_000;
pub const DEFAULT_REPORT_EVERY: usize = 5;
pub const DEFAULT_LABEL_THRESHOLD: f32 = 0.7;

// --- Server ---
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8000";
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 5;

// --- Observability ---
pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_JSON_LOGS: bool = false;
