pub mod active_version;
pub mod degradation_event;
pub mod model_status;
pub mod prediction_result;
pub mod telemetry;

pub use active_version::ActiveVersion;
pub use degradation_event::DegradationEvent;
pub use model_status::ModelStatus;
pub use prediction_result::{PredictionOutcome, PredictionResult};
pub use telemetry::Telemetry;
