//! Span definitions per operation: prediction, model load, training, HTTP request.

/// Create a prediction span.
#[macro_export]
macro_rules! prediction_span {
    ($model_version:expr) => {
        tracing::info_span!("neuropilot.prediction", model_version = ?$model_version)
    };
}

/// Create a model load span.
#[macro_export]
macro_rules! model_load_span {
    ($requested:expr) => {
        tracing::info_span!("neuropilot.model_load", requested = %$requested)
    };
}

/// Create a training span.
#[macro_export]
macro_rules! training_span {
    ($version:expr, $epochs:expr) => {
        tracing::info_span!("neuropilot.training", version = %$version, epochs = $epochs)
    };
}

/// Create an HTTP request span.
#[macro_export]
macro_rules! http_request_span {
    ($request_id:expr, $method:expr, $path:expr) => {
        tracing::info_span!(
            "neuropilot.http",
            request_id = %$request_id,
            method = %$method,
            path = %$path
        )
    };
}
