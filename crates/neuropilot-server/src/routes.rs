//! Endpoint dispatch: `/ml/predict/` and `/ml/status/`.

use std::sync::Arc;

use neuropilot_core::traits::IPredictor;
use serde_json::{json, Value};
use tracing::{error, warn};

use crate::http::{Request, Response};
use crate::runtime::NeuropilotRuntime;

/// Endpoint a request resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Predict,
    Status,
    MethodNotAllowed { allow: &'static str },
    NotFound,
}

/// Match method and path. The trailing slash is optional.
pub fn resolve(method: &str, path: &str) -> Route {
    let normalized = path.strip_suffix('/').unwrap_or(path);
    match (normalized, method) {
        ("/ml/predict", "POST") => Route::Predict,
        ("/ml/predict", _) => Route::MethodNotAllowed { allow: "POST" },
        ("/ml/status", "GET") => Route::Status,
        ("/ml/status", _) => Route::MethodNotAllowed { allow: "GET" },
        _ => Route::NotFound,
    }
}

/// Produce the response for one request.
pub async fn handle(runtime: Arc<NeuropilotRuntime>, request: Request) -> Response {
    match resolve(&request.method, &request.path) {
        Route::Predict => predict(runtime, &request.body).await,
        Route::Status => status(&runtime),
        Route::MethodNotAllowed { allow } => {
            Response::error(405, format!("method {} not allowed", request.method)).with_allow(allow)
        }
        Route::NotFound => Response::error(404, format!("no route for {}", request.path)),
    }
}

async fn predict(runtime: Arc<NeuropilotRuntime>, body: &[u8]) -> Response {
    let telemetry: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(e) => {
            warn!(error = %e, "rejecting predict request with invalid JSON");
            return Response::error(500, e.to_string());
        }
    };

    // The forward pass is CPU-bound.
    let worker = Arc::clone(&runtime);
    let outcome = match tokio::task::spawn_blocking(move || worker.engine.predict(&telemetry)).await
    {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(error = %e, "prediction task failed");
            return Response::error(500, "prediction task failed");
        }
    };

    Response::json(
        200,
        json!({
            "success": true,
            "prediction": outcome.result,
            "model_loaded": runtime.engine.is_loaded(),
        }),
    )
}

fn status(runtime: &NeuropilotRuntime) -> Response {
    match serde_json::to_value(runtime.engine.status()) {
        Ok(body) => Response::json(200, body),
        Err(e) => Response::error(500, e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_optional() {
        assert_eq!(resolve("POST", "/ml/predict/"), Route::Predict);
        assert_eq!(resolve("POST", "/ml/predict"), Route::Predict);
        assert_eq!(resolve("GET", "/ml/status/"), Route::Status);
        assert_eq!(resolve("GET", "/ml/status"), Route::Status);
    }

    #[test]
    fn wrong_method_is_not_allowed() {
        assert_eq!(
            resolve("GET", "/ml/predict/"),
            Route::MethodNotAllowed { allow: "POST" }
        );
        assert_eq!(
            resolve("DELETE", "/ml/status"),
            Route::MethodNotAllowed { allow: "GET" }
        );
    }

    #[test]
    fn unknown_paths_are_not_found() {
        for path in ["/", "/ml", "/ml/predict/extra", "/ml/status//", "/admin"] {
            assert_eq!(resolve("GET", path), Route::NotFound, "{path}");
        }
    }
}
