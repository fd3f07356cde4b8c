//! Structured event helpers shared across crates.

/// Emit a warning when a component falls back to degraded behavior.
pub fn degradation_triggered(component: &str, failure: &str, fallback: &str) {
    tracing::warn!(
        component = component,
        failure = failure,
        fallback = fallback,
        "degradation triggered"
    );
}

/// Emit an info event when a component leaves degraded mode.
pub fn degradation_recovered(component: &str) {
    tracing::info!(component = component, "degradation recovered");
}
