use chrono::Utc;
use neuropilot_core::models::DegradationEvent;
use neuropilot_observability::degradation::tracker::MAX_TRACKED_EVENTS;
use neuropilot_observability::DegradationTracker;

fn event(component: &str, failure: &str) -> DegradationEvent {
    DegradationEvent {
        component: component.to_string(),
        failure: failure.to_string(),
        fallback_used: "neutral prediction".to_string(),
        timestamp: Utc::now(),
    }
}

#[test]
fn new_tracker_is_healthy() {
    let tracker = DegradationTracker::new();
    assert!(!tracker.is_degraded("prediction_engine"));
}

#[test]
fn record_then_recover() {
    let mut tracker = DegradationTracker::new();
    tracker.record(event("prediction_engine", "no model available"));
    tracker.record(event("prediction_engine", "inference failed"));
    tracker.record(event("model_manager", "artifact missing"));

    assert!(tracker.is_degraded("prediction_engine"));
    assert_eq!(tracker.mark_recovered("prediction_engine"), 2);
    assert!(!tracker.is_degraded("prediction_engine"));
    assert!(tracker.is_degraded("model_manager"));

    // Already recovered events are not counted again.
    assert_eq!(tracker.mark_recovered("prediction_engine"), 0);
}

#[test]
fn recovering_a_healthy_component_changes_nothing() {
    let mut tracker = DegradationTracker::new();
    assert_eq!(tracker.mark_recovered("prediction_engine"), 0);
}

#[test]
fn degradation_after_recovery_is_active_again() {
    let mut tracker = DegradationTracker::new();
    tracker.record(event("prediction_engine", "a"));
    tracker.mark_recovered("prediction_engine");
    tracker.record(event("prediction_engine", "b"));
    assert!(tracker.is_degraded("prediction_engine"));
    assert_eq!(tracker.mark_recovered("prediction_engine"), 1);
}

#[test]
fn oldest_events_are_dropped_past_the_cap() {
    let mut tracker = DegradationTracker::new();
    for i in 0..MAX_TRACKED_EVENTS + 10 {
        tracker.record(event("prediction_engine", &format!("failure {i}")));
    }
    assert_eq!(tracker.mark_recovered("prediction_engine"), MAX_TRACKED_EVENTS);
}
