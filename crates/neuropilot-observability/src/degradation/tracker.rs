//! Record every degradation event: component, failure mode, fallback used, timestamp, recovery status.

use std::collections::VecDeque;

use neuropilot_core::models::DegradationEvent;

/// Oldest events are dropped past this many.
pub const MAX_TRACKED_EVENTS: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecoveryStatus {
    /// Still in degraded mode.
    Active,
    /// Recovered to normal operation.
    Recovered,
}

#[derive(Debug, Clone)]
struct TrackedDegradation {
    event: DegradationEvent,
    recovery_status: RecoveryStatus,
}

/// Tracks degradation events per component.
#[derive(Debug, Clone, Default)]
pub struct DegradationTracker {
    events: VecDeque<TrackedDegradation>,
}

impl DegradationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new degradation event.
    pub fn record(&mut self, event: DegradationEvent) {
        crate::tracing_setup::events::degradation_triggered(
            &event.component,
            &event.failure,
            &event.fallback_used,
        );
        if self.events.len() == MAX_TRACKED_EVENTS {
            self.events.pop_front();
        }
        self.events.push_back(TrackedDegradation {
            event,
            recovery_status: RecoveryStatus::Active,
        });
    }

    /// Mark every active degradation of a component as recovered.
    ///
    /// Returns the number of events that changed status.
    pub fn mark_recovered(&mut self, component: &str) -> usize {
        let mut recovered = 0;
        for tracked in self.events.iter_mut() {
            if tracked.event.component == component
                && tracked.recovery_status == RecoveryStatus::Active
            {
                tracked.recovery_status = RecoveryStatus::Recovered;
                recovered += 1;
            }
        }
        if recovered > 0 {
            crate::tracing_setup::events::degradation_recovered(component);
        }
        recovered
    }

    /// Whether a component currently has an unrecovered degradation.
    pub fn is_degraded(&self, component: &str) -> bool {
        self.events.iter().any(|t| {
            t.event.component == component && t.recovery_status == RecoveryStatus::Active
        })
    }
}
