//! Minimum-interval gate for reconciliation requests.

use std::time::{Duration, Instant};

/// Admits at most one reconciliation per minimum interval.
///
/// The timestamp advances when a diff is *applied*, not when an event is
/// admitted. Events arriving while a reconciliation is in flight are
/// still judged against the last applied timestamp, so reconciliations
/// may overlap once the interval boundary is crossed mid-flight.
///
/// Rejected events are dropped entirely: no queueing, no coalescing.
#[derive(Debug)]
pub struct ThrottleGate {
    min_interval: Duration,
    last_reconcile: Option<Instant>,
}

impl ThrottleGate {
    /// Create a gate that admits immediately on its first event.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_reconcile: None,
        }
    }

    /// Whether an event at `now` may trigger a reconciliation.
    pub fn admit(&self, now: Instant) -> bool {
        match self.last_reconcile {
            None => true,
            Some(last) => now.duration_since(last) >= self.min_interval,
        }
    }

    /// Record the completion of an applied reconciliation.
    pub fn record(&mut self, completed_at: Instant) {
        self.last_reconcile = Some(completed_at);
    }

    /// The configured minimum interval.
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_gate_admits_immediately() {
        let gate = ThrottleGate::new(Duration::from_millis(100));
        assert!(gate.admit(Instant::now()));
    }

    #[test]
    fn test_event_spacing_zero_fifty_one_fifty() {
        // Events at t=0ms, t=50ms, t=150ms with a 100ms interval:
        // exactly t=0 and t=150 are admitted.
        let mut gate = ThrottleGate::new(Duration::from_millis(100));
        let base = Instant::now();

        assert!(gate.admit(base));
        gate.record(base);

        assert!(!gate.admit(base + Duration::from_millis(50)));
        assert!(gate.admit(base + Duration::from_millis(150)));
    }

    #[test]
    fn test_exact_interval_boundary_is_admitted() {
        let mut gate = ThrottleGate::new(Duration::from_millis(100));
        let base = Instant::now();
        gate.record(base);

        assert!(!gate.admit(base + Duration::from_millis(99)));
        assert!(gate.admit(base + Duration::from_millis(100)));
    }

    #[test]
    fn test_record_resets_the_window() {
        let mut gate = ThrottleGate::new(Duration::from_millis(100));
        let base = Instant::now();

        gate.record(base);
        let applied_at = base + Duration::from_millis(150);
        gate.record(applied_at);

        assert!(!gate.admit(applied_at + Duration::from_millis(50)));
        assert!(gate.admit(applied_at + Duration::from_millis(100)));
    }
}
