//! Single-shot timer measured in milliseconds since boot.
//!
//! Holds only a deadline; whoever owns it decides when to check it.  On
//! target the gesture task sleeps until the earliest deadline, on the
//! host a test drives `now_ms` by hand.

/// One-shot timer with restart semantics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OneShotTimer {
    period_ms: u64,
    deadline_ms: Option<u64>,
}

impl OneShotTimer {
    pub const fn new(period_ms: u64) -> Self {
        Self {
            period_ms,
            deadline_ms: None,
        }
    }

    /// (Re)start the timer.  Any pending expiry is discarded and the full
    /// period runs again from `now_ms`.
    pub fn start(&mut self, now_ms: u64) {
        self.deadline_ms = Some(now_ms.saturating_add(self.period_ms));
    }

    /// Cancel the timer.  Returns `true` if an expiry was pending.
    pub fn stop(&mut self) -> bool {
        self.deadline_ms.take().is_some()
    }

    pub fn deadline(&self) -> Option<u64> {
        self.deadline_ms
    }

    /// `true` once `now_ms` has reached a pending deadline.
    pub fn is_due(&self, now_ms: u64) -> bool {
        matches!(self.deadline_ms, Some(d) if d <= now_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_timer_is_idle() {
        let t = OneShotTimer::new(5_000);
        assert_eq!(t.deadline(), None);
        assert!(!t.is_due(u64::MAX));
    }

    #[test]
    fn start_sets_deadline_one_period_out() {
        let mut t = OneShotTimer::new(5_000);
        t.start(1_000);
        assert_eq!(t.deadline(), Some(6_000));
        assert!(!t.is_due(5_999));
        assert!(t.is_due(6_000));
    }

    #[test]
    fn restart_replaces_deadline() {
        let mut t = OneShotTimer::new(5_000);
        t.start(0);
        t.start(3_000);
        assert_eq!(t.deadline(), Some(8_000));
        assert!(!t.is_due(5_000));
    }

    #[test]
    fn stop_reports_whether_pending() {
        let mut t = OneShotTimer::new(18_000);
        assert!(!t.stop());
        t.start(0);
        assert!(t.stop());
        assert_eq!(t.deadline(), None);
    }

    #[test]
    fn deadline_saturates() {
        let mut t = OneShotTimer::new(18_000);
        t.start(u64::MAX - 1);
        assert_eq!(t.deadline(), Some(u64::MAX));
    }
}
