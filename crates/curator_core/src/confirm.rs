use tracing::debug;

/// Wraps destructive actions behind an explicit confirmation step.
///
/// At most one action is pending at a time. A new `request` replaces the
/// pending action (last request wins) instead of queuing, so destructive
/// actions are never silently queued or executed out of order. `confirm`
/// hands the action to the caller for exactly-once execution.
#[derive(Debug, Default)]
pub struct ConfirmationGate<A> {
    pending: Option<A>,
}

impl<A> ConfirmationGate<A> {
    pub fn new() -> Self {
        Self { pending: None }
    }

    /// Returns the displaced action if an earlier request was still pending.
    pub fn request(&mut self, action: A) -> Option<A> {
        let displaced = self.pending.replace(action);
        if displaced.is_some() {
            debug!("gate: pending confirmation replaced by a newer request");
        }
        displaced
    }

    pub fn confirm(&mut self) -> Option<A> {
        self.pending.take()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn pending(&self) -> Option<&A> {
        self.pending.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_request_wins_over_earlier_pending_action() {
        let mut gate = ConfirmationGate::new();
        assert!(gate.request("delete-1").is_none());
        assert_eq!(gate.request("delete-2"), Some("delete-1"));

        assert_eq!(gate.confirm(), Some("delete-2"));
        // The displaced action must never run.
        assert_eq!(gate.confirm(), None);
    }

    #[test]
    fn cancel_clears_without_executing() {
        let mut gate = ConfirmationGate::new();
        gate.request("delete-1");
        gate.cancel();
        assert!(!gate.is_pending());
        assert_eq!(gate.confirm(), None);
    }
}
