//! Per-instance verification result cache.
//!
//! Holds the most recent *successful* outcome for one client instance. This
//! is client-object state with explicit get/clear operations, never a
//! process-wide singleton. Under concurrent calls the slot follows a
//! last-success-completes-wins policy.

use std::sync::{Mutex, MutexGuard};

use crate::client::responses::VerificationOutcome;

/// Slot for the owning client's most recent successful verification.
#[derive(Debug, Default)]
pub struct LastVerification {
    slot: Mutex<Option<VerificationOutcome>>,
}

impl LastVerification {
    /// Create an empty slot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful outcome. Callers gate on `success`; a failed
    /// verification never reaches this slot.
    pub(crate) fn store(&self, outcome: VerificationOutcome) {
        *self.lock() = Some(outcome);
    }

    /// The most recent successful outcome, if any.
    pub fn last(&self) -> Option<VerificationOutcome> {
        self.lock().clone()
    }

    /// True iff a cached outcome exists and reports success.
    pub fn is_authenticated(&self) -> bool {
        self.lock().as_ref().is_some_and(|outcome| outcome.success)
    }

    /// Reset to the uninitialized state.
    pub fn clear(&self) {
        *self.lock() = None;
    }

    fn lock(&self) -> MutexGuard<'_, Option<VerificationOutcome>> {
        self.slot.lock().expect("verification cache lock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::responses::{VerificationOutcome, WireResponse};

    fn successful_outcome() -> VerificationOutcome {
        let wire: WireResponse =
            serde_json::from_str(r#"{"code": "KEY_VALID", "message": "ok"}"#).unwrap();
        VerificationOutcome::classify(wire)
    }

    #[test]
    fn starts_empty() {
        let cache = LastVerification::new();
        assert!(cache.last().is_none());
        assert!(!cache.is_authenticated());
    }

    #[test]
    fn store_then_read_back() {
        let cache = LastVerification::new();
        let outcome = successful_outcome();

        cache.store(outcome.clone());

        let cached = cache.last().expect("cache should hold an outcome");
        assert_eq!(cached.code, outcome.code);
        assert_eq!(cached.timestamp, outcome.timestamp);
        assert!(cache.is_authenticated());
    }

    #[test]
    fn clear_resets_to_empty() {
        let cache = LastVerification::new();
        cache.store(successful_outcome());

        cache.clear();

        assert!(cache.last().is_none());
        assert!(!cache.is_authenticated());
    }

    #[test]
    fn later_store_overwrites() {
        let cache = LastVerification::new();

        let first = successful_outcome();
        cache.store(first);

        let mut second = successful_outcome();
        second.message = "second".to_string();
        cache.store(second);

        assert_eq!(cache.last().unwrap().message, "second");
    }
}
