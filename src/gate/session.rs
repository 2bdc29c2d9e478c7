//! Session state machine.
//!
//! ```text
//!   Unauthenticated --submit--> Authenticating --match----> Authenticated
//!          ^                          |                          |
//!          +--------mismatch----------+                          |
//!          +-------------------------logout----------------------+
//! ```
//!
//! The credential check is deferred by a fixed delay. The delay is a
//! deadline, not a sleep: the owner calls [`SessionGate::poll`] from its
//! event loop and the check resolves on the first poll at or after the
//! deadline. Every attempt carries an [`AttemptId`]; a completion for an
//! attempt that is no longer pending is discarded, so a late result can
//! never reopen a session after logout.

use std::time::{Duration, Instant};

use thiserror::Error;

use super::credential::CredentialVerifier;

/// Simulated latency of a credential check.
pub const DEFAULT_LOGIN_DELAY: Duration = Duration::from_millis(1500);

/// Authentication state of the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// No session; the login form is shown.
    #[default]
    Unauthenticated,
    /// A credential check is pending; the submit control is disabled.
    Authenticating,
    /// The report is visible.
    Authenticated,
}

impl SessionState {
    /// Check if the report may be shown.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated)
    }

    /// Check if a credential check is in flight.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Authenticating)
    }
}

/// Errors surfaced by the session gate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GateError {
    /// The submitted pair did not match the configured credential.
    #[error("authentication failed: invalid credentials or no access")]
    InvalidCredentials,
}

/// Identifies one submitted credential check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttemptId(u64);

/// Result of calling [`SessionGate::submit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A new check was started and will resolve after the delay.
    Pending(AttemptId),
    /// The submit was dropped because a check is already pending or the
    /// session is already open.
    Ignored,
}

/// A check waiting for its deadline.
struct PendingAttempt {
    id: AttemptId,
    identifier: String,
    verifier: String,
    ready_at: Instant,
}

/// Owner of the [`SessionState`] and the credential-check flow.
///
/// One gate per viewer instance; nothing here is global.
pub struct SessionGate {
    verifier: Box<dyn CredentialVerifier>,
    delay: Duration,
    state: SessionState,
    pending: Option<PendingAttempt>,
    next_attempt: u64,
    error: Option<GateError>,
}

impl std::fmt::Debug for SessionGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGate")
            .field("state", &self.state)
            .field("delay", &self.delay)
            .field("pending", &self.pending.as_ref().map(|p| p.id))
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl SessionGate {
    /// Create a gate in the `Unauthenticated` state.
    ///
    /// # Arguments
    ///
    /// * `verifier` - Decides which pairs are accepted
    /// * `delay` - Simulated latency before a submitted pair is checked
    #[must_use]
    pub fn new(verifier: Box<dyn CredentialVerifier>, delay: Duration) -> Self {
        Self {
            verifier,
            delay,
            state: SessionState::Unauthenticated,
            pending: None,
            next_attempt: 0,
            error: None,
        }
    }

    /// Get the current session state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Check if the session is open.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    /// Get the configured check delay.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Get the error from the last resolved attempt, if it failed.
    #[must_use]
    pub fn last_error(&self) -> Option<&GateError> {
        self.error.as_ref()
    }

    /// Get the id of the pending attempt, if any.
    #[must_use]
    pub fn pending_attempt(&self) -> Option<AttemptId> {
        self.pending.as_ref().map(|p| p.id)
    }

    /// Submit a credential pair.
    ///
    /// Starts a check that resolves on the first [`poll`](Self::poll) at or
    /// after `now + delay`. Any previous error is cleared. A submit while a
    /// check is pending, or while already authenticated, is ignored.
    pub fn submit(&mut self, identifier: &str, verifier: &str, now: Instant) -> SubmitOutcome {
        match self.state {
            SessionState::Authenticating | SessionState::Authenticated => {
                log::debug!("Submit ignored in state {:?}", self.state);
                return SubmitOutcome::Ignored;
            }
            SessionState::Unauthenticated => {}
        }

        let id = AttemptId(self.next_attempt);
        self.next_attempt += 1;

        self.error = None;
        self.pending = Some(PendingAttempt {
            id,
            identifier: identifier.to_string(),
            verifier: verifier.to_string(),
            ready_at: now + self.delay,
        });
        self.transition(SessionState::Authenticating);

        SubmitOutcome::Pending(id)
    }

    /// Resolve the pending attempt if its deadline has passed.
    ///
    /// Returns `None` when nothing was resolved, otherwise the outcome of the
    /// check that just completed.
    pub fn poll(&mut self, now: Instant) -> Option<Result<(), GateError>> {
        let due = self.pending.as_ref().filter(|p| now >= p.ready_at)?.id;
        self.complete(due)
    }

    /// Apply the result of attempt `id`, regardless of its deadline.
    ///
    /// This is the timer callback: it is a no-op returning `None` unless `id`
    /// is still the pending attempt. Results of cancelled or superseded
    /// attempts are discarded.
    pub fn complete(&mut self, id: AttemptId) -> Option<Result<(), GateError>> {
        if self.pending.as_ref().map(|p| p.id) != Some(id) {
            log::trace!("Discarding stale completion for {:?}", id);
            return None;
        }
        let attempt = self.pending.take()?;

        if self.verifier.verify(&attempt.identifier, &attempt.verifier) {
            self.error = None;
            self.transition(SessionState::Authenticated);
            log::info!("Session opened");
            Some(Ok(()))
        } else {
            self.error = Some(GateError::InvalidCredentials);
            self.transition(SessionState::Unauthenticated);
            Some(Err(GateError::InvalidCredentials))
        }
    }

    /// Close the session.
    ///
    /// From `Authenticated` this returns to `Unauthenticated` immediately.
    /// A pending check is cancelled the same way. From `Unauthenticated`
    /// this is a no-op. Returns `true` if the state changed.
    pub fn logout(&mut self) -> bool {
        match self.state {
            SessionState::Unauthenticated => false,
            SessionState::Authenticating | SessionState::Authenticated => {
                self.pending = None;
                self.error = None;
                self.transition(SessionState::Unauthenticated);
                log::info!("Session closed");
                true
            }
        }
    }

    fn transition(&mut self, next: SessionState) {
        log::debug!("Session transition: {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::Credential;

    const DELAY: Duration = Duration::from_millis(1500);

    fn gate() -> SessionGate {
        SessionGate::new(Box::new(Credential::default()), DELAY)
    }

    #[test]
    fn test_gate_starts_unauthenticated() {
        let gate = gate();
        assert_eq!(gate.state(), SessionState::Unauthenticated);
        assert!(gate.last_error().is_none());
        assert!(gate.pending_attempt().is_none());
    }

    #[test]
    fn test_submit_enters_authenticating() {
        let mut gate = gate();
        let outcome = gate.submit("digital-era", "digital_era@sina.com", Instant::now());
        assert!(matches!(outcome, SubmitOutcome::Pending(_)));
        assert_eq!(gate.state(), SessionState::Authenticating);
    }

    #[test]
    fn test_poll_before_deadline_does_nothing() {
        let mut gate = gate();
        let start = Instant::now();
        gate.submit("digital-era", "digital_era@sina.com", start);

        assert!(gate.poll(start + Duration::from_millis(1499)).is_none());
        assert_eq!(gate.state(), SessionState::Authenticating);
    }

    #[test]
    fn test_poll_at_deadline_resolves() {
        let mut gate = gate();
        let start = Instant::now();
        gate.submit("digital-era", "digital_era@sina.com", start);

        assert_eq!(gate.poll(start + DELAY), Some(Ok(())));
        assert_eq!(gate.state(), SessionState::Authenticated);
    }

    #[test]
    fn test_mismatch_sets_error() {
        let mut gate = gate();
        let start = Instant::now();
        gate.submit("Digital-Era", "digital_era@sina.com", start);

        assert_eq!(
            gate.poll(start + DELAY),
            Some(Err(GateError::InvalidCredentials))
        );
        assert_eq!(gate.state(), SessionState::Unauthenticated);
        assert_eq!(gate.last_error(), Some(&GateError::InvalidCredentials));
    }

    #[test]
    fn test_resubmit_clears_error() {
        let mut gate = gate();
        let start = Instant::now();
        gate.submit("wrong", "wrong", start);
        gate.poll(start + DELAY);
        assert!(gate.last_error().is_some());

        gate.submit("digital-era", "digital_era@sina.com", start + DELAY);
        assert!(gate.last_error().is_none());
    }

    #[test]
    fn test_submit_while_pending_is_ignored() {
        let mut gate = gate();
        let start = Instant::now();
        let first = gate.submit("wrong", "wrong", start);
        let second = gate.submit("digital-era", "digital_era@sina.com", start);

        assert!(matches!(first, SubmitOutcome::Pending(_)));
        assert_eq!(second, SubmitOutcome::Ignored);
    }

    #[test]
    fn test_complete_stale_attempt_is_discarded() {
        let mut gate = gate();
        let start = Instant::now();
        let SubmitOutcome::Pending(id) = gate.submit("digital-era", "digital_era@sina.com", start)
        else {
            panic!("expected pending attempt");
        };

        assert!(gate.logout());
        assert_eq!(gate.complete(id), None);
        assert_eq!(gate.state(), SessionState::Unauthenticated);
    }

    #[test]
    fn test_logout_from_unauthenticated_is_noop() {
        let mut gate = gate();
        assert!(!gate.logout());
        assert_eq!(gate.state(), SessionState::Unauthenticated);
    }

    #[test]
    fn test_error_message_text() {
        assert_eq!(
            GateError::InvalidCredentials.to_string(),
            "authentication failed: invalid credentials or no access"
        );
    }

    #[test]
    fn test_debug_does_not_leak_pending_credentials() {
        let mut gate = gate();
        gate.submit("digital-era", "very-secret", Instant::now());
        let debug = format!("{:?}", gate);
        assert!(!debug.contains("very-secret"));
    }

    #[test]
    fn test_session_state_helpers() {
        assert!(SessionState::Authenticated.is_authenticated());
        assert!(!SessionState::Authenticating.is_authenticated());
        assert!(SessionState::Authenticating.is_pending());
        assert!(!SessionState::Unauthenticated.is_pending());
    }
}
