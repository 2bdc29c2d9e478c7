//! Session gate: the login state machine in front of the report.
//!
//! # Overview
//!
//! The gate owns a single [`SessionState`] and the credential-check flow:
//! - [`SessionGate::submit`] starts a check that resolves after a simulated delay
//! - [`SessionGate::poll`] resolves the pending check once its deadline passes
//! - [`SessionGate::logout`] returns to `Unauthenticated` synchronously
//!
//! The actual comparison is delegated to a [`CredentialVerifier`], so the
//! accepted pair is injected configuration rather than a compiled-in global.
//!
//! # Example
//!
//! ```
//! use polaris::gate::{Credential, SessionGate, SessionState};
//! use std::time::{Duration, Instant};
//!
//! let credential = Credential::new("digital-era", "digital_era@sina.com");
//! let mut gate = SessionGate::new(Box::new(credential), Duration::from_millis(1500));
//!
//! let start = Instant::now();
//! gate.submit("digital-era", "digital_era@sina.com", start);
//! assert_eq!(gate.state(), SessionState::Authenticating);
//!
//! gate.poll(start + Duration::from_millis(1500));
//! assert_eq!(gate.state(), SessionState::Authenticated);
//! ```

pub mod credential;
pub mod session;

pub use credential::{Credential, CredentialVerifier, DEFAULT_IDENTIFIER, DEFAULT_VERIFIER};
pub use session::{
    AttemptId, GateError, SessionGate, SessionState, SubmitOutcome, DEFAULT_LOGIN_DELAY,
};
