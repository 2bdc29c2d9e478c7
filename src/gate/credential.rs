//! Credential checking.
//!
//! The gate never compares strings itself; it asks a [`CredentialVerifier`].
//! The stock implementation is [`Credential`], a single plaintext pair.
//!
//! A plaintext pair held by the client is not a security boundary. It keeps
//! casual readers out of the report and nothing more.

use serde::{Deserialize, Serialize};

/// Identifier accepted when no credential is configured.
pub const DEFAULT_IDENTIFIER: &str = "digital-era";

/// Verifier accepted when no credential is configured.
pub const DEFAULT_VERIFIER: &str = "digital_era@sina.com";

/// Decides whether an `(identifier, verifier)` pair grants access.
pub trait CredentialVerifier: Send + Sync {
    /// Returns `true` if the pair is accepted.
    fn verify(&self, identifier: &str, verifier: &str) -> bool;
}

/// The one accepted `(identifier, verifier)` pair.
///
/// Comparison is exact and case-sensitive on both fields. No trimming or
/// normalisation is applied.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Account identifier (shown as "Username" on the login screen).
    pub identifier: String,
    /// Secondary verifier (shown as "Email Verification").
    pub verifier: String,
}

impl Credential {
    /// Create a credential from its two fields.
    #[must_use]
    pub fn new(identifier: impl Into<String>, verifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            verifier: verifier.into(),
        }
    }
}

impl Default for Credential {
    fn default() -> Self {
        Self::new(DEFAULT_IDENTIFIER, DEFAULT_VERIFIER)
    }
}

// Keep the verifier out of debug output and logs.
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("identifier", &self.identifier)
            .field("verifier", &"<redacted>")
            .finish()
    }
}

impl CredentialVerifier for Credential {
    fn verify(&self, identifier: &str, verifier: &str) -> bool {
        identifier == self.identifier && verifier == self.verifier
    }
}

impl<F> CredentialVerifier for F
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    fn verify(&self, identifier: &str, verifier: &str) -> bool {
        self(identifier, verifier)
    }
}
