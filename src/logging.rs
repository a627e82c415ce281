use std::fmt;

use sha2::{Digest, Sha256};

/// A log-safe label for a scope.
///
/// Scopes are usually session ids, which must never reach log output. A
/// `ScopeLabel` renders a short SHA-256 fingerprint instead, so log lines for
/// the same scope can still be correlated.
///
/// Use it as a `tracing` field with `%`:
///
/// ```
/// use scoped_identifiers::ScopeLabel;
///
/// let label = ScopeLabel::new("session-abc");
/// tracing::debug!(scope = %label, "scope created");
///
/// let rendered = label.to_string();
/// assert!(rendered.starts_with("scope#"));
/// assert!(!rendered.contains("session-abc"));
/// ```
#[derive(Clone, Copy)]
pub struct ScopeLabel<'a> {
    scope: &'a str,
}

impl<'a> ScopeLabel<'a> {
    /// Wraps a scope for logging.
    pub fn new(scope: &'a str) -> Self {
        Self { scope }
    }
}

impl fmt::Display for ScopeLabel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digest = Sha256::digest(self.scope.as_bytes());
        write!(f, "scope#{}", hex::encode(&digest[..4]))
    }
}

impl fmt::Debug for ScopeLabel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
