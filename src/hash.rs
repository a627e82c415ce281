//! Digest providers that turn a canonical identifier string into a
//! temporary identifier.
//!
//! Every provider must be deterministic and must produce output that can be
//! placed in a URL path segment or a form field without further encoding.

use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use sha2::{Digest, Sha256};

/// Computes the textual digest used as a temporary identifier.
///
/// # Invariants
///
/// Implementations MUST:
/// - Return the same output for the same input, always
/// - Return a non-empty string, including for empty input
/// - Only emit characters that are safe in a URL path segment
///   (no `/`, `+`, `=`, whitespace or control characters)
/// - Hold no mutable state (the trait requires `Send + Sync`)
///
/// # Examples
///
/// ```
/// use scoped_identifiers::{Base64Sha256, HashProvider};
///
/// let provider = Base64Sha256;
/// let digest = provider.compute_digest("order-42");
///
/// assert_eq!(digest, provider.compute_digest("order-42"));
/// assert!(!digest.contains('/'));
/// ```
pub trait HashProvider: Send + Sync {
    /// Computes the digest of `input`.
    fn compute_digest(&self, input: &str) -> String;
}

/// SHA-256 encoded as URL-safe base64 without padding (43 characters).
///
/// This is the default provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Base64Sha256;

impl HashProvider for Base64Sha256 {
    fn compute_digest(&self, input: &str) -> String {
        URL_SAFE_NO_PAD.encode(Sha256::digest(input.as_bytes()))
    }
}

/// SHA-256 encoded as lowercase hexadecimal (64 characters).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HexSha256;

impl HashProvider for HexSha256 {
    fn compute_digest(&self, input: &str) -> String {
        hex::encode(Sha256::digest(input.as_bytes()))
    }
}

/// Adapts a plain function or closure into a [`HashProvider`].
///
/// The function is trusted to uphold the provider invariants.
///
/// # Examples
///
/// ```
/// use scoped_identifiers::{DigestFn, HashProvider};
///
/// let provider = DigestFn(|input: &str| format!("len{}", input.len()));
/// assert_eq!(provider.compute_digest("abc"), "len3");
/// ```
#[derive(Clone, Copy)]
pub struct DigestFn<F>(pub F);

impl<F> HashProvider for DigestFn<F>
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn compute_digest(&self, input: &str) -> String {
        (self.0)(input)
    }
}

impl<F> std::fmt::Debug for DigestFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DigestFn")
    }
}

impl<H: HashProvider + ?Sized> HashProvider for Arc<H> {
    fn compute_digest(&self, input: &str) -> String {
        (**self).compute_digest(input)
    }
}

impl<H: HashProvider + ?Sized> HashProvider for Box<H> {
    fn compute_digest(&self, input: &str) -> String {
        (**self).compute_digest(input)
    }
}
