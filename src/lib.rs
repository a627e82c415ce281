//! Scoped, reversible temporary identifiers.
//!
//! Web applications often need to put a real identifier (a database key, a
//! composite key, a customer number) into a URL or a hidden form field without
//! revealing it and without letting the client forge a different one. This
//! crate hands out an opaque, URL-safe digest for one or more real values
//! under a scope (typically a session id) and turns the digest back into the
//! original, typed values later in the same scope.
//!
//! # Core Types
//!
//! - [`IdentifierManager`]: the concurrent scope → digest → values store
//! - [`HashProvider`]: pluggable digest (default [`Base64Sha256`])
//! - [`IdentifierValue`]: a boxed real identifier with a redacted `Debug`
//! - [`ManagerConfig`]: builder for provider, separator, shards and scope binding
//! - [`ScopeEndListener`] / [`SessionEndNotifier`]: eviction when a scope ends
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//! use scoped_identifiers::{identifiers, IdentifierManager};
//!
//! // One shared instance for the whole process
//! let manager = Arc::new(IdentifierManager::new());
//!
//! // Render a link for order 1042 in session "sess-9"
//! let digest = manager.get_temporary_identifier("sess-9", 1042_u64).unwrap();
//!
//! // Resolve it when the link is followed
//! assert_eq!(manager.try_get_identifier::<u64>("sess-9", &digest), Some(1042));
//!
//! // Tampered or foreign digests are plain misses
//! assert_eq!(manager.try_get_identifier::<u64>("sess-9", "forged"), None);
//! assert_eq!(manager.try_get_identifier::<u64>("other", &digest), None);
//!
//! // Composite keys keep their order
//! let line = manager
//!     .get_temporary_identifiers("sess-9", identifiers![1042_u64, 3_u16])
//!     .unwrap();
//! assert_eq!(manager.try_get_identifiers("sess-9", &line).unwrap().len(), 2);
//!
//! // Session ended
//! manager.remove_identifiers("sess-9");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod hash;
mod lifecycle;
mod logging;
mod manager;
mod value;

#[cfg(test)]
mod test_utils;

pub use config::{ManagerConfig, DEFAULT_SEPARATOR, DEFAULT_SHARDS};
pub use error::{ArgumentKind, Error, InvalidArgument};
pub use hash::{Base64Sha256, DigestFn, HashProvider, HexSha256};
pub use lifecycle::{ScopeEndListener, SessionEndNotifier};
pub use logging::ScopeLabel;
pub use manager::IdentifierManager;
pub use value::IdentifierValue;
