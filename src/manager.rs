//! The scoped temporary-identifier store.

use std::any::Any;
use std::collections::hash_map::{Entry, RandomState};
use std::collections::HashMap;
use std::fmt;
use std::hash::BuildHasher;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::{
    config::ManagerConfig,
    error::{check_scope, ArgumentKind, Error, InvalidArgument},
    hash::{Base64Sha256, HashProvider},
    logging::ScopeLabel,
    value::{canonicalize, IdentifierValue},
};

/// Maps real identifier values to opaque temporary identifiers, per scope.
///
/// A scope is an isolation boundary, usually a session id. Within a scope the
/// manager hands out a deterministic, URL-safe digest for a set of values and
/// can later turn that digest back into the original values. Digests from one
/// scope never resolve in another.
///
/// The manager is `Send + Sync` and is meant to be created once and shared
/// (for example behind an `Arc`) by every request handler. Scopes are never
/// expired automatically; call [`remove_identifiers`](Self::remove_identifiers)
/// when a scope ends.
///
/// # Collisions
///
/// The first mapping stored for a digest wins. Two distinct value sets that
/// hash to the same digest in one scope are not detected; the second caller
/// receives the digest of the first entry. The default SHA-256 provider makes
/// this negligible. Values are canonicalized through `Display`, so `42_i32`
/// and `"42"` share a digest within a scope.
///
/// # Examples
///
/// ```
/// use scoped_identifiers::IdentifierManager;
///
/// let manager = IdentifierManager::new();
///
/// let digest = manager.get_temporary_identifier("S1", 42_i32).unwrap();
/// assert_eq!(manager.try_get_identifier::<i32>("S1", &digest), Some(42));
/// assert_eq!(manager.try_get_identifier::<String>("S1", &digest), None);
///
/// manager.remove_identifiers("S1");
/// assert_eq!(manager.try_get_identifier::<i32>("S1", &digest), None);
/// ```
pub struct IdentifierManager<H = Base64Sha256> {
    hash_provider: H,
    separator: String,
    bind_to_scope: bool,
    shards: Box<[RwLock<HashMap<String, Arc<ScopeTable>>>]>,
    shard_hasher: RandomState,
}

/// The mappings of one scope.
#[derive(Default)]
struct ScopeTable {
    entries: RwLock<HashMap<String, Arc<[IdentifierValue]>>>,
}

impl ScopeTable {
    fn get(&self, digest: &str) -> Option<Arc<[IdentifierValue]>> {
        self.entries.read().get(digest).cloned()
    }

    /// Stores `values` under `digest` unless the digest is already present.
    fn insert_if_absent(&self, digest: &str, values: Vec<IdentifierValue>) -> bool {
        if self.entries.read().contains_key(digest) {
            return false;
        }
        match self.entries.write().entry(digest.to_string()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(values.into());
                true
            }
        }
    }

    fn len(&self) -> usize {
        self.entries.read().len()
    }
}

impl IdentifierManager<Base64Sha256> {
    /// Creates a manager with the default configuration
    /// (URL-safe base64 SHA-256, scope not hashed).
    pub fn new() -> Self {
        Self::from_config(ManagerConfig::new())
    }

    /// Returns a builder for a customized manager.
    pub fn builder() -> ManagerConfig<Base64Sha256> {
        ManagerConfig::new()
    }
}

impl Default for IdentifierManager<Base64Sha256> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: HashProvider> IdentifierManager<H> {
    /// Creates a manager that computes temporary identifiers with `hash_provider`.
    pub fn with_hash_provider(hash_provider: H) -> Self {
        Self::from_config(ManagerConfig::new().hash_provider(hash_provider))
    }

    /// Builds a manager from an already validated configuration.
    pub(crate) fn from_config(config: ManagerConfig<H>) -> Self {
        let shards = (0..config.shards.max(1))
            .map(|_| RwLock::new(HashMap::new()))
            .collect::<Vec<_>>()
            .into_boxed_slice();

        Self {
            hash_provider: config.hash_provider,
            separator: config.separator,
            bind_to_scope: config.bind_to_scope,
            shards,
            shard_hasher: RandomState::new(),
        }
    }

    /// Returns the temporary identifier for a single real identifier.
    ///
    /// Repeated calls with the same scope and value return the same digest and
    /// do not grow the scope.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if `scope` is empty.
    pub fn get_temporary_identifier<T>(&self, scope: &str, identifier: T) -> Result<String, Error>
    where
        T: fmt::Display + Send + Sync + 'static,
    {
        self.get_temporary_identifiers(scope, [IdentifierValue::new(identifier)])
    }

    /// Returns the temporary identifier for an ordered set of real identifiers.
    ///
    /// Order matters: `[a, b]` and `[b, a]` map to different digests.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` if `scope` is empty or `identifiers`
    /// yields no values.
    ///
    /// # Examples
    ///
    /// ```
    /// use scoped_identifiers::{identifiers, IdentifierManager};
    ///
    /// let manager = IdentifierManager::new();
    /// let digest = manager
    ///     .get_temporary_identifiers("S1", identifiers![7_u32, "line", 3_u8])
    ///     .unwrap();
    ///
    /// let values = manager.try_get_identifiers("S1", &digest).unwrap();
    /// assert_eq!(values[1].downcast_ref::<&str>(), Some(&"line"));
    /// ```
    pub fn get_temporary_identifiers<I>(&self, scope: &str, identifiers: I) -> Result<String, Error>
    where
        I: IntoIterator<Item = IdentifierValue>,
    {
        check_scope(scope)?;
        let values: Vec<IdentifierValue> = identifiers.into_iter().collect();
        if values.is_empty() {
            return Err(InvalidArgument::new(
                ArgumentKind::EmptyIdentifiers,
                "at least one identifier is required",
            )
            .into());
        }

        let bound_scope = self.bind_to_scope.then_some(scope);
        let canonical = canonicalize(bound_scope, &values, &self.separator);
        let digest = self.hash_provider.compute_digest(&canonical);

        let components = values.len();
        let table = self.table_or_create(scope);
        if table.insert_if_absent(&digest, values) {
            tracing::trace!(
                scope = %ScopeLabel::new(scope),
                components,
                "temporary identifier stored"
            );
        }

        Ok(digest)
    }

    /// Returns the single real identifier behind `temporary_identifier`.
    ///
    /// Returns `None` when the scope or digest is unknown, when the entry holds
    /// more than one component, or when the stored value is not a `T`.
    ///
    /// The value is cloned out of the store, so `T` must be `Clone`. Use
    /// [`try_get_identifier_shared`](Self::try_get_identifier_shared) for
    /// identifier types that are not.
    pub fn try_get_identifier<T>(&self, scope: &str, temporary_identifier: &str) -> Option<T>
    where
        T: Any + Clone,
    {
        let values = self.lookup(scope, temporary_identifier)?;
        match &values[..] {
            [single] => single.downcast_ref::<T>().cloned(),
            _ => None,
        }
    }

    /// Returns a shared handle to the single real identifier behind
    /// `temporary_identifier`.
    ///
    /// Same miss rules as [`try_get_identifier`](Self::try_get_identifier),
    /// without requiring `T: Clone`.
    pub fn try_get_identifier_shared<T>(
        &self,
        scope: &str,
        temporary_identifier: &str,
    ) -> Option<Arc<T>>
    where
        T: Any + Send + Sync,
    {
        let values = self.lookup(scope, temporary_identifier)?;
        match &values[..] {
            [single] => single.downcast_arc::<T>(),
            _ => None,
        }
    }

    /// Returns all real identifiers behind `temporary_identifier`, in the order
    /// they were supplied.
    pub fn try_get_identifiers(
        &self,
        scope: &str,
        temporary_identifier: &str,
    ) -> Option<Vec<IdentifierValue>> {
        self.lookup(scope, temporary_identifier).map(|values| values.to_vec())
    }

    /// Drops every mapping of `scope`, returning how many were dropped.
    ///
    /// Unknown scopes are a no-op. The table is detached in one step, so a
    /// concurrent lookup sees either all of the scope's mappings or none.
    pub fn remove_identifiers(&self, scope: &str) -> usize {
        let removed = self.shard(scope).write().remove(scope);
        match removed {
            Some(table) => {
                let count = table.len();
                tracing::debug!(scope = %ScopeLabel::new(scope), count, "scope evicted");
                count
            }
            None => 0,
        }
    }

    /// Returns `true` if `scope` currently has a table.
    pub fn contains_scope(&self, scope: &str) -> bool {
        self.shard(scope).read().contains_key(scope)
    }

    /// Returns the number of mappings held for `scope` (0 if absent).
    pub fn scope_len(&self, scope: &str) -> usize {
        self.table(scope).map_or(0, |table| table.len())
    }

    /// Returns the number of scopes with a table.
    pub fn scope_count(&self) -> usize {
        self.shards.iter().map(|shard| shard.read().len()).sum()
    }

    /// Returns `true` if the scope is hashed together with the values.
    pub fn binds_to_scope(&self) -> bool {
        self.bind_to_scope
    }

    fn lookup(&self, scope: &str, temporary_identifier: &str) -> Option<Arc<[IdentifierValue]>> {
        let found = self
            .table(scope)
            .and_then(|table| table.get(temporary_identifier));
        if found.is_none() {
            tracing::trace!(scope = %ScopeLabel::new(scope), "temporary identifier miss");
        }
        found
    }

    fn shard(&self, scope: &str) -> &RwLock<HashMap<String, Arc<ScopeTable>>> {
        let index = self.shard_hasher.hash_one(scope) as usize % self.shards.len();
        &self.shards[index]
    }

    fn table(&self, scope: &str) -> Option<Arc<ScopeTable>> {
        self.shard(scope).read().get(scope).cloned()
    }

    fn table_or_create(&self, scope: &str) -> Arc<ScopeTable> {
        if let Some(table) = self.table(scope) {
            return table;
        }
        let mut shard = self.shard(scope).write();
        match shard.entry(scope.to_string()) {
            Entry::Occupied(slot) => Arc::clone(slot.get()),
            Entry::Vacant(slot) => {
                tracing::debug!(scope = %ScopeLabel::new(scope), "scope created");
                Arc::clone(slot.insert(Arc::new(ScopeTable::default())))
            }
        }
    }
}

impl<H> fmt::Debug for IdentifierManager<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentifierManager")
            .field("shards", &self.shards.len())
            .field("bind_to_scope", &self.bind_to_scope)
            .finish_non_exhaustive()
    }
}
