use crate::{
    error::{ArgumentKind, Error, InvalidArgument},
    hash::{Base64Sha256, HashProvider},
    manager::IdentifierManager,
};

/// Default separator placed between identifier components (ASCII unit separator).
pub const DEFAULT_SEPARATOR: &str = "\u{1F}";

/// Default number of registry shards.
pub const DEFAULT_SHARDS: usize = 16;

/// Builder for an [`IdentifierManager`].
///
/// # Examples
///
/// ```
/// use scoped_identifiers::{HexSha256, ManagerConfig};
///
/// let manager = ManagerConfig::new()
///     .hash_provider(HexSha256)
///     .shards(4)
///     .bind_to_scope(true)
///     .build()
///     .expect("valid configuration");
///
/// let digest = manager.get_temporary_identifier("session-1", 42_u32).unwrap();
/// assert_eq!(digest.len(), 64);
/// ```
#[derive(Debug, Clone)]
pub struct ManagerConfig<H = Base64Sha256> {
    pub(crate) hash_provider: H,
    pub(crate) separator: String,
    pub(crate) shards: usize,
    pub(crate) bind_to_scope: bool,
}

impl ManagerConfig<Base64Sha256> {
    /// Creates a configuration with the default provider, separator and shard count.
    pub fn new() -> Self {
        Self {
            hash_provider: Base64Sha256,
            separator: DEFAULT_SEPARATOR.to_string(),
            shards: DEFAULT_SHARDS,
            bind_to_scope: false,
        }
    }
}

impl Default for ManagerConfig<Base64Sha256> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: HashProvider> ManagerConfig<H> {
    /// Replaces the hash provider used to compute temporary identifiers.
    pub fn hash_provider<P: HashProvider>(self, hash_provider: P) -> ManagerConfig<P> {
        ManagerConfig {
            hash_provider,
            separator: self.separator,
            shards: self.shards,
            bind_to_scope: self.bind_to_scope,
        }
    }

    /// Sets the separator joining identifier components before hashing.
    ///
    /// Pick a string that never occurs in the `Display` form of your
    /// identifiers, otherwise `["a-b", "c"]` and `["a", "b-c"]` can share a digest.
    pub fn separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Sets the number of registry shards. Zero is treated as one.
    pub fn shards(mut self, shards: usize) -> Self {
        self.shards = shards.max(1);
        self
    }

    /// When `true`, the scope is hashed together with the values, so the same
    /// values produce different temporary identifiers in different scopes.
    pub fn bind_to_scope(mut self, bind: bool) -> Self {
        self.bind_to_scope = bind;
        self
    }

    /// Validates the configuration and builds the manager.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidArgument` with [`ArgumentKind::EmptySeparator`]
    /// if the separator is empty.
    pub fn build(self) -> Result<IdentifierManager<H>, Error> {
        if self.separator.is_empty() {
            return Err(InvalidArgument::new(
                ArgumentKind::EmptySeparator,
                "separator must not be empty",
            )
            .into());
        }
        Ok(IdentifierManager::from_config(self))
    }
}
