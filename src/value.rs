use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A real identifier value stored behind a temporary identifier.
///
/// `IdentifierValue` boxes a value of any `'static` type together with its
/// canonical string form (its `Display` output). The canonical form is what
/// gets hashed; the boxed value is what lookups hand back, so callers get the
/// original typed value and not a re-parsed string.
///
/// # Security Properties
///
/// - Debug output is always `IdentifierValue([REDACTED])`
/// - Display is not implemented; use [`canonical`](Self::canonical) explicitly
/// - The boxed value is immutable and shared, so clones are cheap and can be
///   handed to concurrent readers
///
/// # Examples
///
/// ```
/// use scoped_identifiers::IdentifierValue;
///
/// let value = IdentifierValue::new(42_u64);
///
/// assert_eq!(value.canonical(), "42");
/// assert_eq!(value.downcast_ref::<u64>(), Some(&42));
/// assert_eq!(value.downcast_ref::<i32>(), None);
/// assert_eq!(format!("{:?}", value), "IdentifierValue([REDACTED])");
/// ```
#[derive(Clone)]
pub struct IdentifierValue {
    canonical: Arc<str>,
    value: Arc<dyn Any + Send + Sync>,
}

impl IdentifierValue {
    /// Boxes `value`, capturing its `Display` form as the canonical string.
    pub fn new<T>(value: T) -> Self
    where
        T: fmt::Display + Send + Sync + 'static,
    {
        Self {
            canonical: Arc::from(value.to_string()),
            value: Arc::new(value),
        }
    }

    /// Returns the canonical string form used for hashing.
    pub fn canonical(&self) -> &str {
        &self.canonical
    }

    /// Returns a reference to the boxed value if it is of type `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Returns a shared handle to the boxed value if it is of type `T`.
    ///
    /// Works for types that do not implement `Clone`.
    pub fn downcast_arc<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.value).downcast::<T>().ok()
    }

    /// Returns `true` if the boxed value is of type `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }
}

// Stored values are the data a temporary identifier exists to hide.
impl fmt::Debug for IdentifierValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IdentifierValue([REDACTED])")
    }
}

/// Joins the canonical forms of `values` with `separator`.
///
/// When `scope` is given it is prepended as the first component.
pub(crate) fn canonicalize(
    scope: Option<&str>,
    values: &[IdentifierValue],
    separator: &str,
) -> String {
    let mut out = String::new();
    if let Some(scope) = scope {
        out.push_str(scope);
        out.push_str(separator);
    }
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            out.push_str(separator);
        }
        out.push_str(value.canonical());
    }
    out
}

/// Builds a `Vec<IdentifierValue>` from a list of displayable values.
///
/// # Examples
///
/// ```
/// use scoped_identifiers::identifiers;
///
/// let values = identifiers![7_u32, "invoice", 'x'];
/// assert_eq!(values.len(), 3);
/// assert_eq!(values[1].canonical(), "invoice");
/// ```
#[macro_export]
macro_rules! identifiers {
    ($($value:expr),* $(,)?) => {
        vec![$($crate::IdentifierValue::new($value)),*]
    };
}
