use std::fmt;

/// Errors that can occur in the identifier manager.
///
/// Lookup misses are not errors; they are reported as `None`. Only caller
/// mistakes (empty scope, empty value list, bad configuration) end up here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An argument was rejected before any state was touched
    InvalidArgument(InvalidArgument),
}

impl Error {
    /// Returns the argument kind for `InvalidArgument` errors.
    pub fn argument_kind(&self) -> ArgumentKind {
        match self {
            Error::InvalidArgument(arg) => arg.kind,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument(arg) => write!(f, "Invalid argument: {}", arg),
        }
    }
}

impl std::error::Error for Error {}

impl From<InvalidArgument> for Error {
    fn from(arg: InvalidArgument) -> Self {
        Error::InvalidArgument(arg)
    }
}

/// A rejected argument with details about what was wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidArgument {
    /// Which argument was rejected
    pub kind: ArgumentKind,
    /// Human-readable message explaining the rejection
    pub message: String,
}

impl InvalidArgument {
    /// Creates a new invalid-argument error.
    pub fn new(kind: ArgumentKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for InvalidArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for InvalidArgument {}

/// The kind of argument that was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentKind {
    /// The scope string was empty
    EmptyScope,
    /// The identifier value list was empty
    EmptyIdentifiers,
    /// The canonicalization separator was empty
    EmptySeparator,
}

impl fmt::Display for ArgumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentKind::EmptyScope => write!(f, "empty scope"),
            ArgumentKind::EmptyIdentifiers => write!(f, "empty identifiers"),
            ArgumentKind::EmptySeparator => write!(f, "empty separator"),
        }
    }
}

/// Rejects an empty scope string.
pub(crate) fn check_scope(scope: &str) -> Result<(), Error> {
    if scope.is_empty() {
        return Err(
            InvalidArgument::new(ArgumentKind::EmptyScope, "scope must not be empty").into(),
        );
    }
    Ok(())
}
