//! Typed component tokens with process-wide identity.
//!
//! A token names a component slot without holding the component itself. The
//! identity is an interned counter value, so two tokens created with the same
//! description are still distinct slots. The type parameter is a compile-time
//! witness for the value the slot yields on resolution.

// Layer 1: Standard library imports
use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// Layer 2: Third-party crate imports
use serde::Serialize;

// Layer 3: Internal module imports
// (none)

static NEXT_TOKEN_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of a component slot.
///
/// Allocated from a process-wide counter; never reused within a process.
///
/// # Example
/// ```rust
/// use conductor_rt::token::Token;
///
/// let a = Token::<u32>::new("config");
/// let b = Token::<u32>::new("config");
/// assert_ne!(a.id(), b.id()); // Same description, distinct slots
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TokenId(u64);

impl TokenId {
    fn next() -> Self {
        Self(NEXT_TOKEN_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw counter value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Typed token for a component slot.
///
/// Tokens compare and hash by identity only; the description is metadata for
/// diagnostics. The phantom parameter uses `fn() -> T` so a token is `Send`
/// and `Sync` regardless of `T`.
///
/// # Example
/// ```rust
/// use conductor_rt::token::Token;
///
/// struct Database;
///
/// let db = Token::<Database>::new("database");
/// assert_eq!(db.description(), "database");
///
/// let scoped = Token::<Database>::namespaced("storage", "primary");
/// assert_eq!(scoped.description(), "storage:primary");
/// ```
#[derive(Debug)]
pub struct Token<T> {
    id: TokenId,
    description: Arc<str>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Token<T> {
    /// Create a fresh token with the given display description.
    ///
    /// Each call yields a distinct identity, even for identical descriptions.
    pub fn new(description: impl Into<Arc<str>>) -> Self {
        Self {
            id: TokenId::next(),
            description: description.into(),
            _marker: PhantomData,
        }
    }

    /// Create a fresh token with a `"{namespace}:{key}"` description.
    ///
    /// This is the record form used when declaring a group of related tokens
    /// under one namespace.
    pub fn namespaced(namespace: &str, key: &str) -> Self {
        Self::new(format!("{namespace}:{key}"))
    }

    /// Get the opaque identity of this token.
    pub fn id(&self) -> TokenId {
        self.id
    }

    /// Get the human-readable description.
    pub fn description(&self) -> &str {
        &self.description
    }

    pub(crate) fn description_arc(&self) -> Arc<str> {
        Arc::clone(&self.description)
    }
}

impl<T> Clone for Token<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            description: Arc::clone(&self.description),
            _marker: PhantomData,
        }
    }
}

impl<T> PartialEq for Token<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for Token<T> {}

impl<T> Hash for Token<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> Display for Token<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.description, self.id)
    }
}
