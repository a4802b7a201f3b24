use std::fmt::Display;
use std::sync::Arc;

/// An identifier for one live context.
///
/// Contexts sharing a registry are independent peers; the identifier exists
/// to key them in a [`ContextMap`](crate::context_map::ContextMap) and to tag
/// per-context diagnostics so interleaved logs stay attributable.
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ContextId(Arc<str>);

impl ContextId {
    /// Create a new [`ContextId`] from any type that can be converted into an `Arc<str>`.
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ContextId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for ContextId {
    fn from(s: String) -> Self {
        Self(s.into())
    }
}

impl From<&str> for ContextId {
    fn from(s: &str) -> Self {
        Self(s.into())
    }
}
