//! Worker identity.

use serde::{Deserialize, Serialize};

/// Opaque identity of a worker (volunteer host, grid node, ...).
///
/// Carries no payload: two workers are the same iff their identifiers are
/// equal. The enclosing platform owns the identifier scheme.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkerId(String);

impl WorkerId {
    /// Wrap an identifier supplied by the platform.
    pub fn new(id: impl Into<String>) -> Self {
        WorkerId(id.into())
    }

    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        WorkerId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for WorkerId {
    fn from(s: &str) -> Self {
        WorkerId(s.to_string())
    }
}

impl From<String> for WorkerId {
    fn from(s: String) -> Self {
        WorkerId(s)
    }
}

impl std::fmt::Display for WorkerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
