//! Outcome of one inference request as shown to the user.

use serde::{Deserialize, Serialize};

/// A displayable analysis result.
///
/// `Placeholder` only appears when demo mode is enabled and the real call
/// failed; pages label it so it is never mistaken for an inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Analysis<T> {
    Inferred(T),
    Placeholder { value: T, reason: String },
}

impl<T> Analysis<T> {
    pub fn value(&self) -> &T {
        match self {
            Analysis::Inferred(v) => v,
            Analysis::Placeholder { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Analysis::Inferred(v) => v,
            Analysis::Placeholder { value, .. } => value,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Analysis::Placeholder { .. })
    }

    /// Why the placeholder was substituted, if it was.
    pub fn placeholder_reason(&self) -> Option<&str> {
        match self {
            Analysis::Inferred(_) => None,
            Analysis::Placeholder { reason, .. } => Some(reason),
        }
    }
}
