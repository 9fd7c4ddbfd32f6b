//! Lazy materialization state.
//!
//! Exactly one of the two states holds at any time: either the backing
//! reflects the most recently assigned text (or was never given any), or a
//! pending text form is waiting to be decoded on the next member access.

/// Materialization state of an extensible object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LazyState {
    /// The backing is current. Covers the never-assigned case: an object
    /// constructed without text is trivially materialized into its default
    /// backing.
    Materialized,
    /// A text form was assigned and has not been decoded yet.
    Pending(String),
}

impl Default for LazyState {
    fn default() -> Self {
        Self::Materialized
    }
}

impl LazyState {
    pub fn new() -> Self {
        Self::Materialized
    }

    /// Initial state for an object constructed from text. Blank text is no
    /// stored form at all, so it materializes trivially.
    pub fn from_text(text: impl Into<String>) -> Self {
        let mut state = Self::new();
        state.assign(text);
        state
    }

    pub fn is_materialized(&self) -> bool {
        matches!(self, Self::Materialized)
    }

    /// The text waiting to be decoded, if any.
    pub fn pending(&self) -> Option<&str> {
        match self {
            Self::Pending(text) => Some(text),
            Self::Materialized => None,
        }
    }

    /// Queue a new text form for decode. Assigning blank text drops any
    /// pending form instead and leaves the current backing authoritative.
    pub fn assign(&mut self, text: impl Into<String>) {
        let text = text.into();
        *self = if text.trim().is_empty() {
            Self::Materialized
        } else {
            Self::Pending(text)
        };
    }

    /// Mark the pending text as decoded.
    pub fn complete(&mut self) {
        *self = Self::Materialized;
    }
}
