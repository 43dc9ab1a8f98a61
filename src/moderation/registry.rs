//! Per-request registry of already reported values

use std::collections::HashSet;

/// Set of normalized keys claimed by some detector for the current text
#[derive(Debug, Default)]
pub struct SpanRegistry {
    claimed: HashSet<String>,
}

impl SpanRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `key`; returns false if another detector already claimed it
    pub fn claim(&mut self, key: &str) -> bool {
        if self.claimed.contains(key) {
            return false;
        }
        self.claimed.insert(key.to_string())
    }

    /// Check if `key` is claimed
    pub fn is_claimed(&self, key: &str) -> bool {
        self.claimed.contains(key)
    }

    /// Number of claimed keys
    pub fn len(&self) -> usize {
        self.claimed.len()
    }

    /// Check if nothing is claimed
    pub fn is_empty(&self) -> bool {
        self.claimed.is_empty()
    }
}
