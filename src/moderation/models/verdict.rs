//! Moderation verdict

use super::entity::Entity;
use serde::{Deserialize, Serialize};

/// Why a message was (or was not) flagged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    /// Personal data found
    Pii,
    /// Toxicity score at or above threshold
    Toxicity,
    /// Both of the above
    Both,
    /// Nothing found
    None,
}

impl Reason {
    /// Wire label
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pii => "pii",
            Self::Toxicity => "toxicity",
            Self::Both => "both",
            Self::None => "none",
        }
    }
}

/// Final decision for a single request
///
/// Built once by the policy and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationVerdict {
    flagged: bool,
    reason: Reason,
    message: String,
    entities: Vec<Entity>,
    toxicity_score: f32,
}

impl ModerationVerdict {
    pub(crate) fn new(
        flagged: bool,
        reason: Reason,
        message: impl Into<String>,
        entities: Vec<Entity>,
        toxicity_score: f32,
    ) -> Self {
        Self {
            flagged,
            reason,
            message: message.into(),
            entities,
            toxicity_score,
        }
    }

    /// Whether the message must be blocked
    pub fn flagged(&self) -> bool {
        self.flagged
    }

    /// Reason for the decision
    pub fn reason(&self) -> Reason {
        self.reason
    }

    /// User-facing message (empty when not flagged)
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Entities that contributed to the decision
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    /// Score returned by the toxicity classifier
    pub fn toxicity_score(&self) -> f32 {
        self.toxicity_score
    }

    /// Check if any personal data was detected
    pub fn has_pii(&self) -> bool {
        !self.entities.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Reason::Both).unwrap(), "\"both\"");
        assert_eq!(serde_json::to_string(&Reason::None).unwrap(), "\"none\"");
        assert_eq!(Reason::Toxicity.as_str(), "toxicity");
    }
}
