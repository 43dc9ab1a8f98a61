//! Flagging policy combining entities with a toxicity score

use crate::moderation::models::{Entity, ModerationVerdict, Reason};

/// Default threshold at which a message counts as toxic
pub const DEFAULT_TOXICITY_THRESHOLD: f32 = 0.10;

/// Message for personal data combined with toxicity
pub const MESSAGE_BOTH: &str = "В вашем сообщении обнаружены персональные данные и высокая токсичность. Пожалуйста, отправьте корректный текст.";

/// Message for personal data only
pub const MESSAGE_PII: &str =
    "В вашем сообщении обнаружены персональные данные. Пожалуйста, удалите их и попробуйте снова.";

/// Message for toxicity only
pub const MESSAGE_TOXICITY: &str =
    "В вашем сообщении обнаружена высокая токсичность. Пожалуйста, переформулируйте ваш текст.";

/// Verdict policy
///
/// Messages are fixed strings and never include entity values.
#[derive(Debug, Clone, Copy)]
pub struct ModerationPolicy {
    toxicity_threshold: f32,
}

impl ModerationPolicy {
    /// Create a policy with an explicit threshold
    pub fn new(toxicity_threshold: f32) -> Self {
        Self { toxicity_threshold }
    }

    /// Threshold in use
    pub fn toxicity_threshold(&self) -> f32 {
        self.toxicity_threshold
    }

    /// Build the verdict for one request
    pub fn decide(&self, entities: Vec<Entity>, toxicity_score: f32) -> ModerationVerdict {
        let has_pii = !entities.is_empty();
        let is_toxic = toxicity_score >= self.toxicity_threshold;

        let (flagged, reason, message) = match (has_pii, is_toxic) {
            (true, true) => (true, Reason::Both, MESSAGE_BOTH),
            (true, false) => (true, Reason::Pii, MESSAGE_PII),
            (false, true) => (true, Reason::Toxicity, MESSAGE_TOXICITY),
            (false, false) => (false, Reason::None, ""),
        };

        ModerationVerdict::new(flagged, reason, message, entities, toxicity_score)
    }
}

impl Default for ModerationPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_TOXICITY_THRESHOLD)
    }
}
