//! Moderation data models

pub mod entity;
pub mod verdict;

pub use entity::{digits_only, normalize_key, AnalyzerResult, Entity, EntityKind, RawEntity};
pub use verdict::{ModerationVerdict, Reason};
