//! PII extraction and moderation decision engine
//!
//! This module turns raw model output into one auditable verdict:
//!
//! - **Validators**: checksum validation of national identifiers
//! - **Detector**: ordered regex table producing candidate spans
//! - **Registry**: at-most-one claim per normalized value
//! - **Merger**: staged, deterministic entity resolution with a gate
//! - **Phone**: canonical `+7` numbers with a resolved region
//! - **Policy**: combines entities with a toxicity score
//! - **Engine**: request orchestration over an injected [`ModerationContext`]
//!
//! The models themselves sit behind the traits in [`collaborators`].

pub mod audit;
pub mod collaborators;
pub mod detector;
pub mod engine;
pub mod merger;
pub mod models;
pub mod phone;
pub mod policy;
pub mod registry;
pub mod validators;

pub use audit::AuditLogger;
pub use collaborators::{EntityAnalyzer, NerPipeline, ToxicityClassifier};
pub use engine::{ModerationContext, ModerationEngine};
pub use merger::{EntityMerger, POLICY_VERSION};
pub use models::{Entity, EntityKind, ModerationVerdict, Reason};
pub use policy::{ModerationPolicy, DEFAULT_TOXICITY_THRESHOLD};
