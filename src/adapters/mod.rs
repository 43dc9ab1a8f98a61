//! External system integrations for Vigil.
//!
//! - [`model_service`] - HTTP model service hosting the NER pipeline, the
//!   generic entity analyzer and the toxicity classifier
//!
//! Adapters isolate third-party clients behind the collaborator traits in
//! [`crate::moderation::collaborators`], so tests can replace them.

pub mod model_service;
