//! Contracts of the external models consumed by the engine
//!
//! The engine never looks inside these models. Implementations are injected
//! through [`ModerationContext`](crate::moderation::ModerationContext), which
//! lets tests substitute doubles for every model.

use crate::domain::Result;
use crate::moderation::models::{AnalyzerResult, RawEntity};
use async_trait::async_trait;

/// Statistical NER for the primary language
#[async_trait]
pub trait NerPipeline: Send + Sync {
    /// Tag spans of `text` with coarse kinds (PER, ORG, LOC, GPE, ...)
    async fn analyze(&self, text: &str) -> Result<Vec<RawEntity>>;
}

/// Generic multi-category entity analyzer
#[async_trait]
pub trait EntityAnalyzer: Send + Sync {
    /// Analyze `text` for `entity_types`, or the analyzer's full default
    /// set when `None`
    async fn analyze(
        &self,
        text: &str,
        entity_types: Option<&[&str]>,
        language: &str,
    ) -> Result<Vec<AnalyzerResult>>;
}

/// Toxicity classifier
#[async_trait]
pub trait ToxicityClassifier: Send + Sync {
    /// Probability of the toxic class, in `[0, 1]`
    async fn score(&self, text: &str) -> Result<f32>;
}
