//! Request orchestration
//!
//! [`ModerationContext`] carries the process-wide, read-only dependencies:
//! the three models, the national ID validator and both configuration
//! tables. [`ModerationEngine`] owns a context and runs one request at a
//! time through extraction, scoring and the policy.
//!
//! # Examples
//!
//! ```no_run
//! use vigil::moderation::{ModerationContext, ModerationEngine};
//! use vigil::adapters::model_service::ModelServiceClient;
//! use std::sync::Arc;
//!
//! # async fn example() -> vigil::domain::Result<()> {
//! let config = vigil::config::load_config("vigil.toml")?;
//! let client = Arc::new(ModelServiceClient::new(&config.models)?);
//! let context = ModerationContext::from_config(&config.moderation, client.clone(), client.clone(), client);
//! let engine = ModerationEngine::new(context, &config.moderation);
//!
//! let verdict = engine.moderate("Меня зовут Иван, мой СНИЛС 112-233-445 95", "ru").await?;
//! assert!(verdict.flagged());
//! # Ok(())
//! # }
//! ```

use crate::config::ModerationConfig;
use crate::domain::Result;
use crate::moderation::audit::AuditLogger;
use crate::moderation::collaborators::{EntityAnalyzer, NerPipeline, ToxicityClassifier};
use crate::moderation::detector::PatternRegistry;
use crate::moderation::merger::{EntityMerger, EMAIL_ENTITY_TYPE};
use crate::moderation::models::{Entity, ModerationVerdict};
use crate::moderation::phone::{PhoneNormalizer, RegionTable};
use crate::moderation::policy::ModerationPolicy;
use crate::moderation::validators::{ChecksumValidator, InnValidator, NationalIdValidator};
use std::sync::Arc;
use std::time::Instant;

/// Language passed to the generic analyzer on every path
const ANALYZER_LANGUAGE: &str = "en";

const EMAIL_ONLY: &[&str] = &[EMAIL_ENTITY_TYPE];

/// Injected process-wide dependencies
#[derive(Clone)]
pub struct ModerationContext {
    pub ner: Arc<dyn NerPipeline>,
    pub analyzer: Arc<dyn EntityAnalyzer>,
    pub toxicity: Arc<dyn ToxicityClassifier>,
    pub id_validator: Arc<dyn NationalIdValidator>,
    pub patterns: Arc<PatternRegistry>,
    pub regions: Arc<RegionTable>,
}

impl ModerationContext {
    /// Build a context with the built-in tables and the default ID validator
    pub fn new(
        ner: Arc<dyn NerPipeline>,
        analyzer: Arc<dyn EntityAnalyzer>,
        toxicity: Arc<dyn ToxicityClassifier>,
    ) -> Self {
        Self {
            ner,
            analyzer,
            toxicity,
            id_validator: Arc::new(InnValidator),
            patterns: Arc::new(PatternRegistry::load(None)),
            regions: Arc::new(RegionTable::load(None)),
        }
    }

    /// Build a context loading the tables named in the configuration
    ///
    /// Missing or malformed tables degrade to empty ones.
    pub fn from_config(
        config: &ModerationConfig,
        ner: Arc<dyn NerPipeline>,
        analyzer: Arc<dyn EntityAnalyzer>,
        toxicity: Arc<dyn ToxicityClassifier>,
    ) -> Self {
        Self {
            ner,
            analyzer,
            toxicity,
            id_validator: Arc::new(InnValidator),
            patterns: Arc::new(PatternRegistry::load(config.patterns_path.as_deref())),
            regions: Arc::new(RegionTable::load(config.regions_path.as_deref())),
        }
    }

    /// Replace the pattern table
    pub fn with_patterns(mut self, patterns: PatternRegistry) -> Self {
        self.patterns = Arc::new(patterns);
        self
    }

    /// Replace the region table
    pub fn with_regions(mut self, regions: RegionTable) -> Self {
        self.regions = Arc::new(regions);
        self
    }

    /// Replace the national ID validator
    pub fn with_id_validator(mut self, validator: Arc<dyn NationalIdValidator>) -> Self {
        self.id_validator = validator;
        self
    }
}

/// Moderation engine
///
/// Holds no per-request state and can be shared across tasks behind an
/// `Arc`.
pub struct ModerationEngine {
    context: ModerationContext,
    merger: EntityMerger,
    policy: ModerationPolicy,
    primary_language: String,
    audit_logger: Option<AuditLogger>,
}

impl ModerationEngine {
    /// Create an engine from a context and the moderation settings
    pub fn new(context: ModerationContext, config: &ModerationConfig) -> Self {
        Self::with_policy(
            context,
            ModerationPolicy::new(config.toxicity_threshold),
            &config.primary_language,
        )
    }

    /// Create an engine with an explicit policy and primary language
    pub fn with_policy(
        context: ModerationContext,
        policy: ModerationPolicy,
        primary_language: &str,
    ) -> Self {
        let merger = EntityMerger::new(
            context.patterns.clone(),
            ChecksumValidator::new(context.id_validator.clone()),
            PhoneNormalizer::new(context.regions.clone()),
        );

        Self {
            context,
            merger,
            policy,
            primary_language: primary_language.to_string(),
            audit_logger: None,
        }
    }

    /// Attach an audit logger
    pub fn with_audit_logger(mut self, logger: AuditLogger) -> Self {
        self.audit_logger = Some(logger);
        self
    }

    /// Primary language served by the full merge path
    pub fn primary_language(&self) -> &str {
        &self.primary_language
    }

    /// Policy in use
    pub fn policy(&self) -> ModerationPolicy {
        self.policy
    }

    /// Extract personal data from `text`
    ///
    /// The primary language goes through NER, the pattern table, checksum
    /// validation, phone normalization and the gate. Any other language is
    /// answered by the generic analyzer alone, mapped one entity per span.
    /// Blank text yields no entities and calls no model.
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Model`](crate::domain::VigilError::Model) when a
    /// collaborator fails. There is no partial result.
    pub async fn extract_pii(&self, text: &str, lang: &str) -> Result<Vec<Entity>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        if !self.is_primary(lang) {
            let results = self
                .context
                .analyzer
                .analyze(text, None, ANALYZER_LANGUAGE)
                .await?;
            return Ok(EntityMerger::map_analyzer_output(text, &results));
        }

        let ner = self.context.ner.analyze(text).await?;
        let emails = self
            .context
            .analyzer
            .analyze(text, Some(EMAIL_ONLY), ANALYZER_LANGUAGE)
            .await?;

        Ok(self.merger.merge(text, &ner, &emails))
    }

    /// Toxicity score of `text`; empty text scores zero without a model call
    pub async fn score_toxicity(&self, text: &str) -> Result<f32> {
        if text.trim().is_empty() {
            return Ok(0.0);
        }
        self.context.toxicity.score(text).await
    }

    /// Moderate one message
    ///
    /// Extraction and scoring run concurrently; the verdict is built only
    /// once both have succeeded.
    pub async fn moderate(&self, text: &str, lang: &str) -> Result<ModerationVerdict> {
        let start = Instant::now();
        let request_id = uuid::Uuid::new_v4().to_string();

        let (entities, score) =
            tokio::try_join!(self.extract_pii(text, lang), self.score_toxicity(text))?;

        let verdict = self.policy.decide(entities, score);

        crate::log_verdict!(
            request_id,
            lang,
            verdict,
            start.elapsed().as_millis() as u64
        );

        if let Some(ref logger) = self.audit_logger {
            if let Err(e) = logger.log_verdict(&request_id, lang, &verdict) {
                tracing::warn!(error = %e, request_id = %request_id, "Failed to write audit entry");
            }
        }

        Ok(verdict)
    }

    fn is_primary(&self, lang: &str) -> bool {
        lang.trim().eq_ignore_ascii_case(&self.primary_language)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ModelError, VigilError};
    use crate::moderation::models::{AnalyzerResult, EntityKind, RawEntity, Reason};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedNer(Vec<RawEntity>);

    #[async_trait]
    impl NerPipeline for FixedNer {
        async fn analyze(&self, _text: &str) -> Result<Vec<RawEntity>> {
            Ok(self.0.clone())
        }
    }

    struct NoAnalyzer;

    #[async_trait]
    impl EntityAnalyzer for NoAnalyzer {
        async fn analyze(
            &self,
            _text: &str,
            _entity_types: Option<&[&str]>,
            _language: &str,
        ) -> Result<Vec<AnalyzerResult>> {
            Ok(Vec::new())
        }
    }

    struct CountingToxicity {
        score: f32,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ToxicityClassifier for CountingToxicity {
        async fn score(&self, _text: &str) -> Result<f32> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.score)
        }
    }

    struct FailingToxicity;

    #[async_trait]
    impl ToxicityClassifier for FailingToxicity {
        async fn score(&self, _text: &str) -> Result<f32> {
            Err(ModelError::Timeout("toxicity".to_string()).into())
        }
    }

    fn engine(ner: Vec<RawEntity>, toxicity: Arc<dyn ToxicityClassifier>) -> ModerationEngine {
        let context = ModerationContext::new(Arc::new(FixedNer(ner)), Arc::new(NoAnalyzer), toxicity);
        ModerationEngine::with_policy(context, ModerationPolicy::default(), "ru")
    }

    #[tokio::test]
    async fn test_moderate_person_with_insurance_number() {
        let toxicity = Arc::new(CountingToxicity {
            score: 0.01,
            calls: AtomicUsize::new(0),
        });
        let engine = engine(vec![RawEntity::new("PER", "Иван", 11, 15)], toxicity);

        let verdict = engine
            .moderate("Меня зовут Иван, мой СНИЛС 112-233-445 95", "ru")
            .await
            .unwrap();

        assert!(verdict.flagged());
        assert_eq!(verdict.reason(), Reason::Pii);
        assert_eq!(verdict.entities()[0].kind, EntityKind::Person);
        assert_eq!(
            verdict.entities()[1].kind,
            EntityKind::NationalInsuranceNumber
        );
    }

    #[tokio::test]
    async fn test_empty_text_skips_classifier() {
        let toxicity = Arc::new(CountingToxicity {
            score: 0.9,
            calls: AtomicUsize::new(0),
        });
        let engine = engine(vec![], toxicity.clone());

        let verdict = engine.moderate("", "ru").await.unwrap();

        assert!(!verdict.flagged());
        assert_eq!(verdict.toxicity_score(), 0.0);
        assert_eq!(toxicity.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_classifier_failure_propagates() {
        let engine = engine(vec![], Arc::new(FailingToxicity));
        let result = engine.moderate("привет", "ru").await;
        assert!(matches!(result, Err(VigilError::Model(ModelError::Timeout(_)))));
    }

    #[test]
    fn test_primary_language_match_ignores_case() {
        let engine = engine(
            vec![],
            Arc::new(CountingToxicity {
                score: 0.0,
                calls: AtomicUsize::new(0),
            }),
        );
        assert!(engine.is_primary("RU"));
        assert!(engine.is_primary(" ru "));
        assert!(!engine.is_primary("en"));
    }
}
