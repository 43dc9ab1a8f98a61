//! Shared test doubles for the model collaborators

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use vigil::domain::{ModelError, Result};
use vigil::moderation::models::{AnalyzerResult, RawEntity};
use vigil::moderation::{
    EntityAnalyzer, ModerationContext, ModerationEngine, ModerationPolicy, NerPipeline,
    ToxicityClassifier,
};

/// Character span of the first occurrence of `needle` in `text`
pub fn char_span(text: &str, needle: &str) -> (usize, usize) {
    let byte_start = text
        .find(needle)
        .unwrap_or_else(|| panic!("'{needle}' not found in '{text}'"));
    let start = text[..byte_start].chars().count();
    (start, start + needle.chars().count())
}

/// NER double tagging the given surfaces wherever they occur in the text
pub struct StubNer {
    tags: Vec<(String, String)>,
    pub calls: AtomicUsize,
}

impl StubNer {
    pub fn new(tags: &[(&str, &str)]) -> Self {
        Self {
            tags: tags
                .iter()
                .map(|(kind, surface)| (kind.to_string(), surface.to_string()))
                .collect(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn empty() -> Self {
        Self::new(&[])
    }
}

#[async_trait]
impl NerPipeline for StubNer {
    async fn analyze(&self, text: &str) -> Result<Vec<RawEntity>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .tags
            .iter()
            .filter(|(_, surface)| text.contains(surface.as_str()))
            .map(|(kind, surface)| {
                let (start, end) = char_span(text, surface);
                RawEntity::new(kind.clone(), surface.clone(), start, end)
            })
            .collect())
    }
}

/// Analyzer double
///
/// Answers category-restricted calls with the spans of `emails` and
/// unrestricted calls with `full`. Every call is recorded.
#[derive(Default)]
pub struct StubAnalyzer {
    emails: Vec<String>,
    full: Vec<(String, String)>,
    pub calls: Mutex<Vec<(Option<Vec<String>>, String)>>,
}

impl StubAnalyzer {
    pub fn with_emails(emails: &[&str]) -> Self {
        Self {
            emails: emails.iter().map(|e| e.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn with_full(results: &[(&str, &str)]) -> Self {
        Self {
            full: results
                .iter()
                .map(|(label, surface)| (label.to_string(), surface.to_string()))
                .collect(),
            ..Default::default()
        }
    }

    pub fn recorded_calls(&self) -> Vec<(Option<Vec<String>>, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl EntityAnalyzer for StubAnalyzer {
    async fn analyze(
        &self,
        text: &str,
        entity_types: Option<&[&str]>,
        language: &str,
    ) -> Result<Vec<AnalyzerResult>> {
        self.calls.lock().unwrap().push((
            entity_types.map(|types| types.iter().map(|t| t.to_string()).collect()),
            language.to_string(),
        ));

        let spans: Vec<(String, String)> = match entity_types {
            Some(_) => self
                .emails
                .iter()
                .map(|e| ("EMAIL_ADDRESS".to_string(), e.clone()))
                .collect(),
            None => self.full.clone(),
        };

        Ok(spans
            .into_iter()
            .filter(|(_, surface)| text.contains(surface.as_str()))
            .map(|(label, surface)| {
                let (start, end) = char_span(text, &surface);
                AnalyzerResult::new(label, start, end)
            })
            .collect())
    }
}

/// Classifier double returning a fixed score
pub struct FixedToxicity {
    score: f32,
    pub calls: AtomicUsize,
}

impl FixedToxicity {
    pub fn new(score: f32) -> Self {
        Self {
            score,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl ToxicityClassifier for FixedToxicity {
    async fn score(&self, _text: &str) -> Result<f32> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.score)
    }
}

/// Collaborator double that always fails
pub struct FailingModel;

#[async_trait]
impl NerPipeline for FailingModel {
    async fn analyze(&self, _text: &str) -> Result<Vec<RawEntity>> {
        Err(ModelError::ConnectionFailed("ner unavailable".to_string()).into())
    }
}

#[async_trait]
impl EntityAnalyzer for FailingModel {
    async fn analyze(
        &self,
        _text: &str,
        _entity_types: Option<&[&str]>,
        _language: &str,
    ) -> Result<Vec<AnalyzerResult>> {
        Err(ModelError::ServerError {
            status: 500,
            message: "analyzer crashed".to_string(),
        }
        .into())
    }
}

#[async_trait]
impl ToxicityClassifier for FailingModel {
    async fn score(&self, _text: &str) -> Result<f32> {
        Err(ModelError::Timeout("toxicity".to_string()).into())
    }
}

/// Engine over the built-in tables with the default policy and `ru` primary
pub fn engine_with(
    ner: Arc<dyn NerPipeline>,
    analyzer: Arc<dyn EntityAnalyzer>,
    toxicity: Arc<dyn ToxicityClassifier>,
) -> ModerationEngine {
    let context = ModerationContext::new(ner, analyzer, toxicity);
    ModerationEngine::with_policy(context, ModerationPolicy::default(), "ru")
}

/// Engine with a NER double, no emails and a fixed toxicity score
pub fn simple_engine(tags: &[(&str, &str)], score: f32) -> ModerationEngine {
    engine_with(
        Arc::new(StubNer::new(tags)),
        Arc::new(StubAnalyzer::default()),
        Arc::new(FixedToxicity::new(score)),
    )
}
