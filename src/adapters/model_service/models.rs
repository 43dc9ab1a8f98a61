//! Wire types of the model service

use crate::moderation::models::{AnalyzerResult, RawEntity};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct TextRequest<'a> {
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnalyzeRequest<'a> {
    pub text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entities: Option<&'a [&'a str]>,
    pub language: &'a str,
}

/// One span tagged by the NER pipeline
#[derive(Debug, Deserialize)]
pub(crate) struct NerSpan {
    #[serde(alias = "type", alias = "label")]
    pub kind: String,
    pub text: String,
    pub start: usize,
    pub end: usize,
}

impl From<NerSpan> for RawEntity {
    fn from(span: NerSpan) -> Self {
        RawEntity::new(span.kind, span.text, span.start, span.end)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct NerResponse {
    #[serde(default)]
    pub entities: Vec<NerSpan>,
}

/// One span reported by the generic analyzer
#[derive(Debug, Deserialize)]
pub(crate) struct AnalyzerSpan {
    pub entity_type: String,
    pub start: usize,
    pub end: usize,
}

impl From<AnalyzerSpan> for AnalyzerResult {
    fn from(span: AnalyzerSpan) -> Self {
        AnalyzerResult::new(span.entity_type, span.start, span.end)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnalyzeResponse {
    #[serde(default)]
    pub results: Vec<AnalyzerSpan>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ToxicityResponse {
    pub score: f32,
}
