//! HTTP client for the model service
//!
//! The service hosts all three models behind one base URL:
//!
//! | Route            | Request                              | Response                          |
//! |------------------|--------------------------------------|-----------------------------------|
//! | `POST /ner`      | `{text}`                             | `{entities: [{type, text, start, end}]}` |
//! | `POST /analyze`  | `{text, entities?, language}`        | `{results: [{entity_type, start, end}]}` |
//! | `POST /toxicity` | `{text}`                             | `{score}`                         |
//!
//! No call is retried here. A failed call fails the request.

use super::models::{
    AnalyzeRequest, AnalyzeResponse, NerResponse, TextRequest, ToxicityResponse,
};
use crate::config::ModelsConfig;
use crate::domain::{ModelError, Result, VigilError};
use crate::moderation::collaborators::{EntityAnalyzer, NerPipeline, ToxicityClassifier};
use crate::moderation::models::{AnalyzerResult, RawEntity};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

/// Model service client
///
/// Implements [`NerPipeline`], [`EntityAnalyzer`] and [`ToxicityClassifier`]
/// so one instance can fill every model slot of a
/// [`ModerationContext`](crate::moderation::ModerationContext).
///
/// # Example
///
/// ```no_run
/// use vigil::adapters::model_service::ModelServiceClient;
/// use vigil::config::ModelsConfig;
/// use vigil::moderation::ToxicityClassifier;
///
/// # async fn example() -> vigil::domain::Result<()> {
/// let client = ModelServiceClient::new(&ModelsConfig::default())?;
/// let score = client.score("привет").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ModelServiceClient {
    base_url: Url,
    client: Client,
}

impl ModelServiceClient {
    /// Create a client from configuration
    ///
    /// # Errors
    ///
    /// Returns [`VigilError::Configuration`] for an unparsable base URL or
    /// when the HTTP client cannot be built.
    pub fn new(config: &ModelsConfig) -> Result<Self> {
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| {
            VigilError::Configuration(format!("Invalid models.base_url '{}': {e}", config.base_url))
        })?;

        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.timeout_seconds.min(10)))
            .build()
            .map_err(|e| {
                VigilError::Configuration(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self { base_url, client })
    }

    /// Base URL of the model service
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    async fn post<B, R>(&self, route: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.base_url.join(route).map_err(|e| {
            VigilError::Configuration(format!("Invalid model route '{route}': {e}"))
        })?;

        tracing::debug!(route, "Calling model service");

        let resp = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| map_transport_error(route, e))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            let error = if status.is_server_error() {
                ModelError::ServerError {
                    status: status.as_u16(),
                    message,
                }
            } else {
                ModelError::ClientError {
                    status: status.as_u16(),
                    message,
                }
            };
            tracing::error!(route, status = status.as_u16(), "Model service returned an error");
            return Err(error.into());
        }

        resp.json::<R>()
            .await
            .map_err(|e| VigilError::from(ModelError::InvalidResponse(format!("{route}: {e}"))))
    }
}

fn map_transport_error(route: &str, error: reqwest::Error) -> VigilError {
    let model_error = if error.is_timeout() {
        ModelError::Timeout(format!("{route}: {error}"))
    } else {
        ModelError::ConnectionFailed(format!("{route}: {error}"))
    };
    tracing::error!(route, error = %model_error, "Model service call failed");
    model_error.into()
}

#[async_trait]
impl NerPipeline for ModelServiceClient {
    async fn analyze(&self, text: &str) -> Result<Vec<RawEntity>> {
        let response: NerResponse = self.post("ner", &TextRequest { text }).await?;
        Ok(response.entities.into_iter().map(RawEntity::from).collect())
    }
}

#[async_trait]
impl EntityAnalyzer for ModelServiceClient {
    async fn analyze(
        &self,
        text: &str,
        entity_types: Option<&[&str]>,
        language: &str,
    ) -> Result<Vec<AnalyzerResult>> {
        let request = AnalyzeRequest {
            text,
            entities: entity_types,
            language,
        };
        let response: AnalyzeResponse = self.post("analyze", &request).await?;
        Ok(response
            .results
            .into_iter()
            .map(AnalyzerResult::from)
            .collect())
    }
}

#[async_trait]
impl ToxicityClassifier for ModelServiceClient {
    async fn score(&self, text: &str) -> Result<f32> {
        let response: ToxicityResponse = self.post("toxicity", &TextRequest { text }).await?;
        if !response.score.is_finite() || !(0.0..=1.0).contains(&response.score) {
            return Err(ModelError::InvalidResponse(format!(
                "toxicity score out of range: {}",
                response.score
            ))
            .into());
        }
        Ok(response.score)
    }
}
