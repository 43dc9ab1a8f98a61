//! Request and response bodies of the moderation extension protocol

use serde::{Deserialize, Serialize};

/// Liveness probe point
pub const POINT_PING: &str = "ping";

/// Points answered with a moderation verdict
pub const MODERATION_POINTS: [&str; 4] = [
    "APP_MODERATION_INPUT",
    "APP_MODERATION_OUTPUT",
    "app.moderation.input",
    "app.moderation.output",
];

/// The only action this service returns
pub const ACTION_DIRECT_OUTPUT: &str = "direct_output";

/// Extension call
#[derive(Debug, Clone, Deserialize)]
pub struct ExtensionRequest {
    pub point: String,
    #[serde(default)]
    pub params: ModerationParams,
}

/// Parameters of a moderation point
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModerationParams {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub inputs: Option<ModerationInputs>,
    #[serde(default)]
    pub text: Option<String>,
}

/// Form inputs of an app
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ModerationInputs {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

impl ModerationParams {
    /// Text to moderate and its language
    ///
    /// `query` wins over `inputs.text`, which wins over `text`. Only
    /// `inputs` carries a language; every other source uses
    /// `default_lang`.
    pub fn text_and_lang<'a>(&'a self, default_lang: &'a str) -> (&'a str, &'a str) {
        if let Some(query) = non_empty(&self.query) {
            return (query, default_lang);
        }
        if let Some(inputs) = &self.inputs {
            if let Some(text) = non_empty(&inputs.text) {
                let lang = non_empty(&inputs.lang).unwrap_or(default_lang);
                return (text, lang);
            }
        }
        if let Some(text) = non_empty(&self.text) {
            return (text, default_lang);
        }
        ("", default_lang)
    }
}

/// Answer to an extension call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtensionResponse {
    Pong { result: String },
    Moderation(ModerationResponse),
}

/// Moderation answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModerationResponse {
    pub flagged: bool,
    pub action: String,
    pub preset_response: String,
}

impl ModerationResponse {
    pub fn new(flagged: bool, preset_response: impl Into<String>) -> Self {
        Self {
            flagged,
            action: ACTION_DIRECT_OUTPUT.to_string(),
            preset_response: preset_response.into(),
        }
    }
}
