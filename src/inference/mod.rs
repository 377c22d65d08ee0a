use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Settings;
use crate::prompt::PromptPayload;

const USER_AGENT: &str = concat!("shindan/", env!("CARGO_PKG_VERSION"));

/// Any failure while talking to the inference service
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("request to the inference service failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("inference service returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("prompt was blocked by the inference service ({0})")]
    Blocked(String),
    #[error("malformed response from the inference service: {0}")]
    MalformedResponse(String),
}

/// Fixed generation policy sent with every request
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub max_output_tokens: u32,
    pub response_mime_type: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 8192,
            response_mime_type: "text/plain".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

impl Content {
    fn user(text: String) -> Self {
        Self {
            role: Some("user".to_string()),
            parts: vec![Part { text: Some(text) }],
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content>,
    generation_config: &'a GenerationConfig,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

/// Stateless client for the hosted generative-text model.
///
/// Each call to [`InferenceClient::predict`] is one independent exchange:
/// the symptom instructions as history, then the trigger message.
#[derive(Debug, Clone)]
pub struct InferenceClient {
    http: reqwest::Client,
    settings: Settings,
    config: GenerationConfig,
}

impl InferenceClient {
    pub fn new(settings: Settings, config: GenerationConfig) -> Result<Self, InferenceError> {
        let http = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            settings,
            config,
        })
    }

    pub fn model(&self) -> &str {
        &self.settings.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.settings.api_base, self.settings.model
        )
    }

    /// Send one prediction request and return the model's text unmodified
    pub async fn predict(&self, payload: &PromptPayload) -> Result<String, InferenceError> {
        let request = GenerateContentRequest {
            contents: vec![
                Content::user(payload.instructions()),
                Content::user(payload.trigger_message()),
            ],
            generation_config: &self.config,
        };

        debug!(
            model = %self.settings.model,
            symptoms = payload.symptoms().len(),
            "Requesting disease prediction"
        );

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.settings.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), bytes = body.len(), "Inference service responded");

        if !status.is_success() {
            return Err(status_error(status, &body));
        }

        extract_text(&body)
    }
}

fn status_error(status: StatusCode, body: &str) -> InferenceError {
    let message = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => match envelope.error.status {
            Some(code) if !envelope.error.message.is_empty() => {
                format!("{} ({})", envelope.error.message, code)
            }
            _ if !envelope.error.message.is_empty() => envelope.error.message,
            Some(code) => code,
            None => body.trim().to_string(),
        },
        Err(_) => body.trim().to_string(),
    };

    let message = if message.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("no details")
            .to_string()
    } else {
        message
    };

    warn!(status = status.as_u16(), "Inference service rejected request");
    InferenceError::Status {
        status: status.as_u16(),
        message,
    }
}

fn extract_text(body: &str) -> Result<String, InferenceError> {
    let parsed: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| InferenceError::MalformedResponse(e.to_string()))?;

    if let Some(reason) = parsed
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
    {
        return Err(InferenceError::Blocked(reason));
    }

    let candidate = parsed
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| InferenceError::MalformedResponse("no candidates returned".to_string()))?;

    let text: String = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        let reason = candidate
            .finish_reason
            .unwrap_or_else(|| "unknown finish reason".to_string());
        return Err(InferenceError::MalformedResponse(format!(
            "candidate has no text ({})",
            reason
        )));
    }

    Ok(text)
}
