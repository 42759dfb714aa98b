use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::GeminiConfig;
use crate::prompt::build_translation_prompt;
use crate::schema::{GraphSchema, TranslatedQuery};

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("API request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API returned {status}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("failed to parse API response: {reason}")]
    Malformed { reason: String, payload: String },

    #[error("model output is not a usable query object: {source}")]
    InvalidQuery {
        #[source]
        source: serde_json::Error,
        text: String,
    },
}

impl TranslateError {
    /// Raw text worth showing alongside the error, if any.
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Self::Request(_) => None,
            Self::Status { body, .. } => Some(body),
            Self::Malformed { payload, .. } => Some(payload),
            Self::InvalidQuery { text, .. } => Some(text),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<RequestContent>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct RequestContent {
    role: &'static str,
    parts: Vec<TextPart>,
}

#[derive(Serialize, Deserialize)]
struct TextPart {
    text: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<TextPart>,
}

fn query_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "query": {"type": "STRING", "description": "Cypher query to run."},
            "explanation": {"type": "STRING", "description": "Explanation of query."}
        },
        "required": ["query", "explanation"]
    })
}

#[derive(Clone)]
pub struct GeminiTranslator {
    endpoint: String,
    api_key: String,
    client: reqwest::Client,
}

impl GeminiTranslator {
    pub fn new(config: &GeminiConfig) -> Self {
        Self {
            endpoint: format!(
                "{}/v1beta/models/{}:generateContent",
                config.base_url.trim_end_matches('/'),
                config.model
            ),
            api_key: config.api_key.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// Ask the model for a Cypher statement. Failures are logged with the raw
    /// payload and come back as `None`.
    pub async fn translate(&self, schema: &GraphSchema, question: &str) -> Option<TranslatedQuery> {
        match self.try_translate(schema, question).await {
            Ok(translated) => Some(translated),
            Err(e) => {
                warn!(error = %e, "translation failed");
                if let Some(payload) = e.diagnostic() {
                    warn!(payload, "received payload");
                }
                None
            }
        }
    }

    pub async fn try_translate(
        &self,
        schema: &GraphSchema,
        question: &str,
    ) -> Result<TranslatedQuery, TranslateError> {
        let request = GenerateRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![TextPart {
                    text: build_translation_prompt(schema, question),
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: query_response_schema(),
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(%status, bytes = body.len(), "Gemini response received");

        if !status.is_success() {
            return Err(TranslateError::Status { status, body });
        }

        let generated = extract_generated_text(&body)?;

        serde_json::from_str(&generated).map_err(|source| TranslateError::InvalidQuery {
            source,
            text: generated,
        })
    }
}

/// `candidates[0].content.parts[0].text`
fn extract_generated_text(body: &str) -> Result<String, TranslateError> {
    let malformed = |reason: String| TranslateError::Malformed {
        reason,
        payload: body.to_string(),
    };

    let response: GenerateResponse =
        serde_json::from_str(body).map_err(|e| malformed(e.to_string()))?;

    response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| malformed("response has no candidates".to_string()))?
        .content
        .parts
        .into_iter()
        .next()
        .map(|part| part.text)
        .ok_or_else(|| malformed("candidate has no parts".to_string()))
}
