use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::debug;

use crate::{
    config::{GeminiConfig, DEFAULT_GEMINI_BASE_URL},
    error::{GenerationError, Result, TripError},
    services::{ImageGenerator, StructuredRequest, TextGenerator},
};

const API_VERSION: &str = "v1beta";
const JSON_MIME_TYPE: &str = "application/json";

/// Client for the Gemini `generateContent` and Imagen `predict` endpoints.
///
/// One HTTP call per method invocation; no retries.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    pub fn from_config(config: &GeminiConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|err| TripError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
            http,
        })
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = base_url.into();
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.set_base_url(base_url);
        self
    }

    async fn post_model(
        &self,
        model: &str,
        method: &str,
        body: &Value,
    ) -> std::result::Result<Value, GenerationError> {
        let request_url = build_model_url(&self.base_url, model, method);

        let response = self
            .http
            .post(&request_url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| {
                GenerationError::TransportFailure(format!("HTTP request failed: {err}"))
            })?;

        let status = response.status();
        let response_text = response.text().await.map_err(|err| {
            GenerationError::TransportFailure(format!("Failed to read response: {err}"))
        })?;

        if !status.is_success() {
            let api_message = serde_json::from_str::<Value>(&response_text)
                .ok()
                .and_then(|body| {
                    body.get("error")
                        .and_then(|error| error.get("message"))
                        .and_then(Value::as_str)
                        .map(str::to_string)
                })
                .unwrap_or(response_text);

            return Err(GenerationError::TransportFailure(format!(
                "HTTP {} error: {}",
                status, api_message
            )));
        }

        debug!(model, method, bytes = response_text.len(), "provider responded");

        serde_json::from_str(&response_text).map_err(|err| {
            GenerationError::InvalidResponse(format!("Failed to parse provider envelope: {err}"))
        })
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate_json(
        &self,
        request: &StructuredRequest,
    ) -> std::result::Result<String, GenerationError> {
        let body = GenerateContentRequest::new(&request.prompt)
            .with_response_schema(request.response_schema.clone())
            .into_value();

        let envelope = self
            .post_model(&request.model, "generateContent", &body)
            .await?;

        extract_candidate_text(&envelope)
    }
}

#[async_trait]
impl ImageGenerator for GeminiClient {
    async fn generate_image(
        &self,
        model: &str,
        prompt: &str,
    ) -> std::result::Result<String, GenerationError> {
        let body = json!({
            "instances": { "prompt": prompt },
            "parameters": { "sampleCount": 1 }
        });

        let envelope = self.post_model(model, "predict", &body).await?;

        envelope
            .get("predictions")
            .and_then(Value::as_array)
            .and_then(|predictions| predictions.first())
            .and_then(|prediction| prediction.get("bytesBase64Encoded"))
            .and_then(Value::as_str)
            .filter(|bytes| !bytes.is_empty())
            .map(str::to_string)
            .ok_or_else(|| {
                GenerationError::InvalidResponse("prediction carried no image bytes".to_string())
            })
    }
}

fn build_model_url(base_url: &str, model: &str, method: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    let versioned = if trimmed.ends_with(API_VERSION) {
        trimmed.to_string()
    } else {
        format!("{trimmed}/{API_VERSION}")
    };
    format!("{versioned}/models/{model}:{method}")
}

/// Concatenate the text parts of the first candidate.
fn extract_candidate_text(envelope: &Value) -> std::result::Result<String, GenerationError> {
    if let Some(reason) = envelope
        .get("promptFeedback")
        .and_then(|feedback| feedback.get("blockReason"))
        .and_then(Value::as_str)
    {
        return Err(GenerationError::InvalidResponse(format!(
            "prompt was blocked: {reason}"
        )));
    }

    let candidate = envelope
        .get("candidates")
        .and_then(Value::as_array)
        .and_then(|candidates| candidates.first())
        .ok_or_else(|| {
            GenerationError::InvalidResponse("response contained no candidates".to_string())
        })?;

    let parts = candidate
        .get("content")
        .and_then(|content| content.get("parts"))
        .and_then(Value::as_array)
        .ok_or_else(|| {
            let reason = candidate
                .get("finishReason")
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            GenerationError::InvalidResponse(format!(
                "candidate has no content (finish reason: {reason})"
            ))
        })?;

    let text: String = parts
        .iter()
        .filter_map(|part| part.get("text").and_then(Value::as_str))
        .collect();

    Ok(text)
}

#[derive(Clone, Debug)]
pub struct GenerateContentRequest {
    prompt: String,
    response_schema: Option<Value>,
}

impl GenerateContentRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            response_schema: None,
        }
    }

    pub fn with_response_schema(mut self, response_schema: Value) -> Self {
        self.response_schema = Some(response_schema);
        self
    }

    pub fn into_value(self) -> Value {
        let mut body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": self.prompt }]
            }],
            "generationConfig": {
                "responseMimeType": JSON_MIME_TYPE
            }
        });

        if let Some(schema) = self.response_schema {
            body["generationConfig"]["responseSchema"] = schema;
        }

        body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_url_adds_version_once() {
        assert_eq!(
            build_model_url(
                "https://generativelanguage.googleapis.com/",
                "gemini-2.5-flash",
                "generateContent"
            ),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(
            build_model_url("http://localhost:1234/v1beta", "imagen", "predict"),
            "http://localhost:1234/v1beta/models/imagen:predict"
        );
    }

    #[test]
    fn request_body_always_asks_for_json() {
        let body = GenerateContentRequest::new("plan a trip")
            .with_response_schema(json!({ "type": "OBJECT" }))
            .into_value();

        assert_eq!(body["contents"][0]["parts"][0]["text"], "plan a trip");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
    }

    #[test]
    fn candidate_text_parts_are_joined() {
        let envelope = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"a\":" }, { "text": " 1}" }] }
            }]
        });
        assert_eq!(extract_candidate_text(&envelope).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn blocked_or_empty_candidates_are_invalid() {
        let blocked = json!({ "promptFeedback": { "blockReason": "SAFETY" } });
        assert!(matches!(
            extract_candidate_text(&blocked),
            Err(GenerationError::InvalidResponse(message)) if message.contains("SAFETY")
        ));

        let no_content = json!({ "candidates": [{ "finishReason": "MAX_TOKENS" }] });
        assert!(matches!(
            extract_candidate_text(&no_content),
            Err(GenerationError::InvalidResponse(message)) if message.contains("MAX_TOKENS")
        ));
    }
}
