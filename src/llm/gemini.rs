use crate::config::profile::ScanProfile;
use crate::llm::types::{
    Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, SignalReply,
    ToolSpec,
};
use crate::llm::{SignalBackend, TransportError};
use crate::scan::compiler::CompiledRequest;
use reqwest::Client;
use std::time::Duration;

/// Gemini generation client.
///
/// The credential is injected at construction; this client never reads the
/// environment, rotates keys or refreshes anything.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    profile: ScanProfile,
    api_key: String,
}

impl GeminiClient {
    pub fn new(profile: ScanProfile, api_key: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("reqwest client with static configuration"),
            profile,
            api_key: api_key.into(),
        }
    }
}

#[async_trait::async_trait]
impl SignalBackend for GeminiClient {
    async fn generate(&self, request: &CompiledRequest) -> Result<SignalReply, TransportError> {
        if self.api_key.is_empty() {
            return Err(TransportError::InvalidApiKey);
        }

        let api_base = self
            .profile
            .api_base
            .as_deref()
            .unwrap_or("https://generativelanguage.googleapis.com");

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            api_base, self.profile.model
        );

        tracing::debug!(
            api_base = %api_base,
            model = %self.profile.model,
            prompt_len = request.prompt.len(),
            "gemini generate request"
        );

        let body = GenerateContentRequest {
            contents: vec![Content::user(&request.prompt)],
            system_instruction: Some(Content::system(&request.system_instruction)),
            tools: vec![ToolSpec::web_search()],
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: request.schema.clone(),
            }),
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            tracing::warn!(
                status = %status,
                error = %crate::logging::redact_secrets(&error_text),
                "gemini api returned error"
            );

            return match status.as_u16() {
                401 | 403 => Err(TransportError::InvalidApiKey),
                429 => Err(TransportError::QuotaExceeded),
                _ => Err(TransportError::Api(format!(
                    "HTTP {}: {}",
                    status, error_text
                ))),
            };
        }

        let payload: GenerateContentResponse = response.json().await?;

        let text = payload.text();
        let grounding = payload.grounding_chunks();

        tracing::debug!(
            text_len = text.len(),
            grounding_count = grounding.len(),
            "gemini generate completed"
        );

        Ok(SignalReply { text, grounding })
    }
}
