use async_trait::async_trait;
use reqwest::Client;
use std::env;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use super::endpoints::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, OpenRouterAvailableModel, Provider,
    OPENROUTER_BASE_URL, OPENROUTER_MODELS,
};

/// Failure of the model call itself. Unlike malformed model output, these are
/// surfaced to the caller.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("API key not found in environment: {0}")]
    MissingApiKey(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("API error {status}: {error_body}")]
    Api {
        status: reqwest::StatusCode,
        error_body: String,
    },
    #[error("No response choices received from API")]
    EmptyResponse,
}

impl Provider {
    pub fn openrouter(api_key_env_var_name: &str) -> Self {
        Self::OpenRouter {
            api_key: api_key_env_var_name.to_string(),
            base_url: OPENROUTER_BASE_URL.to_string(),
            available_models: OPENROUTER_MODELS.to_vec(),
        }
    }

    pub fn with_base_url(self, url: &str) -> Self {
        match self {
            Provider::OpenRouter { api_key, available_models, .. } => Provider::OpenRouter {
                api_key,
                base_url: url.trim_end_matches('/').to_string(),
                available_models,
            },
        }
    }

    pub fn get_available_models(&self) -> Vec<OpenRouterAvailableModel> {
        match self {
            Provider::OpenRouter { available_models, .. } => available_models.clone(),
        }
    }

    pub async fn call_chat_completion(
        &self,
        client: &Client,
        request: ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, ProviderError> {
        match self {
            Provider::OpenRouter {
                api_key: api_key_env_var_name,
                base_url,
                ..
            } => {
                let actual_api_key = env::var(api_key_env_var_name)
                    .map_err(|_| ProviderError::MissingApiKey(api_key_env_var_name.clone()))?;

                let url = format!("{}/chat/completions", base_url);
                let site_url = env::var("SITE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
                let app_name = env::var("APP_NAME").unwrap_or_else(|_| "MenuChat".to_string());

                let response = client
                    .post(&url)
                    .bearer_auth(actual_api_key)
                    .header("HTTP-Referer", site_url)
                    .header("X-Title", app_name)
                    .json(&request)
                    .send()
                    .await?;

                if response.status().is_success() {
                    let body = response.text().await?;
                    Ok(serde_json::from_str::<ChatCompletionResponse>(&body)?)
                } else {
                    let status = response.status();
                    let error_body = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Failed to read error body".to_string());
                    Err(ProviderError::Api { status, error_body })
                }
            }
        }
    }
}

/// A language model that turns a prompt into raw reply text.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, ProviderError>;
}

/// [`ChatModel`] backed by an OpenRouter chat completion endpoint.
#[derive(Clone, Debug)]
pub struct OpenRouterChat {
    provider: Provider,
    client: Client,
    model: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl OpenRouterChat {
    pub fn new(provider: Provider, model: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            provider,
            client,
            model: model.to_string(),
            temperature: None,
            max_tokens: None,
        })
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

#[async_trait]
impl ChatModel for OpenRouterChat {
    async fn complete(&self, messages: Vec<ChatMessage>) -> Result<String, ProviderError> {
        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };
        let response = self.provider.call_chat_completion(&self.client, request).await?;
        if response.choices.is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        let content = response.first_content().unwrap_or_default().to_string();
        debug!(model = %response.model, raw = %content, "raw model response");
        Ok(content)
    }
}
