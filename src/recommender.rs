use async_openai::{
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use std::time::Instant;

use crate::error::{RecommenderError, Result};
use crate::parsing::interpret;
use crate::prompts::build_prompt;
use crate::types::{RecommendationRequest, RecommendationResult, RecommenderConfig};

/// Placeholder key for local OpenAI-compatible servers that ignore auth
const LOCAL_API_KEY: &str = "ollama";

/// Hosted OpenAI API, which always needs a real key
const OPENAI_HOST: &str = "api.openai.com";

/// Resolve the client config, falling back to `env_key` when the config has no key
fn client_config(config: &RecommenderConfig, env_key: Option<String>) -> Result<OpenAIConfig> {
    let api_key = config.api_key.clone().or(env_key);

    let openai_config = match (&config.base_url, api_key) {
        (Some(base_url), Some(key)) => OpenAIConfig::new().with_api_base(base_url).with_api_key(key),
        (Some(base_url), None) if !base_url.contains(OPENAI_HOST) => OpenAIConfig::new()
            .with_api_base(base_url)
            .with_api_key(LOCAL_API_KEY),
        (None, Some(key)) => OpenAIConfig::new().with_api_key(key),
        _ => return Err(RecommenderError::MissingApiKey),
    };

    Ok(openai_config)
}

/// Recommendation pipeline bound to a chat-completion backend
pub struct Recommender {
    config: RecommenderConfig,
    client: Client<OpenAIConfig>,
}

impl Recommender {
    /// Create a new recommender from config.
    ///
    /// The API key comes from the config, then `OPENAI_API_KEY`. A custom
    /// base URL without a key is assumed to be a local server.
    pub fn new(config: RecommenderConfig) -> Result<Self> {
        let openai_config = client_config(&config, std::env::var("OPENAI_API_KEY").ok())?;

        if !(0.0..=2.0).contains(&config.temperature) {
            return Err(RecommenderError::Config(format!(
                "temperature must be within 0.0..=2.0, got {}",
                config.temperature
            )));
        }

        Ok(Self {
            config,
            client: Client::with_config(openai_config),
        })
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    /// Run one recommendation round trip.
    ///
    /// Upstream failures are returned as errors; anything wrong with the
    /// model's reply only shrinks the recommendation list.
    pub async fn recommend(&self, request: &RecommendationRequest) -> Result<RecommendationResult> {
        request.validate()?;

        let start = Instant::now();
        let prompt = build_prompt(
            &request.rated_tracks,
            &request.unrated_tracks,
            request.training_mode,
        );

        tracing::debug!(
            mode = %request.training_mode,
            rated = request.rated_tracks.len(),
            candidates = request.unrated_tracks.len(),
            prompt_chars = prompt.len(),
            "Built recommendation prompt"
        );

        let response = self.complete(&prompt).await?;
        let result = interpret(&response, &request.unrated_tracks);

        tracing::info!(
            mode = %request.training_mode,
            recommended = result.recommendations.len(),
            elapsed = ?start.elapsed(),
            "Recommendation complete"
        );

        Ok(result)
    }

    /// Send a single-message completion and return the reply text
    pub async fn complete(&self, prompt: &str) -> Result<String> {
        let messages = vec![ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()?,
        )];

        let mut request_builder = CreateChatCompletionRequestArgs::default();
        request_builder
            .model(&self.config.model)
            .messages(messages)
            .temperature(self.config.temperature);

        if let Some(max_tokens) = self.config.max_tokens {
            request_builder.max_tokens(max_tokens);
        }

        let request = request_builder.build()?;
        let response = self.client.chat().create(request).await?;

        if let Some(usage) = &response.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Completion usage"
            );
        }

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();

        Ok(content)
    }
}
