use async_openai::error::OpenAIError;
use async_openai::types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs};
use async_trait::async_trait;
use ollama_rs::error::OllamaError;
use ollama_rs::generation::completion::request::GenerationRequest;
use ollama_rs::generation::options::GenerationOptions;
use tokio::time::{timeout, Duration};
use tracing::{debug, warn};

use crate::errors::RewriteError;
use crate::{LLMClient, LLMParams, TARGET_LLM_REQUEST};

pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(120);

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TOP_P: f32 = 0.9;
pub const DEFAULT_TOP_K: u32 = 40;
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 500;

/// The text-generation capability the pipeline depends on. `LLMParams`
/// implements it against a real backend; tests substitute fakes.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, RewriteError>;
}

#[async_trait]
impl TextGenerator for LLMParams {
    async fn generate(&self, prompt: &str) -> Result<String, RewriteError> {
        generate_rewrite(prompt, self).await
    }
}

/// Issues one stateless generation call against the configured backend. No
/// session or context is carried between calls.
pub async fn generate_rewrite(prompt: &str, params: &LLMParams) -> Result<String, RewriteError> {
    debug!(target: TARGET_LLM_REQUEST, "Sending rewrite prompt to {} ({} chars)", params.model, prompt.len());

    let response_text = match &params.llm_client {
        LLMClient::Ollama(ollama) => {
            let mut request = GenerationRequest::new(params.model.clone(), prompt.to_string());
            request.options = Some(
                GenerationOptions::default()
                    .temperature(params.temperature)
                    .top_p(params.top_p)
                    .top_k(params.top_k)
                    .num_predict(params.max_output_tokens as i32),
            );

            match timeout(GENERATION_TIMEOUT, ollama.generate(request)).await {
                Ok(Ok(response)) => response.response,
                Ok(Err(err @ OllamaError::ReqwestError(_))) => {
                    warn!(target: TARGET_LLM_REQUEST, "Ollama unreachable: {}", err);
                    return Err(RewriteError::GenerationUnavailable(err.to_string()));
                }
                Ok(Err(err)) => {
                    warn!(target: TARGET_LLM_REQUEST, "Ollama returned an error: {}", err);
                    return Err(RewriteError::GenerationFailed(err.to_string()));
                }
                Err(_) => {
                    warn!(target: TARGET_LLM_REQUEST, "Ollama request timed out");
                    return Err(RewriteError::GenerationUnavailable(
                        "request timed out".to_string(),
                    ));
                }
            }
        }
        LLMClient::OpenAI(client) => {
            let message = ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()
                .map_err(|err| RewriteError::GenerationFailed(err.to_string()))?;
            let request = CreateChatCompletionRequestArgs::default()
                .model(params.model.clone())
                .temperature(params.temperature)
                .top_p(params.top_p)
                .max_tokens(params.max_output_tokens)
                .messages(vec![message.into()])
                .build()
                .map_err(|err| RewriteError::GenerationFailed(err.to_string()))?;

            match timeout(GENERATION_TIMEOUT, client.chat().create(request)).await {
                Ok(Ok(response)) => response
                    .choices
                    .into_iter()
                    .next()
                    .and_then(|choice| choice.message.content)
                    .unwrap_or_default(),
                Ok(Err(err @ OpenAIError::Reqwest(_))) => {
                    warn!(target: TARGET_LLM_REQUEST, "OpenAI unreachable: {}", err);
                    return Err(RewriteError::GenerationUnavailable(err.to_string()));
                }
                Ok(Err(err)) => {
                    warn!(target: TARGET_LLM_REQUEST, "OpenAI returned an error: {}", err);
                    return Err(RewriteError::GenerationFailed(err.to_string()));
                }
                Err(_) => {
                    warn!(target: TARGET_LLM_REQUEST, "OpenAI request timed out");
                    return Err(RewriteError::GenerationUnavailable(
                        "request timed out".to_string(),
                    ));
                }
            }
        }
    };

    if response_text.trim().is_empty() {
        warn!(target: TARGET_LLM_REQUEST, "Model returned an empty response");
        return Err(RewriteError::GenerationFailed(
            "empty response from model".to_string(),
        ));
    }

    debug!(target: TARGET_LLM_REQUEST, "Received {} chars of generated text", response_text.len());
    Ok(response_text)
}
