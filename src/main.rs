use anyhow::{anyhow, Result};
use async_openai::{config::OpenAIConfig, Client as OpenAIClient};
use ollama_rs::Ollama;
use std::env;
use tracing::info;

use limelight::llm::{
    DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_TEMPERATURE, DEFAULT_TOP_K, DEFAULT_TOP_P,
};
use limelight::news::GNewsClient;
use limelight::pipeline::RewritePipeline;
use limelight::{logging, web, LLMClient, LLMParams};

#[tokio::main]
async fn main() -> Result<()> {
    logging::configure_logging();

    let llm_client = match env::var("LLM_CLIENT_TYPE")
        .unwrap_or_else(|_| "ollama".to_string())
        .to_lowercase()
        .as_str()
    {
        "openai" => {
            let api_key = env::var("OPENAI_API_KEY")
                .map_err(|_| anyhow!("OPENAI_API_KEY is required for the openai backend"))?;
            let config = OpenAIConfig::new().with_api_key(api_key);
            LLMClient::OpenAI(OpenAIClient::with_config(config))
        }
        _ => {
            let host = env::var("OLLAMA_HOST").unwrap_or_else(|_| "localhost".to_string());
            let port: u16 = env::var("OLLAMA_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(11434);

            info!("Connecting to Ollama at {}:{}", host, port);
            LLMClient::Ollama(Ollama::new(host, port))
        }
    };

    let model = env::var("LLM_MODEL").unwrap_or_else(|_| "mistral".to_string());
    let temperature: f32 = env::var("LLM_TEMPERATURE")
        .ok()
        .and_then(|t| t.parse().ok())
        .unwrap_or(DEFAULT_TEMPERATURE);

    let llm_params = LLMParams {
        llm_client,
        model,
        temperature,
        top_p: DEFAULT_TOP_P,
        top_k: DEFAULT_TOP_K,
        max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
    };

    let api_base =
        env::var("GNEWS_API_BASE").unwrap_or_else(|_| "https://gnews.io/api/v4/".to_string());
    let api_token = env::var("GNEWS_API_TOKEN")
        .map_err(|_| anyhow!("GNEWS_API_TOKEN environment variable required"))?;
    let news = GNewsClient::new(&api_base, api_token)?;

    let pipeline = RewritePipeline::new(news, llm_params);
    web::serve(pipeline).await
}
