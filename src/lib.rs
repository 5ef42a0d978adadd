pub mod errors;
pub mod llm;
pub mod logging;
pub mod models;
pub mod news;
pub mod pipeline;
pub mod planner;
pub mod prompts;
pub mod web;

use async_openai::{config::OpenAIConfig, Client as OpenAIClient};
use ollama_rs::Ollama;

pub const TARGET_WEB_REQUEST: &str = "web_request";
pub const TARGET_NEWS_REQUEST: &str = "news_request";
pub const TARGET_LLM_REQUEST: &str = "llm_request";

#[derive(Clone, Debug)]
pub enum LLMClient {
    Ollama(Ollama),
    OpenAI(OpenAIClient<OpenAIConfig>),
}

/// A generation backend plus the sampling parameters every rewrite call is
/// issued with. Sampling values are a configuration surface; defaults live
/// in `llm`.
#[derive(Clone)]
pub struct LLMParams {
    pub llm_client: LLMClient,
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}
