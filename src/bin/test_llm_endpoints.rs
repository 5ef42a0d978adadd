use clap::Parser;
use limelight::llm::{
    generate_rewrite, DEFAULT_MAX_OUTPUT_TOKENS, DEFAULT_TOP_K, DEFAULT_TOP_P,
};
use limelight::{LLMClient, LLMParams};
use ollama_rs::Ollama;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

const CONNECTION_TIMEOUT_SECS: u64 = 10;

/// Check that the configured Ollama endpoint is reachable and, optionally,
/// that a model on it answers a trivial prompt.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Host for the Ollama server
    #[arg(short = 'H', long, default_value = "localhost")]
    host: String,

    /// Port for the Ollama server
    #[arg(short = 'p', long, default_value = "11434")]
    port: u16,

    /// Model to probe with a one-line prompt (connectivity check only when absent)
    #[arg(short = 'm', long)]
    model: Option<String>,

    /// Temperature for the probe generation
    #[arg(short = 'T', long, default_value = "0.7")]
    temperature: f32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("Testing Ollama endpoint at {}:{}", args.host, args.port);
    let ollama = Ollama::new(args.host.clone(), args.port);

    match timeout(
        Duration::from_secs(CONNECTION_TIMEOUT_SECS),
        ollama.list_local_models(),
    )
    .await
    {
        Ok(Ok(models)) => {
            let names: Vec<String> = models.iter().map(|m| m.name.clone()).collect();
            info!("Endpoint is up with {} models: {}", names.len(), names.join(", "));
        }
        Ok(Err(e)) => {
            info!("Endpoint answered with an API error: {}", e);
            return Ok(());
        }
        Err(_) => {
            info!("Connection timed out");
            return Ok(());
        }
    }

    if let Some(model) = args.model {
        info!("Probing model {} with a short prompt", model);
        let params = LLMParams {
            llm_client: LLMClient::Ollama(ollama),
            model,
            temperature: args.temperature,
            top_p: DEFAULT_TOP_P,
            top_k: DEFAULT_TOP_K,
            max_output_tokens: DEFAULT_MAX_OUTPUT_TOKENS,
        };

        match generate_rewrite("Reply with the single word: ready", &params).await {
            Ok(text) => info!("Model responded: {}", text.trim()),
            Err(e) => info!("Probe failed: {}", e),
        }
    }

    Ok(())
}
