use axum::extract::State;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use serde_json::json;
use std::env;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::errors::PipelineError;
use crate::llm::TextGenerator;
use crate::models::{RewriteRequest, RewrittenArticle};
use crate::news::NewsSource;
use crate::pipeline::RewritePipeline;
use crate::TARGET_WEB_REQUEST;

#[derive(Serialize)]
struct ArticlesResponse {
    articles: Vec<RewrittenArticle>,
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let status = match self {
            PipelineError::NoArticlesFound => StatusCode::NOT_FOUND,
            PipelineError::AllRewritesFailed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

pub fn router<N, G>(pipeline: Arc<RewritePipeline<N, G>>) -> Router
where
    N: NewsSource + 'static,
    G: TextGenerator + 'static,
{
    Router::new()
        .route("/", get(welcome))
        .route("/api/articles", post(rewrite_articles::<N, G>))
        .layer(cors_layer())
        .with_state(pipeline)
}

pub async fn serve<N, G>(pipeline: RewritePipeline<N, G>) -> anyhow::Result<()>
where
    N: NewsSource + 'static,
    G: TextGenerator + 'static,
{
    let app = router(Arc::new(pipeline));

    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8001);
    let addr = format!("0.0.0.0:{}", port);

    let listener = TcpListener::bind(&addr).await?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

async fn welcome() -> Json<serde_json::Value> {
    Json(json!({ "message": "Welcome to the Limelight article rewriter" }))
}

async fn rewrite_articles<N, G>(
    State(pipeline): State<Arc<RewritePipeline<N, G>>>,
    Json(request): Json<RewriteRequest>,
) -> Response
where
    N: NewsSource + 'static,
    G: TextGenerator + 'static,
{
    if request.person_of_interest.trim().is_empty() {
        warn!(target: TARGET_WEB_REQUEST, "Rejecting request with empty person_of_interest");
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "detail": "person_of_interest must not be empty" })),
        )
            .into_response();
    }

    info!(target: TARGET_WEB_REQUEST, "Rewrite request for \"{}\" (query: {:?})", request.person_of_interest, request.query);

    match pipeline.process(&request).await {
        Ok(articles) => {
            info!(target: TARGET_WEB_REQUEST, "Returning {} rewritten articles", articles.len());
            Json(ArticlesResponse { articles }).into_response()
        }
        Err(err) => {
            warn!(target: TARGET_WEB_REQUEST, "Pipeline failed: {}", err);
            err.into_response()
        }
    }
}

/// Restricts CORS to the origins in ALLOWED_ORIGINS (semicolon-delimited)
/// when set, and stays permissive otherwise.
fn cors_layer() -> CorsLayer {
    let origins: Vec<HeaderValue> = env::var("ALLOWED_ORIGINS")
        .unwrap_or_default()
        .split(';')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}
