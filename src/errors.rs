use thiserror::Error;

/// Failures talking to the news lookup service. These are transient from the
/// pipeline's point of view: the planner swallows them inside tiers 1-2 and
/// only reacts to them at the top-news tier.
#[derive(Error, Debug)]
pub enum NewsError {
    #[error("news request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("news request timed out")]
    Timeout,

    #[error("news endpoint returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("invalid news endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
}

/// Per-article rewrite failures. `GenerationUnavailable` means the backend
/// could not be reached at all (connection failure or timeout);
/// `GenerationFailed` means it answered with an error or unusable output.
#[derive(Error, Debug)]
pub enum RewriteError {
    #[error("generation backend unreachable: {0}")]
    GenerationUnavailable(String),

    #[error("generation backend failed: {0}")]
    GenerationFailed(String),
}

/// Whole-pipeline failures surfaced to the HTTP layer. Everything else is
/// recovered inside the per-article loop.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("no articles found")]
    NoArticlesFound,

    #[error("failed to rewrite any of the {attempted} fetched articles")]
    AllRewritesFailed { attempted: usize },
}
