use serde::{Deserialize, Serialize};

/// Inbound request: who to promote, and optionally what to search for.
#[derive(Debug, Clone, Deserialize)]
pub struct RewriteRequest {
    pub person_of_interest: String,
    #[serde(default)]
    pub query: Option<String>,
}

impl RewriteRequest {
    /// The query handed to the news lookup. Falls back to the person of
    /// interest, so it is never empty for a valid request.
    pub fn effective_query(&self) -> &str {
        match self.query.as_deref() {
            Some(query) if !query.trim().is_empty() => query,
            _ => &self.person_of_interest,
        }
    }
}

/// An article as returned by the news lookup. Any field may be empty; title
/// and description are only required once an article reaches the rewriter.
#[derive(Debug, Clone, Default)]
pub struct RawArticle {
    pub title: String,
    pub description: String,
    pub source: String,
    pub url: String,
    pub published_at: String,
}

/// One successfully rewritten article. The title is never rewritten, so
/// `modified_title` always equals `original_title`.
#[derive(Debug, Clone, Serialize)]
pub struct RewrittenArticle {
    pub original_title: String,
    pub modified_title: String,
    pub original_content: String,
    pub modified_content: String,
    pub source: String,
    pub url: String,
    pub published_at: String,
}
