use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use reqwest::Client;
use serde::Deserialize;
use tokio::time::{timeout, Duration};
use tracing::{debug, warn};
use url::Url;

use crate::errors::NewsError;
use crate::models::RawArticle;
use crate::TARGET_NEWS_REQUEST;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_LANGUAGE: &str = "en";
const DEFAULT_COUNTRY: &str = "us";
const DEFAULT_MAX_RESULTS: usize = 5;
// Only articles published within this window are considered news.
const SEARCH_WINDOW_DAYS: i64 = 7;

/// Search-by-keyword news lookup. Implemented by the GNews REST adapter and
/// by fakes in tests.
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn search(&self, keyword: &str) -> Result<Vec<RawArticle>, NewsError>;
    async fn top_news(&self) -> Result<Vec<RawArticle>, NewsError>;
}

/// Adapter for the GNews JSON API.
pub struct GNewsClient {
    client: Client,
    base_url: Url,
    api_token: String,
    language: String,
    country: String,
    max_results: usize,
}

impl GNewsClient {
    pub fn new(base_url: &str, api_token: String) -> Result<Self, NewsError> {
        // Url::join drops the last path segment without a trailing slash.
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        };

        Ok(Self {
            client: Client::builder().timeout(REQUEST_TIMEOUT).build()?,
            base_url: Url::parse(&normalized)?,
            api_token,
            language: DEFAULT_LANGUAGE.to_string(),
            country: DEFAULT_COUNTRY.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, NewsError> {
        let mut url = self.base_url.join(path)?;
        url.query_pairs_mut()
            .append_pair("lang", &self.language)
            .append_pair("country", &self.country)
            .append_pair("max", &self.max_results.to_string())
            .append_pair("apikey", &self.api_token);
        Ok(url)
    }

    async fn fetch(&self, url: Url) -> Result<Vec<RawArticle>, NewsError> {
        debug!(target: TARGET_NEWS_REQUEST, "Requesting {}", url.path());

        let response = match timeout(REQUEST_TIMEOUT, self.client.get(url).send()).await {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => return Err(NewsError::Request(err)),
            Err(_) => return Err(NewsError::Timeout),
        };

        if !response.status().is_success() {
            warn!(target: TARGET_NEWS_REQUEST, "News endpoint returned status {}", response.status());
            return Err(NewsError::Status(response.status()));
        }

        let body: ArticlesResponse = response.json().await?;
        debug!(target: TARGET_NEWS_REQUEST, "Received {} articles", body.articles.len());
        Ok(body.articles.into_iter().map(RawArticle::from).collect())
    }
}

#[async_trait]
impl NewsSource for GNewsClient {
    async fn search(&self, keyword: &str) -> Result<Vec<RawArticle>, NewsError> {
        let mut url = self.endpoint("search")?;
        let from = (Utc::now() - ChronoDuration::days(SEARCH_WINDOW_DAYS))
            .format("%Y-%m-%dT%H:%M:%SZ")
            .to_string();
        url.query_pairs_mut()
            .append_pair("q", keyword)
            .append_pair("from", &from);
        self.fetch(url).await
    }

    async fn top_news(&self) -> Result<Vec<RawArticle>, NewsError> {
        let mut url = self.endpoint("top-headlines")?;
        url.query_pairs_mut().append_pair("category", "general");
        self.fetch(url).await
    }
}

#[derive(Debug, Deserialize)]
struct ArticlesResponse {
    #[serde(default)]
    articles: Vec<WireArticle>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireArticle {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    published_at: String,
    #[serde(default)]
    source: WireSource,
}

#[derive(Debug, Default, Deserialize)]
struct WireSource {
    #[serde(default)]
    name: String,
}

impl From<WireArticle> for RawArticle {
    fn from(article: WireArticle) -> Self {
        RawArticle {
            title: article.title,
            description: article.description,
            source: article.source.name,
            url: article.url,
            published_at: article.published_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client(server: &MockServer) -> GNewsClient {
        GNewsClient::new(&server.url("/"), "test-token".to_string()).unwrap()
    }

    #[tokio::test]
    async fn search_maps_wire_articles() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/search")
                .query_param("q", "rust")
                .query_param("apikey", "test-token");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "totalArticles": 1,
                    "articles": [{
                        "title": "Rust ships a new release",
                        "description": "The release contains many fixes.",
                        "url": "https://example.com/rust",
                        "publishedAt": "2025-07-01T12:00:00Z",
                        "source": {"name": "Example Wire", "url": "https://example.com"}
                    }]
                }));
        });

        let articles = client(&server).search("rust").await.unwrap();

        mock.assert();
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].title, "Rust ships a new release");
        assert_eq!(articles[0].description, "The release contains many fixes.");
        assert_eq!(articles[0].source, "Example Wire");
        assert_eq!(articles[0].url, "https://example.com/rust");
        assert_eq!(articles[0].published_at, "2025-07-01T12:00:00Z");
    }

    #[tokio::test]
    async fn search_tolerates_missing_fields() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "totalArticles": 1,
                    "articles": [{"url": "https://example.com/bare"}]
                }));
        });

        let articles = client(&server).search("anything").await.unwrap();

        assert_eq!(articles.len(), 1);
        assert!(articles[0].title.is_empty());
        assert!(articles[0].description.is_empty());
        assert!(articles[0].source.is_empty());
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/search");
            then.status(403);
        });

        let err = client(&server).search("rust").await.unwrap_err();
        match err {
            NewsError::Status(status) => assert_eq!(status.as_u16(), 403),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn top_news_hits_the_headlines_endpoint() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/top-headlines")
                .query_param("category", "general");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"totalArticles": 0, "articles": []}));
        });

        let articles = client(&server).top_news().await.unwrap();

        mock.assert();
        assert!(articles.is_empty());
    }
}
