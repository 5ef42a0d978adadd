use tokio::time::{sleep, Duration};
use tracing::{debug, info, warn};

use crate::models::RawArticle;
use crate::news::NewsSource;
use crate::TARGET_NEWS_REQUEST;

/// Minimum spacing between consecutive calls to the news lookup, across and
/// within fallback tiers. The upstream service is rate limited.
pub const PACING_DELAY: Duration = Duration::from_secs(1);

// Words this short ("a", "the", "in") are useless as standalone queries.
const MIN_FALLBACK_WORD_CHARS: usize = 3;
const FALLBACK_QUERY: &str = "latest";

/// Cascading article acquisition: exact query, then each sufficiently long
/// word of the query, then top headlines, then a fixed generic query if the
/// headlines call itself errored. Returns the first non-empty tier's result,
/// or an empty list once every tier is exhausted.
pub async fn acquire_articles<N: NewsSource>(news: &N, query: &str) -> Vec<RawArticle> {
    match news.search(query).await {
        Ok(articles) if !articles.is_empty() => {
            info!(target: TARGET_NEWS_REQUEST, "Found {} articles for query \"{}\"", articles.len(), query);
            return articles;
        }
        Ok(_) => {
            debug!(target: TARGET_NEWS_REQUEST, "No articles for exact query \"{}\"", query);
        }
        Err(err) => {
            warn!(target: TARGET_NEWS_REQUEST, "Search for \"{}\" failed: {}", query, err);
        }
    }

    for word in query
        .split_whitespace()
        .filter(|word| word.chars().count() > MIN_FALLBACK_WORD_CHARS)
    {
        sleep(PACING_DELAY).await;
        match news.search(word).await {
            Ok(articles) if !articles.is_empty() => {
                info!(target: TARGET_NEWS_REQUEST, "Found {} articles for fallback word \"{}\"", articles.len(), word);
                return articles;
            }
            Ok(_) => {
                debug!(target: TARGET_NEWS_REQUEST, "No articles for fallback word \"{}\"", word);
            }
            Err(err) => {
                warn!(target: TARGET_NEWS_REQUEST, "Search for fallback word \"{}\" failed: {}", word, err);
            }
        }
    }

    sleep(PACING_DELAY).await;
    match news.top_news().await {
        Ok(articles) => {
            if articles.is_empty() {
                debug!(target: TARGET_NEWS_REQUEST, "Top headlines came back empty");
            } else {
                info!(target: TARGET_NEWS_REQUEST, "Falling back to {} top headlines", articles.len());
            }
            articles
        }
        Err(err) => {
            warn!(target: TARGET_NEWS_REQUEST, "Top headlines failed: {}, retrying with \"{}\"", err, FALLBACK_QUERY);
            sleep(PACING_DELAY).await;
            match news.search(FALLBACK_QUERY).await {
                Ok(articles) => articles,
                Err(err) => {
                    warn!(target: TARGET_NEWS_REQUEST, "Search for \"{}\" failed: {}", FALLBACK_QUERY, err);
                    Vec::new()
                }
            }
        }
    }
}
