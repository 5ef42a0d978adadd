use tracing::{info, warn};

use crate::errors::{PipelineError, RewriteError};
use crate::llm::TextGenerator;
use crate::models::{RawArticle, RewriteRequest, RewrittenArticle};
use crate::news::NewsSource;
use crate::planner::acquire_articles;
use crate::prompts::{clean_generated_text, rewrite_prompt};
use crate::TARGET_LLM_REQUEST;

/// Sequences acquisition and per-article rewrites. Collaborators are
/// injected so tests can substitute fakes for both.
pub struct RewritePipeline<N, G> {
    news: N,
    generator: G,
}

impl<N: NewsSource, G: TextGenerator> RewritePipeline<N, G> {
    pub fn new(news: N, generator: G) -> Self {
        Self { news, generator }
    }

    /// Runs the full planner -> rewrite loop for one request. One bad
    /// article never aborts the batch; only an empty acquisition or a batch
    /// with zero surviving rewrites fails the request.
    pub async fn process(
        &self,
        request: &RewriteRequest,
    ) -> Result<Vec<RewrittenArticle>, PipelineError> {
        let query = request.effective_query();
        let articles = acquire_articles(&self.news, query).await;
        if articles.is_empty() {
            return Err(PipelineError::NoArticlesFound);
        }

        let attempted = articles.len();
        info!(
            "Rewriting {} articles around \"{}\"",
            attempted, request.person_of_interest
        );

        let mut rewritten = Vec::with_capacity(attempted);
        for (index, article) in articles.into_iter().enumerate() {
            if article.title.trim().is_empty() || article.description.trim().is_empty() {
                warn!(
                    "Skipping article {}/{} ({}): missing title or description",
                    index + 1,
                    attempted,
                    article.url
                );
                continue;
            }

            match self
                .rewrite_article(article, &request.person_of_interest)
                .await
            {
                Ok(article) => rewritten.push(article),
                Err(err) => {
                    warn!(target: TARGET_LLM_REQUEST, "Rewrite of article {}/{} failed: {}", index + 1, attempted, err);
                }
            }
        }

        if rewritten.is_empty() {
            return Err(PipelineError::AllRewritesFailed { attempted });
        }
        Ok(rewritten)
    }

    async fn rewrite_article(
        &self,
        article: RawArticle,
        person_of_interest: &str,
    ) -> Result<RewrittenArticle, RewriteError> {
        let prompt = rewrite_prompt(&article.title, &article.description, person_of_interest);
        let raw = self.generator.generate(&prompt).await?;

        let modified_content = clean_generated_text(&raw);
        if modified_content.is_empty() {
            return Err(RewriteError::GenerationFailed(
                "rewritten body was empty after cleanup".to_string(),
            ));
        }

        Ok(RewrittenArticle {
            original_title: article.title.clone(),
            modified_title: article.title,
            original_content: article.description,
            modified_content,
            source: article.source,
            url: article.url,
            published_at: article.published_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{NewsError, RewriteError};
    use crate::models::RawArticle;
    use async_trait::async_trait;

    struct FixedSource {
        articles: Vec<RawArticle>,
    }

    #[async_trait]
    impl NewsSource for FixedSource {
        async fn search(&self, _keyword: &str) -> Result<Vec<RawArticle>, NewsError> {
            Ok(self.articles.clone())
        }

        async fn top_news(&self) -> Result<Vec<RawArticle>, NewsError> {
            Ok(Vec::new())
        }
    }

    enum FakeGenerator {
        EchoMarker,
        Unavailable,
        Failed,
    }

    #[async_trait]
    impl TextGenerator for FakeGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, RewriteError> {
            match self {
                FakeGenerator::EchoMarker => Ok(format!(
                    "Modified Version: promoted copy ({} prompt chars)",
                    prompt.len()
                )),
                FakeGenerator::Unavailable => Err(RewriteError::GenerationUnavailable(
                    "connection refused".to_string(),
                )),
                FakeGenerator::Failed => {
                    Err(RewriteError::GenerationFailed("status 500".to_string()))
                }
            }
        }
    }

    fn article(title: &str, description: &str) -> RawArticle {
        RawArticle {
            title: title.to_string(),
            description: description.to_string(),
            source: "Example Wire".to_string(),
            url: format!("https://example.com/{}", title.to_lowercase()),
            published_at: "2025-07-01T12:00:00Z".to_string(),
        }
    }

    fn request() -> RewriteRequest {
        RewriteRequest {
            person_of_interest: "Ada Lovelace".to_string(),
            query: Some("ClimateChange".to_string()),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn happy_path_preserves_order_and_titles() {
        let source = FixedSource {
            articles: vec![
                article("First", "one"),
                article("Second", "two"),
                article("Third", "three"),
            ],
        };
        let pipeline = RewritePipeline::new(source, FakeGenerator::EchoMarker);

        let result = pipeline.process(&request()).await.unwrap();

        assert_eq!(result.len(), 3);
        let titles: Vec<&str> = result.iter().map(|a| a.original_title.as_str()).collect();
        assert_eq!(titles, vec!["First", "Second", "Third"]);
        for rewritten in &result {
            assert_eq!(rewritten.modified_title, rewritten.original_title);
            assert!(rewritten.modified_content.starts_with("promoted copy"));
            assert_eq!(rewritten.source, "Example Wire");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn articles_missing_title_or_description_are_skipped() {
        let source = FixedSource {
            articles: vec![
                article("", "has description"),
                article("Has title", ""),
                article("Kept", "whole"),
            ],
        };
        let pipeline = RewritePipeline::new(source, FakeGenerator::EchoMarker);

        let result = pipeline.process(&request()).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].original_title, "Kept");
    }

    #[tokio::test(start_paused = true)]
    async fn empty_acquisition_is_no_articles_found() {
        let source = FixedSource {
            articles: Vec::new(),
        };
        let pipeline = RewritePipeline::new(source, FakeGenerator::EchoMarker);

        let err = pipeline.process(&request()).await.unwrap_err();

        assert!(matches!(err, PipelineError::NoArticlesFound));
    }

    #[tokio::test(start_paused = true)]
    async fn unreachable_generator_fails_the_whole_batch() {
        let source = FixedSource {
            articles: vec![article("First", "one"), article("Second", "two")],
        };
        let pipeline = RewritePipeline::new(source, FakeGenerator::Unavailable);

        let err = pipeline.process(&request()).await.unwrap_err();

        match err {
            PipelineError::AllRewritesFailed { attempted } => assert_eq!(attempted, 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn generation_errors_never_produce_partial_failures() {
        let source = FixedSource {
            articles: vec![article("Only", "one")],
        };
        let pipeline = RewritePipeline::new(source, FakeGenerator::Failed);

        let err = pipeline.process(&request()).await.unwrap_err();

        assert!(matches!(
            err,
            PipelineError::AllRewritesFailed { attempted: 1 }
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn skipped_only_batches_count_as_all_failed() {
        let source = FixedSource {
            articles: vec![article("", ""), article("", "")],
        };
        let pipeline = RewritePipeline::new(source, FakeGenerator::EchoMarker);

        let err = pipeline.process(&request()).await.unwrap_err();

        assert!(matches!(
            err,
            PipelineError::AllRewritesFailed { attempted: 2 }
        ));
    }
}
