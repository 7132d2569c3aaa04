use std::collections::HashSet;
use std::sync::Arc;

use ft_core::{DiscoveredBlog, PipelineConfig, SearchResult, Vocabulary};
use tracing::{debug, info, warn};

use crate::gate::HostGate;
use crate::search::SearchProvider;

/// Finds candidate fashion blogs for a topic by fanning a fixed set of
/// queries out to a search provider.
pub struct BlogDiscoverer {
    provider: Arc<dyn SearchProvider>,
    vocabulary: Arc<Vocabulary>,
    gate: HostGate,
    max_blogs: usize,
    results_per_query: usize,
}

impl BlogDiscoverer {
    pub fn new(
        provider: Arc<dyn SearchProvider>,
        vocabulary: Arc<Vocabulary>,
        config: &PipelineConfig,
    ) -> Self {
        Self {
            provider,
            vocabulary,
            gate: HostGate::new(config.query_interval),
            max_blogs: config.max_blogs,
            results_per_query: config.results_per_query,
        }
    }

    /// Runs every query in template order and keeps the first accepted
    /// result per domain. A failing query is logged and skipped.
    pub async fn discover(&self, topic: &str) -> Vec<DiscoveredBlog> {
        info!("🔎 Discovering fashion blogs for: {}", topic);

        let mut seen = HashSet::new();
        let mut blogs = Vec::new();

        for query in self.vocabulary.queries_for(topic) {
            if blogs.len() >= self.max_blogs {
                break;
            }

            self.gate.wait(self.provider.name()).await;
            let results = match self.provider.search(&query, self.results_per_query).await {
                Ok(results) => results,
                Err(e) => {
                    warn!("⚠️ Search error for query '{}': {}", query, e);
                    continue;
                }
            };

            for result in results {
                if !is_fashion_blog(&result, &self.vocabulary) {
                    debug!("Skipping non-blog result: {}", result.url);
                    continue;
                }
                let blog = match DiscoveredBlog::from_result(result) {
                    Ok(blog) => blog,
                    Err(e) => {
                        warn!("⚠️ Skipping result with bad URL: {}", e);
                        continue;
                    }
                };
                if seen.insert(blog.domain.clone()) {
                    blogs.push(blog);
                }
            }
        }

        blogs.truncate(self.max_blogs);
        info!("✨ Discovered {} unique fashion blogs", blogs.len());
        blogs
    }
}

/// Number of vocabulary terms found in `haystack`.
fn term_score(haystack: &str, terms: &[String]) -> usize {
    terms
        .iter()
        .filter(|term| haystack.contains(term.to_lowercase().as_str()))
        .count()
}

/// A result is a fashion blog when it has enough fashion vocabulary, at
/// least one blog indicator, and its URL is not a shopping site.
pub fn is_fashion_blog(result: &SearchResult, vocabulary: &Vocabulary) -> bool {
    let url = result.url.to_lowercase();
    if vocabulary
        .excluded_domains
        .iter()
        .any(|excluded| url.contains(excluded.to_lowercase().as_str()))
    {
        return false;
    }

    let content = format!(
        "{} {} {}",
        result.title.to_lowercase(),
        result.snippet.to_lowercase(),
        url
    );
    term_score(&content, &vocabulary.fashion_keywords) >= vocabulary.min_fashion_score
        && term_score(&content, &vocabulary.blog_indicators) >= vocabulary.min_blog_score
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ft_core::{Error, Result};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::time::Instant;

    fn result(title: &str, url: &str, snippet: &str) -> SearchResult {
        SearchResult {
            title: title.to_string(),
            url: url.to_string(),
            snippet: snippet.to_string(),
        }
    }

    fn blog_result(url: &str) -> SearchResult {
        result("Saree styling guide", url, "Fashion blog with outfit tips")
    }

    /// Returns the same results for every query; fails on the listed calls.
    struct ScriptedSearch {
        results: Vec<SearchResult>,
        fail_on: Vec<usize>,
        calls: AtomicUsize,
    }

    impl ScriptedSearch {
        fn new(results: Vec<SearchResult>) -> Self {
            Self {
                results,
                fail_on: Vec::new(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SearchProvider for ScriptedSearch {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn search(&self, _query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_on.contains(&call) {
                return Err(Error::Search("provider unavailable".to_string()));
            }
            Ok(self.results.iter().take(max_results).cloned().collect())
        }
    }

    /// Hands out a fresh batch of results per call.
    struct PagedSearch {
        pages: Vec<Vec<SearchResult>>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SearchProvider for PagedSearch {
        fn name(&self) -> &str {
            "paged"
        }

        async fn search(&self, _query: &str, _max_results: usize) -> Result<Vec<SearchResult>> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.pages.get(call).cloned().unwrap_or_default())
        }
    }

    fn discoverer(provider: Arc<dyn SearchProvider>) -> BlogDiscoverer {
        BlogDiscoverer::new(
            provider,
            Arc::new(Vocabulary::default()),
            &PipelineConfig::immediate(),
        )
    }

    #[test]
    fn test_is_fashion_blog() {
        let vocabulary = Vocabulary::default();
        assert!(is_fashion_blog(
            &result("10 Saree Outfit Ideas", "https://drape.example/saree", "Latest fashion looks"),
            &vocabulary
        ));
        // Fashion terms without any blog indicator.
        assert!(!is_fashion_blog(
            &result("Saree fashion", "https://drape.example/saree", "Designer styles"),
            &vocabulary
        ));
        // Blog indicator with a single fashion term.
        assert!(!is_fashion_blog(
            &result("Travel blog", "https://trips.example/goa", "Beach outfit"),
            &vocabulary
        ));
        // Shopping URLs are excluded outright.
        assert!(!is_fashion_blog(
            &result("Saree style guide", "https://www.amazon.in/saree", "Fashion tips"),
            &vocabulary
        ));
        assert!(!is_fashion_blog(
            &result("Saree style guide", "https://sareeshop.example/blog", "Fashion tips"),
            &vocabulary
        ));
    }

    #[test]
    fn test_classification_uses_url_terms() {
        let vocabulary = Vocabulary::default();
        assert!(is_fashion_blog(
            &result("Summer looks", "https://vogue.example/fashion/blog/summer", ""),
            &vocabulary
        ));
    }

    #[tokio::test]
    async fn test_dedup_by_domain_keeps_first() {
        let provider = Arc::new(ScriptedSearch::new(vec![
            blog_result("https://a.com/p1"),
            blog_result("https://a.com/p2"),
            blog_result("https://b.com/p1"),
        ]));
        let blogs = discoverer(provider.clone()).discover("saree").await;

        assert_eq!(blogs.len(), 2);
        assert_eq!(blogs[0].url, "https://a.com/p1");
        assert_eq!(blogs[0].domain, "a.com");
        assert_eq!(blogs[1].domain, "b.com");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_first_seen_across_queries() {
        let provider = Arc::new(PagedSearch {
            pages: vec![
                vec![blog_result("https://b.com/first")],
                vec![blog_result("https://a.com/x"), blog_result("https://b.com/second")],
                vec![blog_result("https://c.com/y")],
            ],
            calls: AtomicUsize::new(0),
        });
        let blogs = discoverer(provider).discover("saree").await;
        let urls: Vec<&str> = blogs.iter().map(|b| b.url.as_str()).collect();
        assert_eq!(urls, vec!["https://b.com/first", "https://a.com/x", "https://c.com/y"]);
    }

    #[tokio::test]
    async fn test_failing_query_is_skipped() {
        let mut provider = ScriptedSearch::new(vec![blog_result("https://a.com/p1")]);
        provider.fail_on = vec![0, 1, 2];
        let provider = Arc::new(provider);

        let blogs = discoverer(provider.clone()).discover("saree").await;
        assert_eq!(blogs.len(), 1);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_queries_are_spaced_by_interval() {
        let provider = Arc::new(ScriptedSearch::new(vec![blog_result("https://a.com/p1")]));
        let config = PipelineConfig {
            query_interval: Duration::from_millis(30),
            ..PipelineConfig::immediate()
        };
        let discoverer = BlogDiscoverer::new(
            provider.clone(),
            Arc::new(Vocabulary::default()),
            &config,
        );

        let start = Instant::now();
        discoverer.discover("saree").await;
        assert_eq!(provider.calls.load(Ordering::SeqCst), 5);
        assert!(start.elapsed() >= Duration::from_millis(120));
    }

    #[tokio::test]
    async fn test_all_queries_failing_yields_nothing() {
        let mut provider = ScriptedSearch::new(vec![blog_result("https://a.com/p1")]);
        provider.fail_on = (0..5).collect();
        let blogs = discoverer(Arc::new(provider)).discover("saree").await;
        assert!(blogs.is_empty());
    }

    #[tokio::test]
    async fn test_capped_at_max_blogs() {
        let pages = (0..5)
            .map(|q| {
                (0..10)
                    .map(|i| blog_result(&format!("https://blog{}-{}.example/post", q, i)))
                    .collect()
            })
            .collect();
        let provider = Arc::new(PagedSearch {
            pages,
            calls: AtomicUsize::new(0),
        });
        let blogs = discoverer(provider.clone()).discover("saree").await;

        assert_eq!(blogs.len(), 15);
        assert_eq!(blogs[0].url, "https://blog0-0.example/post");
        assert_eq!(blogs[14].url, "https://blog1-4.example/post");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_bad_urls_are_skipped() {
        let provider = Arc::new(ScriptedSearch::new(vec![
            blog_result("not a url fashion blog"),
            blog_result("https://a.com/p1"),
        ]));
        let blogs = discoverer(provider).discover("saree").await;
        assert_eq!(blogs.len(), 1);
    }
}
