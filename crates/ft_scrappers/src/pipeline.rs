use std::sync::Arc;
use std::time::Duration;

use ft_analysis::EntityExtractor;
use ft_core::{
    validate_topic, AnalyzedDocument, DiscoveredBlog, EmptyReason, HttpConfig, Outcome,
    PipelineConfig, Result, Vocabulary,
};
use futures::stream::{FuturesUnordered, StreamExt};
use reqwest::Client;
use tokio::sync::Semaphore;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::discovery::BlogDiscoverer;
use crate::fetcher::ContentFetcher;
use crate::gate::HostGate;
use crate::logging::Logger;
use crate::search::SearchProvider;

/// Discovery, then fetch and extraction per candidate, keeping only
/// documents that mention the topic.
pub struct AnalysisPipeline {
    discoverer: BlogDiscoverer,
    fetcher: ContentFetcher,
    extractor: EntityExtractor,
    gate: HostGate,
    semaphore: Semaphore,
    deadline: Option<Duration>,
}

impl AnalysisPipeline {
    pub fn new(
        discoverer: BlogDiscoverer,
        fetcher: ContentFetcher,
        extractor: EntityExtractor,
        config: &PipelineConfig,
    ) -> Self {
        Self {
            discoverer,
            fetcher,
            extractor,
            gate: HostGate::new(config.fetch_interval),
            semaphore: Semaphore::new(config.concurrency.max(1)),
            deadline: config.deadline,
        }
    }

    /// Wires the HTTP fetcher and the extractor around `provider`. `client`
    /// is the same one the provider was built with.
    pub fn from_config(
        provider: Arc<dyn SearchProvider>,
        vocabulary: Vocabulary,
        client: Client,
        http: &HttpConfig,
        config: &PipelineConfig,
    ) -> Result<Self> {
        vocabulary.validate()?;
        let extractor = EntityExtractor::new(&vocabulary)?;
        let discoverer = BlogDiscoverer::new(provider, Arc::new(vocabulary), config);
        let fetcher = ContentFetcher::http(client, http);
        Ok(Self::new(discoverer, fetcher, extractor, config))
    }

    /// Runs the whole pipeline for `topic`. An empty topic is the only
    /// error; "nothing found" comes back as [`Outcome::Empty`]. The deadline
    /// covers discovery and fetching together.
    pub async fn discover_and_analyze(&self, topic: &str) -> Result<Outcome> {
        let topic = validate_topic(topic)?;
        info!("🚀 Starting automated analysis for: {}", topic);
        let deadline = self.deadline.map(|d| Instant::now() + d);

        let discovery = self.discoverer.discover(topic);
        let blogs = match deadline {
            Some(at) => match tokio::time::timeout_at(at, discovery).await {
                Ok(blogs) => blogs,
                Err(_) => {
                    warn!("⏰ Pipeline deadline reached during discovery");
                    return Ok(Outcome::Empty(EmptyReason::DeadlineExceeded));
                }
            },
            None => discovery.await,
        };
        if blogs.is_empty() {
            info!("No fashion blogs discovered");
            return Ok(Outcome::Empty(EmptyReason::NoBlogsDiscovered));
        }

        let (documents, timed_out) = self.analyze_until(topic, blogs, deadline).await;
        info!("✅ Successfully analyzed {} blogs", documents.len());

        Ok(match (documents.is_empty(), timed_out) {
            (false, _) => Outcome::Documents(documents),
            (true, true) => Outcome::Empty(EmptyReason::DeadlineExceeded),
            (true, false) => Outcome::Empty(EmptyReason::NoRelevantDocuments),
        })
    }

    /// Fetches and analyzes every blog with bounded concurrency, giving the
    /// whole deadline to the fan-out. Results keep the order of `blogs`;
    /// the flag reports a hit deadline.
    pub async fn analyze_blogs(
        &self,
        topic: &str,
        blogs: Vec<DiscoveredBlog>,
    ) -> (Vec<AnalyzedDocument>, bool) {
        let deadline = self.deadline.map(|d| Instant::now() + d);
        self.analyze_until(topic, blogs, deadline).await
    }

    async fn analyze_until(
        &self,
        topic: &str,
        blogs: Vec<DiscoveredBlog>,
        deadline: Option<Instant>,
    ) -> (Vec<AnalyzedDocument>, bool) {
        let total = blogs.len();
        let mut slots: Vec<Option<AnalyzedDocument>> = vec![None; total];

        let mut pending: FuturesUnordered<_> = blogs
            .into_iter()
            .enumerate()
            .map(|(i, blog)| async move {
                let logger = Logger::new().with_prefix(format!("[{}/{}]", i + 1, total));
                (i, self.analyze_blog(&logger, blog, topic).await)
            })
            .collect();

        let collect = async {
            while let Some((i, analyzed)) = pending.next().await {
                slots[i] = analyzed;
            }
        };

        let timed_out = match deadline {
            Some(at) => tokio::time::timeout_at(at, collect).await.is_err(),
            None => {
                collect.await;
                false
            }
        };
        if timed_out {
            warn!(
                "⏰ Pipeline deadline reached; dropping {} unfinished fetches",
                pending.len()
            );
        }

        (slots.into_iter().flatten().collect(), timed_out)
    }

    async fn analyze_blog(
        &self,
        logger: &Logger,
        blog: DiscoveredBlog,
        topic: &str,
    ) -> Option<AnalyzedDocument> {
        // Wait on the host before taking a fetch slot.
        self.gate.wait(&blog.domain).await;
        let _permit = self.semaphore.acquire().await.ok()?;

        logger.info(&format!("📰 Extracting content from: {}", blog.title));
        let document = self.fetcher.fetch(&blog, topic).await?;

        let analysis = self.extractor.analyze(&document.raw_text, topic);
        if analysis.relevance <= 0.0 {
            logger.debug(&format!("Dropping {}: no mention of '{}'", blog.url, topic));
            return None;
        }

        logger.info(&format!(
            "✨ {} chars, relevance {:.2}%",
            document.content_length, analysis.relevance
        ));
        Some(AnalyzedDocument { document, analysis })
    }
}
