use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use ft_core::{DiscoveredBlog, Error, ExtractedDocument, HttpConfig, Result};
use reqwest::Client;
use scraper::{Html, Selector};
use tracing::{debug, warn};

/// Elements removed before any text is read.
const BOILERPLATE: &str = "script, style, nav, header, footer";

/// Tried in order; the first selector with a match is the content block.
const CONTENT_SELECTORS: &[&str] = &[
    "article",
    "main",
    ".content",
    ".post",
    ".entry-content",
    ".blog-post",
    ".article-content",
    "[role=\"main\"]",
];

const UNKNOWN_SOURCE: &str = "Unknown Blog";

#[async_trait]
pub trait PageSource: Send + Sync {
    /// Returns the raw HTML body for `url`.
    async fn get(&self, url: &str) -> Result<String>;
}

/// Plain HTTP GET with the shared client.
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: Client,
}

impl HttpPageSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn get(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Scraping(format!("{} returned {}", url, status)));
        }
        Ok(response.text().await?)
    }
}

/// Turns a discovered blog into a bounded, cleaned plain-text document.
pub struct ContentFetcher {
    source: Arc<dyn PageSource>,
    max_chars: usize,
}

impl ContentFetcher {
    pub fn new(source: Arc<dyn PageSource>, max_chars: usize) -> Self {
        Self { source, max_chars }
    }

    /// HTTP-backed fetcher built from the shared client.
    pub fn http(client: Client, config: &HttpConfig) -> Self {
        Self::new(Arc::new(HttpPageSource::new(client)), config.max_content_chars)
    }

    /// `None` means "skip this candidate": the failure is logged here.
    pub async fn fetch(&self, blog: &DiscoveredBlog, topic: &str) -> Option<ExtractedDocument> {
        debug!("📰 Extracting '{}' content from: {}", topic, blog.url);

        let html = match self.source.get(&blog.url).await {
            Ok(html) => html,
            Err(e) => {
                warn!("⚠️ Content extraction failed for {}: {}", blog.url, e);
                return None;
            }
        };

        let raw_text = extract_main_text(&html, self.max_chars);
        let source_title = if blog.title.trim().is_empty() {
            UNKNOWN_SOURCE.to_string()
        } else {
            blog.title.clone()
        };

        Some(ExtractedDocument {
            source_title,
            url: blog.url.clone(),
            content_length: raw_text.chars().count(),
            raw_text,
            fetched_at: Utc::now(),
        })
    }
}

/// Strips boilerplate, picks the main content block and returns its text
/// with whitespace collapsed, cut to `max_chars` characters.
pub fn extract_main_text(html: &str, max_chars: usize) -> String {
    let mut document = Html::parse_document(html);
    strip_boilerplate(&mut document);

    let content = CONTENT_SELECTORS
        .iter()
        .filter_map(|css| Selector::parse(css).ok())
        .find_map(|selector| document.select(&selector).next())
        .or_else(|| {
            Selector::parse("body")
                .ok()
                .and_then(|body| document.select(&body).next())
        });

    let Some(content) = content else {
        return String::new();
    };

    let text = content
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .take(max_chars)
        .collect()
}

fn strip_boilerplate(document: &mut Html) {
    let mut doomed: Vec<_> = match Selector::parse(BOILERPLATE) {
        Ok(selector) => document.select(&selector).map(|el| el.id()).collect(),
        Err(_) => Vec::new(),
    };
    doomed.extend(
        document
            .tree
            .nodes()
            .filter(|node| node.value().is_comment())
            .map(|node| node.id()),
    );

    for id in doomed {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}
