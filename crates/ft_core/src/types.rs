use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::Result;

/// A single organic hit returned by a search provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// A search result that passed blog classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredBlog {
    pub title: String,
    pub url: String,
    pub snippet: String,
    /// Host (plus port when present). Used as the deduplication key.
    pub domain: String,
}

impl DiscoveredBlog {
    pub fn from_result(result: SearchResult) -> Result<Self> {
        let domain = domain_of(&result.url)?;
        Ok(Self {
            title: result.title,
            url: result.url,
            snippet: result.snippet,
            domain,
        })
    }
}

/// Returns the host component of a URL, keeping a non-default port.
pub fn domain_of(url: &str) -> Result<String> {
    let parsed = Url::parse(url)?;
    let host = parsed
        .host_str()
        .ok_or_else(|| crate::Error::InvalidUrl(format!("URL has no host: {}", url)))?;
    Ok(match parsed.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub source_title: String,
    pub url: String,
    /// Length of `raw_text` in characters.
    pub content_length: usize,
    pub raw_text: String,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FashionAnalysis {
    pub colors: Vec<String>,
    pub styles: Vec<String>,
    pub trends: Vec<String>,
    pub brands: Vec<String>,
    pub prices: Vec<String>,
    pub styling_tips: Vec<String>,
    /// Topic density in [0, 100], two decimals.
    pub relevance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzedDocument {
    pub document: ExtractedDocument,
    pub analysis: FashionAnalysis,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateMetrics {
    pub document_count: usize,
    pub total_characters: usize,
    pub estimated_words: usize,
    pub average_relevance: f64,
    pub unique_colors: usize,
    pub unique_styles: usize,
    pub unique_trends: usize,
    pub unique_brands: usize,
    pub unique_prices: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedReport {
    pub topic: String,
    pub generated_at: DateTime<Utc>,
    pub documents: Vec<AnalyzedDocument>,
    pub top_colors: Vec<String>,
    pub top_styles: Vec<String>,
    pub top_trends: Vec<String>,
    pub top_brands: Vec<String>,
    /// Every document's tips, flattened in document order.
    pub styling_tips: Vec<String>,
    /// Corpus-level score in [0, 85].
    pub confidence: f64,
    pub metrics: AggregateMetrics,
}

/// Why a pipeline run produced nothing to report on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmptyReason {
    NoBlogsDiscovered,
    NoRelevantDocuments,
    DeadlineExceeded,
}

impl fmt::Display for EmptyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyReason::NoBlogsDiscovered => write!(
                f,
                "No fashion blogs were discovered for this topic. Try another fashion item."
            ),
            EmptyReason::NoRelevantDocuments => write!(
                f,
                "No relevant fashion blogs found for this topic. Try another fashion item."
            ),
            EmptyReason::DeadlineExceeded => write!(
                f,
                "The analysis did not finish in time. Try again or raise the deadline."
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Outcome {
    Documents(Vec<AnalyzedDocument>),
    Empty(EmptyReason),
}

impl Outcome {
    pub fn documents(self) -> Vec<AnalyzedDocument> {
        match self {
            Outcome::Documents(documents) => documents,
            Outcome::Empty(_) => Vec::new(),
        }
    }
}
