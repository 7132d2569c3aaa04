use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const DEFAULT_VOCABULARY: &str = include_str!("../vocabulary.json");

pub const TOPIC_PLACEHOLDER: &str = "{topic}";

/// Term lists and thresholds behind every heuristic in the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vocabulary {
    pub version: u32,
    pub query_templates: Vec<String>,
    pub fashion_keywords: Vec<String>,
    pub blog_indicators: Vec<String>,
    pub excluded_domains: Vec<String>,
    pub min_fashion_score: usize,
    pub min_blog_score: usize,
    pub colors: Vec<String>,
    pub patterns: Vec<String>,
    pub styles: Vec<String>,
    pub trend_indicators: Vec<String>,
    pub brand_stopwords: Vec<String>,
    pub styling_verbs: Vec<String>,
}

impl Vocabulary {
    pub fn from_json(json: &str) -> Result<Self> {
        let vocabulary: Vocabulary = serde_json::from_str(json)?;
        vocabulary.validate()?;
        Ok(vocabulary)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<()> {
        if self.query_templates.is_empty() {
            return Err(Error::Config("at least one query template is required".to_string()));
        }
        if let Some(template) = self
            .query_templates
            .iter()
            .find(|t| !t.contains(TOPIC_PLACEHOLDER))
        {
            return Err(Error::Config(format!(
                "query template is missing {}: {:?}",
                TOPIC_PLACEHOLDER, template
            )));
        }
        if self.colors.is_empty() {
            return Err(Error::Config("color vocabulary is empty".to_string()));
        }
        Ok(())
    }

    /// Search queries for a topic, in template order.
    pub fn queries_for(&self, topic: &str) -> Vec<String> {
        self.query_templates
            .iter()
            .map(|t| t.replace(TOPIC_PLACEHOLDER, topic))
            .collect()
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        serde_json::from_str(DEFAULT_VOCABULARY).expect("embedded vocabulary.json is valid")
    }
}

/// Settings for the single HTTP client shared by discovery and fetching.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub user_agent: String,
    pub timeout: Duration,
    pub max_content_chars: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36".to_string(),
            timeout: Duration::from_secs(10),
            max_content_chars: 5000,
        }
    }
}

impl HttpConfig {
    pub fn build_client(&self) -> Result<reqwest::Client> {
        Ok(reqwest::Client::builder()
            .user_agent(self.user_agent.clone())
            .timeout(self.timeout)
            .build()?)
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub max_blogs: usize,
    pub results_per_query: usize,
    /// Minimum gap between two search calls.
    pub query_interval: Duration,
    /// Minimum gap between two fetches against the same host.
    pub fetch_interval: Duration,
    pub concurrency: usize,
    pub deadline: Option<Duration>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_blogs: 15,
            results_per_query: 10,
            query_interval: Duration::from_secs(1),
            fetch_interval: Duration::from_secs(2),
            concurrency: 4,
            deadline: Some(Duration::from_secs(300)),
        }
    }
}

impl PipelineConfig {
    /// No pauses and no deadline. Intended for tests and offline runs.
    pub fn immediate() -> Self {
        Self {
            query_interval: Duration::ZERO,
            fetch_interval: Duration::ZERO,
            deadline: None,
            ..Self::default()
        }
    }
}
