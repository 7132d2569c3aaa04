pub mod config;
pub mod error;
pub mod types;

pub use config::{HttpConfig, PipelineConfig, Vocabulary};
pub use error::{Error, Result};
pub use types::{
    AggregateMetrics, AggregatedReport, AnalyzedDocument, DiscoveredBlog, EmptyReason,
    ExtractedDocument, FashionAnalysis, Outcome, SearchResult,
};

/// Trims the topic and rejects it when nothing is left.
pub fn validate_topic(topic: &str) -> Result<&str> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err(Error::EmptyTopic);
    }
    Ok(topic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_topic() {
        assert_eq!(validate_topic("  saree ").unwrap(), "saree");
        assert!(matches!(validate_topic("   "), Err(Error::EmptyTopic)));
        assert!(matches!(validate_topic(""), Err(Error::EmptyTopic)));
    }
}
