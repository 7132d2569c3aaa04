use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use ft_core::{AggregateMetrics, AggregatedReport, AnalyzedDocument};
use tracing::info;

pub const TOP_COLORS: usize = 10;
pub const TOP_STYLES: usize = 8;
pub const TOP_TRENDS: usize = 6;
pub const TOP_BRANDS: usize = 8;

pub const MAX_CONFIDENCE: f64 = 85.0;

/// Builds the corpus-level report. `None` when there is nothing to aggregate.
pub fn aggregate(topic: &str, documents: Vec<AnalyzedDocument>) -> Option<AggregatedReport> {
    aggregate_at(topic, documents, Utc::now())
}

/// Same as [`aggregate`] with a caller-supplied timestamp.
pub fn aggregate_at(
    topic: &str,
    documents: Vec<AnalyzedDocument>,
    generated_at: DateTime<Utc>,
) -> Option<AggregatedReport> {
    if documents.is_empty() {
        return None;
    }

    let analyses = || documents.iter().map(|d| &d.analysis);
    let colors: Vec<&String> = analyses().flat_map(|a| &a.colors).collect();
    let styles: Vec<&String> = analyses().flat_map(|a| &a.styles).collect();
    let trends: Vec<&String> = analyses().flat_map(|a| &a.trends).collect();
    let brands: Vec<&String> = analyses().flat_map(|a| &a.brands).collect();
    let prices: Vec<&String> = analyses().flat_map(|a| &a.prices).collect();
    let styling_tips: Vec<String> = analyses().flat_map(|a| a.styling_tips.clone()).collect();

    let document_count = documents.len();
    let total_characters: usize = documents.iter().map(|d| d.document.content_length).sum();
    let average_relevance =
        analyses().map(|a| a.relevance).sum::<f64>() / document_count as f64;

    let metrics = AggregateMetrics {
        document_count,
        total_characters,
        estimated_words: total_characters / 5,
        average_relevance,
        unique_colors: unique_count(&colors),
        unique_styles: unique_count(&styles),
        unique_trends: unique_count(&trends),
        unique_brands: unique_count(&brands),
        unique_prices: unique_count(&prices),
    };

    let report = AggregatedReport {
        topic: topic.to_string(),
        generated_at,
        top_colors: rank_by_frequency(colors, TOP_COLORS),
        top_styles: rank_by_frequency(styles, TOP_STYLES),
        top_trends: rank_by_frequency(trends, TOP_TRENDS),
        top_brands: rank_by_frequency(brands, TOP_BRANDS),
        styling_tips,
        confidence: confidence(document_count, average_relevance),
        metrics,
        documents,
    };

    info!(
        "📊 Aggregated {} documents for '{}' (confidence {:.1}%)",
        document_count, topic, report.confidence
    );
    Some(report)
}

/// `min(85, documents * 5 + average_relevance * 2)`, never negative.
pub fn confidence(document_count: usize, average_relevance: f64) -> f64 {
    (document_count as f64 * 5.0 + average_relevance * 2.0).clamp(0.0, MAX_CONFIDENCE)
}

/// Most frequent first; equal counts keep first-seen order.
pub fn rank_by_frequency<'a>(
    items: impl IntoIterator<Item = &'a String>,
    limit: usize,
) -> Vec<String> {
    let mut counts: Vec<(&'a String, usize)> = Vec::new();
    let mut index: HashMap<&'a String, usize> = HashMap::new();

    for item in items {
        match index.get(item) {
            Some(&i) => counts[i].1 += 1,
            None => {
                index.insert(item, counts.len());
                counts.push((item, 1));
            }
        }
    }

    // Stable sort keeps insertion order among ties.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(limit)
        .map(|(item, _)| item.clone())
        .collect()
}

fn unique_count(items: &[&String]) -> usize {
    items.iter().collect::<HashSet<_>>().len()
}
