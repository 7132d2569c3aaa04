use ft_core::{AggregatedReport, AnalyzedDocument};
use serde::Serialize;

pub mod aggregator;
pub mod extractor;
pub mod report;

pub use aggregator::aggregate;
pub use extractor::EntityExtractor;
pub use report::{export_report, render, report_file_name};

/// An aggregate together with its rendered markdown.
#[derive(Debug, Clone, Serialize)]
pub struct RenderedReport {
    pub report: AggregatedReport,
    pub markdown: String,
}

/// Aggregates the analyzed documents and renders the report.
/// `None` when `documents` is empty.
pub fn aggregate_and_render(topic: &str, documents: Vec<AnalyzedDocument>) -> Option<RenderedReport> {
    let report = aggregate(topic, documents)?;
    let markdown = render(topic, &report);
    Some(RenderedReport { report, markdown })
}

pub mod prelude {
    pub use super::{aggregate_and_render, EntityExtractor, RenderedReport};
    pub use ft_core::{AggregatedReport, AnalyzedDocument, FashionAnalysis, Result, Error};
}
