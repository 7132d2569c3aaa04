use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use ft_core::{AggregatedReport, Result};
use tracing::info;

const NOT_DETERMINED: &str = "Not determined";
const REPORT_COLORS: usize = 8;
// The analysis block restates only the top 5 of the listed colors.
const COLOR_ANALYSIS: usize = 5;
const REPORT_TIPS: usize = 8;
const MIN_REPORT_TIP_CHARS: usize = 30;
const HEADLINE_ITEMS: usize = 3;

/// Renders the markdown report. Output depends only on `topic` and the
/// report contents, so rendering the same report twice is byte-identical.
pub fn render(topic: &str, report: &AggregatedReport) -> String {
    let timestamp = report.generated_at.format("%Y-%m-%d %H:%M:%S").to_string();
    let metrics = &report.metrics;
    let blogs = metrics.document_count;
    let mut out: Vec<String> = Vec::new();

    out.push(format!("# Fashion Analysis Report: {}", title_case(topic)));
    out.push(String::new());

    out.push("## Summary".to_string());
    out.push(format!("- **Research Date**: {}", timestamp));
    out.push(format!("- **Blogs Analyzed**: {} fashion blogs", blogs));
    out.push(format!(
        "- **Content Analyzed**: {} characters",
        thousands(metrics.total_characters)
    ));
    out.push(format!("- **Analysis Confidence**: {:.1}%", report.confidence));
    out.push(format!("- **Average Relevance**: {:.1}%", metrics.average_relevance));
    out.push(String::new());

    out.push("## Discovered Color Trends".to_string());
    out.push(format!(
        "Based on analysis of {} fashion blogs, the most mentioned colors for {} are:",
        blogs, topic
    ));
    out.push(String::new());
    bullets(&mut out, report.top_colors.iter().take(REPORT_COLORS), |color| {
        format!(
            "**{}**: Frequently mentioned across multiple fashion sources",
            title_case(color)
        )
    });
    out.push(String::new());
    out.push("### Color Trend Analysis".to_string());
    bullets(&mut out, report.top_colors.iter().take(COLOR_ANALYSIS), |color| {
        format!(
            "{} appears to be trending in current {} fashion",
            title_case(color),
            topic
        )
    });
    out.push(String::new());

    out.push("## Style Variations Discovered".to_string());
    out.push("The following styles were identified from real fashion blog content:".to_string());
    out.push(String::new());
    bullets(&mut out, report.top_styles.iter(), |style| {
        format!(
            "**{}**: Popular styling approach mentioned in fashion blogs",
            title_case(style)
        )
    });
    out.push(String::new());
    out.push("### Current Style Trends".to_string());
    bullets(&mut out, report.top_trends.iter(), |trend| {
        format!("{} is mentioned as a current trend", title_case(trend))
    });
    out.push(String::new());

    out.push("## Brand Mentions from Fashion Blogs".to_string());
    out.push("These brands were mentioned across the analyzed fashion content:".to_string());
    out.push(String::new());
    bullets(&mut out, report.top_brands.iter(), |brand| {
        format!("**{}**: Referenced in fashion blog content", brand)
    });
    out.push(String::new());

    out.push("## Styling Tips from Fashion Experts".to_string());
    out.push("Real styling advice extracted from fashion blogs:".to_string());
    out.push(String::new());
    let tips = report
        .styling_tips
        .iter()
        .take(REPORT_TIPS)
        .filter(|tip| tip.chars().count() > MIN_REPORT_TIP_CHARS);
    bullets(&mut out, tips, |tip| tip.to_string());
    out.push(String::new());

    out.push("## Market Intelligence".to_string());
    out.push(String::new());
    out.push("### Trend Indicators".to_string());
    bullets(&mut out, report.top_trends.iter(), |trend| {
        format!(
            "**{}**: Identified as trending in fashion blog discussions",
            title_case(trend)
        )
    });
    out.push(String::new());
    out.push("### Style Popularity".to_string());
    out.push(format!("Based on frequency analysis across {} sources:", blogs));
    out.push(format!(
        "1. **Most Mentioned Style**: {}",
        report
            .top_styles
            .first()
            .map(|s| title_case(s))
            .unwrap_or_else(|| NOT_DETERMINED.to_string())
    ));
    out.push(format!(
        "2. **Trending Colors**: {}",
        headline(&report.top_colors, "Various colors mentioned")
    ));
    out.push(format!(
        "3. **Popular Brands**: {}",
        headline(&report.top_brands, "Multiple brands referenced")
    ));
    out.push(String::new());

    out.push("## Content Sources".to_string());
    out.push("The following fashion blogs were analyzed for this report:".to_string());
    out.push(String::new());
    bullets(&mut out, report.documents.iter(), |doc| {
        format!(
            "**{}** - {} (Relevance: {:.1}%)",
            doc.document.source_title, doc.document.url, doc.analysis.relevance
        )
    });
    out.push(String::new());

    out.push("## Data Analysis Metrics".to_string());
    out.push(format!(
        "- **Total Content Words**: {} (estimated)",
        thousands(metrics.estimated_words)
    ));
    out.push(format!("- **Unique Colors Identified**: {}", metrics.unique_colors));
    out.push(format!("- **Style Variations Found**: {}", metrics.unique_styles));
    out.push(format!("- **Trend Keywords Detected**: {}", metrics.unique_trends));
    out.push(format!("- **Fashion Brands Mentioned**: {}", metrics.unique_brands));
    out.push(format!("- **Price Points Found**: {}", metrics.unique_prices));
    out.push(String::new());

    out.push("## Research Methodology".to_string());
    out.push("1. **Blog Discovery**: Multi-query web search for relevant fashion blogs".to_string());
    out.push("2. **Content Extraction**: Scraped and cleaned actual blog content".to_string());
    out.push("3. **Trend Analysis**: Identified patterns in colors, styles, and trends".to_string());
    out.push("4. **Brand Recognition**: Extracted brand mentions from content".to_string());
    out.push(
        "5. **Confidence Scoring**: Calculated based on content volume and relevance".to_string(),
    );
    out.push(String::new());

    out.push("## Report Metadata".to_string());
    out.push(format!("- **Generated**: {}", timestamp));
    out.push("- **Analysis Type**: Automated blog content analysis".to_string());
    out.push(format!(
        "- **Data Sources**: {} dynamically discovered fashion blogs",
        blogs
    ));
    out.push("- **Research Scope**: Real-time fashion blog content".to_string());
    out.push("- **Update Frequency**: On-demand analysis".to_string());
    out.push(format!("- **Version**: Automated Fashion Analyzer v{}", env!("CARGO_PKG_VERSION")));
    out.push(String::new());
    out.push("---".to_string());
    out.push("*This report was generated through automated analysis of real fashion blog content. \
All trends, colors, styles, and recommendations are heuristically extracted from discovered fashion \
publications and blogs.*".to_string());

    let mut text = out.join("\n");
    text.push('\n');
    text
}

/// `fashion_report_<topic>_<YYYYmmdd_HHMMSS>.md`
pub fn report_file_name(topic: &str, generated_at: DateTime<Utc>) -> String {
    format!(
        "fashion_report_{}_{}.md",
        topic.trim().to_lowercase().replace(' ', "_"),
        generated_at.format("%Y%m%d_%H%M%S")
    )
}

/// Writes the rendered markdown into `dir` and returns the file path.
pub fn export_report(dir: &Path, report: &AggregatedReport, markdown: &str) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(report_file_name(&report.topic, report.generated_at));
    std::fs::write(&path, markdown)?;
    info!("💾 Report written to {}", path.display());
    Ok(path)
}

fn bullets<T>(out: &mut Vec<String>, items: impl Iterator<Item = T>, line: impl Fn(T) -> String) {
    let before = out.len();
    out.extend(items.map(|item| format!("- {}", line(item))));
    if out.len() == before {
        out.push(format!("- {}", NOT_DETERMINED));
    }
}

fn headline(items: &[String], fallback: &str) -> String {
    if items.is_empty() {
        return fallback.to_string();
    }
    items
        .iter()
        .take(HEADLINE_ITEMS)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ")
}

/// Upper-cases every letter that follows a non-letter, lower-cases the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_is_letter = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if previous_is_letter {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(c);
            previous_is_letter = false;
        }
    }
    out
}

fn thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
