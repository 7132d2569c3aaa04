use std::collections::HashSet;

use ft_core::{Error, FashionAnalysis, Result, Vocabulary};
use regex::Regex;

pub const MAX_COLORS: usize = 15;
pub const MAX_STYLES: usize = 10;
pub const MAX_TRENDS: usize = 8;
pub const MAX_BRANDS: usize = 10;
pub const MAX_PRICES: usize = 5;
pub const MAX_STYLING_TIPS: usize = 5;

const MIN_TIP_CHARS: usize = 20;
const MIN_BRAND_CHARS: usize = 3;

const BRAND_PATTERN: &str = r"\b[A-Z][a-zA-Z]+(?:\s+[A-Z][a-zA-Z]+)*\b";
const PRICE_PATTERN: &str = r"[$₹£€]\d+(?:,\d{3})*(?:\.\d{2})?|\d+(?:,\d{3})*\s*(?:dollars|rupees|pounds|euros|INR|USD|GBP|EUR)";
const SENTENCE_BREAK: &str = r"[.!?]+";

/// Pulls fashion signals out of plain text. Holds only compiled patterns
/// and term lists, so one instance can be shared across tasks.
#[derive(Debug, Clone)]
pub struct EntityExtractor {
    colors: Option<Regex>,
    patterns: Option<Regex>,
    brands: Regex,
    prices: Regex,
    sentences: Regex,
    styles: Vec<String>,
    trends: Vec<String>,
    brand_stopwords: HashSet<String>,
    styling_verbs: Vec<String>,
}

impl EntityExtractor {
    pub fn new(vocabulary: &Vocabulary) -> Result<Self> {
        Ok(Self {
            colors: word_alternation(&vocabulary.colors)?,
            patterns: word_alternation(&vocabulary.patterns)?,
            brands: compile(BRAND_PATTERN)?,
            prices: compile(PRICE_PATTERN)?,
            sentences: compile(SENTENCE_BREAK)?,
            styles: lowercase_all(&vocabulary.styles),
            trends: lowercase_all(&vocabulary.trend_indicators),
            brand_stopwords: vocabulary.brand_stopwords.iter().cloned().collect(),
            styling_verbs: lowercase_all(&vocabulary.styling_verbs),
        })
    }

    pub fn analyze(&self, text: &str, topic: &str) -> FashionAnalysis {
        let lower = text.to_lowercase();

        FashionAnalysis {
            colors: self.colors(&lower),
            styles: contained_terms(&lower, &self.styles, MAX_STYLES),
            trends: contained_terms(&lower, &self.trends, MAX_TRENDS),
            brands: self.brands(text),
            prices: distinct(
                self.prices.find_iter(text).map(|m| m.as_str().to_string()),
                MAX_PRICES,
            ),
            styling_tips: self.styling_tips(text),
            relevance: relevance(&lower, topic),
        }
    }

    /// Whole-word color matches first, then pattern/fabric matches.
    fn colors(&self, lower: &str) -> Vec<String> {
        let colors = self.colors.iter().flat_map(|re| re.find_iter(lower));
        let patterns = self.patterns.iter().flat_map(|re| re.find_iter(lower));
        distinct(
            colors.chain(patterns).map(|m| m.as_str().to_string()),
            MAX_COLORS,
        )
    }

    fn brands(&self, text: &str) -> Vec<String> {
        let candidates = self
            .brands
            .find_iter(text)
            .map(|m| m.as_str())
            .filter(|c| !self.brand_stopwords.contains(*c))
            .filter(|c| c.chars().count() >= MIN_BRAND_CHARS)
            .map(str::to_string);
        distinct(candidates, MAX_BRANDS)
    }

    fn styling_tips(&self, text: &str) -> Vec<String> {
        self.sentences
            .split(text)
            .map(str::trim)
            .filter(|s| s.chars().count() > MIN_TIP_CHARS)
            .filter(|s| {
                let lower = s.to_lowercase();
                self.styling_verbs.iter().any(|verb| lower.contains(verb.as_str()))
            })
            .take(MAX_STYLING_TIPS)
            .map(str::to_string)
            .collect()
    }
}

/// Topic occurrences per word, as a percentage capped at 100 and rounded
/// to two decimals. Zero for empty text or an empty topic.
pub fn relevance(text: &str, topic: &str) -> f64 {
    let topic = topic.trim().to_lowercase();
    let words = text.split_whitespace().count();
    if words == 0 || topic.is_empty() {
        return 0.0;
    }

    let mentions = text.to_lowercase().matches(topic.as_str()).count();
    let score = (mentions as f64 / words as f64 * 100.0).min(100.0);
    (score * 100.0).round() / 100.0
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::Config(format!("Invalid pattern: {}", e)))
}

/// `\b(?:term|term|...)\b` over the lower-cased terms, longest first so
/// multi-word phrases win over their prefixes.
fn word_alternation(terms: &[String]) -> Result<Option<Regex>> {
    let mut terms = lowercase_all(terms);
    terms.retain(|t| !t.trim().is_empty());
    if terms.is_empty() {
        return Ok(None);
    }
    terms.sort_by(|a, b| b.len().cmp(&a.len()));

    let alternation = terms
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|");
    compile(&format!(r"\b(?:{})\b", alternation)).map(Some)
}

fn contained_terms(lower: &str, terms: &[String], cap: usize) -> Vec<String> {
    distinct(
        terms
            .iter()
            .filter(|t| lower.contains(t.as_str()))
            .cloned(),
        cap,
    )
}

fn lowercase_all(terms: &[String]) -> Vec<String> {
    terms.iter().map(|t| t.to_lowercase()).collect()
}

/// First-occurrence order, de-duplicated before the cap is applied.
fn distinct(items: impl Iterator<Item = String>, cap: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in items {
        if out.len() == cap {
            break;
        }
        if seen.insert(item.clone()) {
            out.push(item);
        }
    }
    out
}
