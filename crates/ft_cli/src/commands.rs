use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use ft_analysis::{aggregate_and_render, export_report};
use ft_core::{validate_topic, EmptyReason, HttpConfig, Outcome, PipelineConfig, Vocabulary};
use ft_scrappers::{AnalysisPipeline, SerperSearch};
use thiserror::Error;
use tracing::info;

/// Failures the user can act on, each with its own exit code.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Please enter a fashion item to analyze.")]
    EmptyTopic,

    #[error("{0}")]
    NoResults(EmptyReason),

    #[error("No Serper API key. Pass --serper-api-key or set SERPER_API_KEY.")]
    MissingApiKey,
}

impl CliError {
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::EmptyTopic => 2,
            CliError::NoResults(_) | CliError::MissingApiKey => 1,
        }
    }
}

#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Fashion item to research (e.g. "saree", "cargo pants")
    pub topic: String,

    /// JSON vocabulary overriding the built-in term lists
    #[arg(long)]
    pub vocabulary: Option<PathBuf>,

    /// Also write the markdown report into this directory
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Print the aggregate as JSON instead of markdown
    #[arg(long)]
    pub json: bool,

    /// Number of blogs fetched at the same time
    #[arg(long, default_value_t = 4)]
    pub concurrency: usize,

    /// Overall time limit in seconds, 0 for none
    #[arg(long, default_value_t = 300)]
    pub deadline: u64,

    /// Minimum pause between two search queries
    #[arg(long, default_value_t = 1000)]
    pub query_interval_ms: u64,

    /// Minimum pause between two fetches against the same host
    #[arg(long, default_value_t = 2000)]
    pub fetch_interval_ms: u64,

    #[arg(long, env = "SERPER_API_KEY", hide_env_values = true)]
    pub serper_api_key: Option<String>,

    #[arg(long)]
    pub serper_endpoint: Option<String>,

    /// Search country code
    #[arg(long, default_value = "us")]
    pub country: String,

    /// Search language code
    #[arg(long, default_value = "en")]
    pub language: String,
}

impl AnalyzeArgs {
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            query_interval: Duration::from_millis(self.query_interval_ms),
            fetch_interval: Duration::from_millis(self.fetch_interval_ms),
            concurrency: self.concurrency.max(1),
            deadline: (self.deadline > 0).then(|| Duration::from_secs(self.deadline)),
            ..PipelineConfig::default()
        }
    }
}

pub fn load_vocabulary(path: Option<&Path>) -> anyhow::Result<Vocabulary> {
    match path {
        Some(path) => Vocabulary::from_path(path)
            .with_context(|| format!("Failed to load vocabulary from {}", path.display())),
        None => Ok(Vocabulary::default()),
    }
}

pub async fn analyze(args: AnalyzeArgs) -> anyhow::Result<()> {
    let topic = validate_topic(&args.topic).map_err(|_| CliError::EmptyTopic)?;
    let vocabulary = load_vocabulary(args.vocabulary.as_deref())?;
    let api_key = args
        .serper_api_key
        .clone()
        .filter(|key| !key.trim().is_empty())
        .ok_or(CliError::MissingApiKey)?;

    let http = HttpConfig::default();
    let client = http.build_client()?;
    let mut provider = SerperSearch::new(client.clone(), api_key)
        .with_locale(args.country.as_str(), args.language.as_str());
    if let Some(endpoint) = &args.serper_endpoint {
        provider = provider.with_endpoint(endpoint.as_str());
    }

    let pipeline = AnalysisPipeline::from_config(
        Arc::new(provider),
        vocabulary,
        client,
        &http,
        &args.pipeline_config(),
    )?;

    let documents = match pipeline.discover_and_analyze(topic).await? {
        Outcome::Documents(documents) => documents,
        Outcome::Empty(reason) => return Err(CliError::NoResults(reason).into()),
    };
    let rendered = aggregate_and_render(topic, documents)
        .ok_or(CliError::NoResults(EmptyReason::NoRelevantDocuments))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&rendered.report)?);
    } else {
        println!("{}", rendered.markdown);
    }

    if let Some(dir) = &args.output {
        let path = export_report(dir, &rendered.report, &rendered.markdown)?;
        info!("💾 Report saved to {}", path.display());
    }

    Ok(())
}

pub fn vocabulary(path: Option<&Path>) -> anyhow::Result<()> {
    let vocabulary = load_vocabulary(path)?;
    println!("{}", serde_json::to_string_pretty(&vocabulary)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn args(topic: &str) -> AnalyzeArgs {
        AnalyzeArgs {
            topic: topic.to_string(),
            vocabulary: None,
            output: None,
            json: false,
            concurrency: 4,
            deadline: 300,
            query_interval_ms: 1000,
            fetch_interval_ms: 2000,
            serper_api_key: None,
            serper_endpoint: None,
            country: "us".to_string(),
            language: "en".to_string(),
        }
    }

    #[test]
    fn test_pipeline_config_from_flags() {
        let config = args("saree").pipeline_config();
        assert_eq!(config.query_interval, Duration::from_secs(1));
        assert_eq!(config.fetch_interval, Duration::from_secs(2));
        assert_eq!(config.deadline, Some(Duration::from_secs(300)));
        assert_eq!(config.max_blogs, 15);

        let mut unbounded = args("saree");
        unbounded.deadline = 0;
        unbounded.concurrency = 0;
        let config = unbounded.pipeline_config();
        assert_eq!(config.deadline, None);
        assert_eq!(config.concurrency, 1);
    }

    #[tokio::test]
    async fn test_blank_topic_fails_before_key_check() {
        let err = analyze(args("   ")).await.unwrap_err();
        let err = err.downcast_ref::<CliError>().unwrap();
        assert!(matches!(err, CliError::EmptyTopic));
        assert_eq!(err.exit_code(), 2);
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let mut missing = args("saree");
        missing.serper_api_key = Some("  ".to_string());
        let err = analyze(missing).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CliError>(),
            Some(CliError::MissingApiKey)
        ));
    }

    #[test]
    fn test_load_vocabulary_override() {
        let mut vocabulary = Vocabulary::default();
        vocabulary.colors = vec!["saffron".to_string()];
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", serde_json::to_string(&vocabulary).unwrap()).unwrap();

        let loaded = load_vocabulary(Some(file.path())).unwrap();
        assert_eq!(loaded.colors, vec!["saffron"]);
        assert_eq!(load_vocabulary(None).unwrap(), Vocabulary::default());
    }

    #[test]
    fn test_load_vocabulary_missing_file() {
        let err = load_vocabulary(Some(Path::new("/nonexistent/vocabulary.json"))).unwrap_err();
        assert!(err.to_string().contains("Failed to load vocabulary"));
    }

    #[test]
    fn test_no_results_message() {
        let err = CliError::NoResults(EmptyReason::NoRelevantDocuments);
        assert_eq!(err.exit_code(), 1);
        assert!(err.to_string().starts_with("No relevant fashion blogs found"));
    }
}
