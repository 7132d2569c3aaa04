use async_trait::async_trait;
use ft_core::{Result, SearchResult};

pub mod serper;

pub use serper::SerperSearch;

#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Returns the name of the provider. Also used as its rate-limit key.
    fn name(&self) -> &str;

    /// Runs one query and returns up to `max_results` organic results,
    /// in the order the provider ranked them.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>>;
}
