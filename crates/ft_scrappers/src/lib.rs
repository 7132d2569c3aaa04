pub mod discovery;
pub mod fetcher;
pub mod gate;
pub mod logging;
pub mod pipeline;
pub mod search;

pub use discovery::{is_fashion_blog, BlogDiscoverer};
pub use fetcher::{extract_main_text, ContentFetcher, HttpPageSource, PageSource};
pub use gate::HostGate;
pub use logging::{init_logging, Logger};
pub use pipeline::AnalysisPipeline;
pub use search::{SearchProvider, SerperSearch};

pub mod prelude {
    pub use super::pipeline::AnalysisPipeline;
    pub use super::search::SearchProvider;
    pub use ft_core::{Error, Outcome, Result};
}
