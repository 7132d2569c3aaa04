use std::fmt;

use async_trait::async_trait;
use ft_core::{Error, Result, SearchResult};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::SearchProvider;

pub const SERPER_ENDPOINT: &str = "https://google.serper.dev/search";

#[derive(Serialize)]
struct SerperRequest<'a> {
    q: &'a str,
    num: usize,
    gl: &'a str,
    hl: &'a str,
}

#[derive(Debug, Deserialize)]
struct SerperResponse {
    #[serde(default)]
    organic: Vec<SerperResult>,
}

#[derive(Debug, Deserialize)]
struct SerperResult {
    #[serde(default)]
    link: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    snippet: String,
}

impl From<SerperResult> for SearchResult {
    fn from(r: SerperResult) -> Self {
        SearchResult {
            title: r.title,
            url: r.link,
            snippet: r.snippet,
        }
    }
}

/// Google results through the Serper API.
pub struct SerperSearch {
    client: Client,
    api_key: String,
    endpoint: String,
    country: String,
    language: String,
}

impl SerperSearch {
    pub fn new(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            endpoint: SERPER_ENDPOINT.to_string(),
            country: "us".to_string(),
            language: "en".to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_locale(mut self, country: impl Into<String>, language: impl Into<String>) -> Self {
        self.country = country.into();
        self.language = language.into();
        self
    }
}

impl fmt::Debug for SerperSearch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerperSearch")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("country", &self.country)
            .field("language", &self.language)
            .finish()
    }
}

#[async_trait]
impl SearchProvider for SerperSearch {
    fn name(&self) -> &str {
        "serper"
    }

    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        debug!("🔍 Serper search: {}", query);

        let request = SerperRequest {
            q: query,
            num: max_results,
            gl: &self.country,
            hl: &self.language,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-API-KEY", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Search(format!(
                "Serper returned {} for query '{}'",
                status, query
            )));
        }

        let data: SerperResponse = response.json().await?;
        let results: Vec<SearchResult> = data
            .organic
            .into_iter()
            .take(max_results)
            .map(SearchResult::from)
            .collect();

        info!("✨ Serper returned {} results for '{}'", results.len(), query);
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_response() {
        let body = r#"{
            "searchParameters": {"q": "saree fashion blog"},
            "organic": [
                {"title": "Saree Guide", "link": "https://a.com/saree", "snippet": "Tips", "position": 1},
                {"title": "No snippet", "link": "https://b.com/post"}
            ]
        }"#;
        let response: SerperResponse = serde_json::from_str(body).unwrap();
        let results: Vec<SearchResult> = response.organic.into_iter().map(Into::into).collect();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].url, "https://a.com/saree");
        assert_eq!(results[0].title, "Saree Guide");
        assert_eq!(results[1].snippet, "");
    }

    #[test]
    fn test_missing_organic_is_empty() {
        let response: SerperResponse = serde_json::from_str("{}").unwrap();
        assert!(response.organic.is_empty());
    }

    #[test]
    fn test_request_body() {
        let request = SerperRequest {
            q: "saree outfit ideas fashion blog",
            num: 10,
            gl: "us",
            hl: "en",
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["q"], "saree outfit ideas fashion blog");
        assert_eq!(json["num"], 10);
        assert_eq!(json["gl"], "us");
    }

    #[test]
    fn test_debug_redacts_key() {
        let search = SerperSearch::new(Client::new(), "secret-key").with_locale("in", "en");
        let debug = format!("{:?}", search);
        assert!(!debug.contains("secret-key"));
        assert!(debug.contains("\"in\""));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_error() {
        let search = SerperSearch::new(Client::new(), "key").with_endpoint("http://127.0.0.1:1/search");
        assert!(search.search("saree", 10).await.is_err());
    }
}
