use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::crawlers::site::SiteCrawler;
use crate::models::config::AppConfig;

pub mod centrum;
pub mod rodina;
pub mod site;

pub use site::SiteConfig;

/// Lazy, single-pass sequence of names produced by one fetch.
pub type NameStream = Box<dyn Iterator<Item = String> + Send>;

pub type SourceResult<T> = Result<T, SourceError>;

/// Failure of a single source. Any of these drops the whole contribution of
/// that source for the current harvest.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to build crawler: {0}")]
    Build(String),
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    Status(reqwest::StatusCode),
    #[error("response is not valid {0}")]
    Encoding(&'static str),
    #[error("unexpected markup: {0}")]
    Parse(String),
    #[error("no response within {0:?}")]
    Timeout(Duration),
    #[error("crawler task aborted: {0}")]
    Aborted(String),
}

/// An abstraction over web pages that list personal names.
#[async_trait]
pub trait NameSource: Send + Sync {
    /// Short identifier used in logs and harvest reports.
    fn id(&self) -> &str;

    /// Fetches the page once and returns the names found on it.
    ///
    /// All network, decoding and markup errors surface here, before any
    /// name is handed out, so a failing source never yields partial data.
    async fn fetch_names(&self) -> SourceResult<NameStream>;
}

/// Post-filter rejecting tokens that contain whitespace, e.g. double names.
pub fn without_whitespace(name: &str) -> bool {
    !name.chars().any(char::is_whitespace)
}

pub fn build_reqwest_client(user_agent: &str) -> SourceResult<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(user_agent)
        .build()
        .map_err(|e| SourceError::Build(e.to_string()))
}

/// Builds crawlers for every known site, sharing one HTTP client.
pub fn default_sources(config: &AppConfig) -> SourceResult<Vec<Arc<dyn NameSource>>> {
    let client = build_reqwest_client(&config.user_agent)?;
    [rodina::site(), centrum::site()]
        .into_iter()
        .map(|site| {
            SiteCrawler::new(site, client.clone())
                .map(|crawler| Arc::new(crawler) as Arc<dyn NameSource>)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_filter_rejects_double_names() {
        assert!(without_whitespace("Anna"));
        assert!(!without_whitespace("Anna Marie"));
        assert!(!without_whitespace("Anna\tMarie"));
    }

    #[test]
    fn default_sources_cover_every_site() {
        let sources = default_sources(&AppConfig::default()).expect("sources should build");
        let ids: Vec<&str> = sources.iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec!["rodina", "centrum"]);
    }
}
