//! Configuration model loaded from external sources.

use std::path::PathBuf;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;

pub const DEFAULT_DATASET_PATH: &str = "data/names.yml";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = "ScraperBot - We read list od names";

#[derive(Clone, Debug, Deserialize)]
/// Settings shared by the harvester and the dataset store.
pub struct AppConfig {
    pub dataset_path: PathBuf,
    pub fetch_timeout_secs: u64,
    pub user_agent: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl AppConfig {
    /// Loads settings from an optional YAML file and `NAMES_*` environment
    /// variables, in that order of precedence (environment wins).
    pub fn load(file: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("dataset_path", DEFAULT_DATASET_PATH)?
            .set_default("fetch_timeout_secs", DEFAULT_FETCH_TIMEOUT_SECS as i64)?
            .set_default("user_agent", DEFAULT_USER_AGENT)?
            .add_source(File::new(file, FileFormat::Yaml).required(false))
            .add_source(Environment::with_prefix("NAMES"))
            .build()?
            .try_deserialize()
    }

    /// Deadline applied to each source fetch.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = AppConfig::load("does-not-exist.yml").expect("defaults should load");
        assert_eq!(config.dataset_path, PathBuf::from(DEFAULT_DATASET_PATH));
        assert_eq!(config.fetch_timeout(), Duration::from_secs(30));
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn file_overrides_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".yml")
            .tempfile()
            .expect("temp file");
        writeln!(file, "dataset_path: other/names.yml\nfetch_timeout_secs: 5").unwrap();

        let path = file.path().to_str().unwrap().to_string();
        let config = AppConfig::load(&path).expect("config should load");
        assert_eq!(config.dataset_path, PathBuf::from("other/names.yml"));
        assert_eq!(config.fetch_timeout_secs, 5);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }
}
