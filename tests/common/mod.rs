//! Helpers for integration tests.
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use names_crawlers::crawlers::{NameSource, NameStream, SourceError, SourceResult};
use names_crawlers::repository::YamlRepository;
use tempfile::TempDir;

/// Temporary dataset location removed when dropped.
pub struct TestStore {
    dir: TempDir,
}

impl TestStore {
    pub fn new() -> Self {
        TestStore {
            dir: tempfile::tempdir().expect("Failed to create temporary directory."),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.dir.path().join("data").join("names.yml")
    }

    pub fn repo(&self) -> YamlRepository {
        YamlRepository::new(self.path())
    }
}

enum Behavior {
    Names(Vec<String>),
    Fail,
    Hang,
}

/// In-memory source with scripted behavior.
pub struct FakeSource {
    id: String,
    delay: Duration,
    behavior: Behavior,
}

impl FakeSource {
    pub fn names(id: &str, names: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            delay: Duration::ZERO,
            behavior: Behavior::Names(names.iter().map(|n| n.to_string()).collect()),
        }
    }

    pub fn failing(id: &str) -> Self {
        Self {
            id: id.to_string(),
            delay: Duration::ZERO,
            behavior: Behavior::Fail,
        }
    }

    pub fn hanging(id: &str) -> Self {
        Self {
            id: id.to_string(),
            delay: Duration::ZERO,
            behavior: Behavior::Hang,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn shared(self) -> Arc<dyn NameSource> {
        Arc::new(self)
    }
}

#[async_trait]
impl NameSource for FakeSource {
    fn id(&self) -> &str {
        &self.id
    }

    async fn fetch_names(&self) -> SourceResult<NameStream> {
        tokio::time::sleep(self.delay).await;
        match &self.behavior {
            Behavior::Names(names) => Ok(Box::new(names.clone().into_iter())),
            Behavior::Fail => Err(SourceError::Parse("selector matched nothing".to_string())),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(Box::new(std::iter::empty()))
            }
        }
    }
}
