use std::sync::Arc;
use std::time::Duration;

use futures::future;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::{JoinHandle, JoinSet};

use crate::crawlers::{NameSource, SourceError, SourceResult, default_sources};
use crate::domain::dataset::Dataset;
use crate::models::config::AppConfig;
use crate::repository::{DatasetWriter, RepositoryError, YamlRepository};

pub type HarvestResult<T> = Result<T, HarvestError>;

#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("failed to set up sources: {0}")]
    Setup(#[from] SourceError),
    #[error("all {} sources failed, dataset left unchanged", .0.len())]
    AllSourcesFailed(Vec<SourceFailure>),
    #[error("failed to persist dataset: {0}")]
    Repository(#[from] RepositoryError),
}

#[derive(Debug)]
pub struct SourceFailure {
    pub source: String,
    pub error: SourceError,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceSummary {
    pub source: String,
    pub names: usize,
}

/// Outcome of a harvest that wrote a new dataset.
#[derive(Debug, Default)]
pub struct HarvestReport {
    pub succeeded: Vec<SourceSummary>,
    pub failed: Vec<SourceFailure>,
    pub unique_names: usize,
}

impl HarvestReport {
    /// `true` when the dataset was written but some sources were left out.
    pub fn is_partial(&self) -> bool {
        !self.failed.is_empty()
    }
}

async fn produce(
    source: Arc<dyn NameSource>,
    deadline: Duration,
    tx: mpsc::Sender<String>,
) -> SourceResult<usize> {
    let names = tokio::time::timeout(deadline, source.fetch_names())
        .await
        .map_err(|_| SourceError::Timeout(deadline))??;

    let mut sent = 0;
    for name in names {
        if tx.send(name).await.is_err() {
            log::warn!("{}: consumer went away after {sent} names", source.id());
            break;
        }
        sent += 1;
    }
    Ok(sent)
}

/// Starts a task that fetches one source and streams its names.
///
/// The returned channel holds at most one pending name and is closed when
/// the task ends, whether the fetch succeeded, failed or ran past
/// `deadline`. The handle resolves to the number of names sent.
pub fn spawn_producer(
    source: Arc<dyn NameSource>,
    deadline: Duration,
) -> (mpsc::Receiver<String>, JoinHandle<SourceResult<usize>>) {
    let (tx, rx) = mpsc::channel(1);
    let handle = tokio::spawn(produce(source, deadline, tx));
    (rx, handle)
}

/// Merges several channels into one.
///
/// Each input gets its own forwarding task. The merged channel is closed
/// only after every forwarder has drained its input. Order within an input
/// is kept, order across inputs is whatever arrives first.
pub fn fan_in<T: Send + 'static>(inputs: Vec<mpsc::Receiver<T>>) -> mpsc::Receiver<T> {
    let (tx, rx) = mpsc::channel(1);

    let mut forwarders = JoinSet::new();
    for mut input in inputs {
        let tx = tx.clone();
        forwarders.spawn(async move {
            while let Some(item) = input.recv().await {
                if tx.send(item).await.is_err() {
                    break;
                }
            }
        });
    }

    tokio::spawn(async move {
        while let Some(joined) = forwarders.join_next().await {
            if let Err(e) = joined {
                log::error!("Forwarding task failed: {e}");
            }
        }
        // Last sender; dropping it ends the merged stream.
        drop(tx);
    });

    rx
}

/// Drains the channel and keeps each distinct name once.
pub async fn collect_unique(mut names: mpsc::Receiver<String>) -> Dataset {
    let mut dataset = Dataset::new();
    while let Some(name) = names.recv().await {
        dataset.insert(&name);
    }
    dataset
}

/// Fetches all sources concurrently, deduplicates the merged names and
/// replaces the stored dataset.
///
/// Failing sources are listed in the report and contribute nothing. When no
/// source succeeds the stored dataset is left untouched.
pub async fn harvest<W>(
    sources: Vec<Arc<dyn NameSource>>,
    deadline: Duration,
    repo: &W,
) -> HarvestResult<HarvestReport>
where
    W: DatasetWriter,
{
    log::info!("Starting harvest of {} sources", sources.len());

    let (conduits, producers): (Vec<_>, Vec<_>) = sources
        .iter()
        .map(|source| spawn_producer(Arc::clone(source), deadline))
        .unzip();

    let dataset = collect_unique(fan_in(conduits)).await;
    let outcomes = future::join_all(producers).await;

    let mut report = HarvestReport::default();
    for (source, outcome) in sources.iter().zip(outcomes) {
        let source = source.id().to_string();
        let outcome = outcome.unwrap_or_else(|e| Err(SourceError::Aborted(e.to_string())));
        match outcome {
            Ok(names) => {
                log::info!("{source}: {names} names");
                report.succeeded.push(SourceSummary { source, names });
            }
            Err(error) => {
                log::error!("{source}: {error}");
                report.failed.push(SourceFailure { source, error });
            }
        }
    }

    if report.succeeded.is_empty() {
        return Err(HarvestError::AllSourcesFailed(report.failed));
    }

    repo.save(&dataset)?;
    report.unique_names = dataset.len();

    log::info!(
        "Finished harvest: {} unique names, {} failed sources",
        report.unique_names,
        report.failed.len()
    );
    Ok(report)
}

/// Runs a harvest over the built-in sites using `config`.
pub async fn run_update(config: &AppConfig) -> HarvestResult<HarvestReport> {
    let sources = default_sources(config)?;
    let repo = YamlRepository::new(&config.dataset_path);
    harvest(sources, config.fetch_timeout(), &repo).await
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::crawlers::NameStream;

    struct Fixed(Vec<&'static str>);

    #[async_trait]
    impl NameSource for Fixed {
        fn id(&self) -> &str {
            "fixed"
        }

        async fn fetch_names(&self) -> SourceResult<NameStream> {
            let names: Vec<String> = self.0.iter().map(|s| s.to_string()).collect();
            Ok(Box::new(names.into_iter()))
        }
    }

    fn channel_of(items: Vec<u32>) -> mpsc::Receiver<u32> {
        let (tx, rx) = mpsc::channel(1);
        tokio::spawn(async move {
            for item in items {
                tx.send(item).await.unwrap();
            }
        });
        rx
    }

    #[tokio::test]
    async fn fan_in_delivers_every_item_once() {
        let inputs = vec![
            channel_of((0..50).collect()),
            channel_of((100..130).collect()),
            channel_of(vec![]),
        ];

        let mut merged = fan_in(inputs);
        let mut seen = Vec::new();
        while let Some(item) = merged.recv().await {
            seen.push(item);
        }

        assert_eq!(seen.len(), 80);
        let mut sorted = seen.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 80);
    }

    #[tokio::test]
    async fn fan_in_keeps_order_within_input() {
        let mut merged = fan_in(vec![
            channel_of((0..20).collect()),
            channel_of((100..120).collect()),
        ]);
        let mut low = Vec::new();
        let mut high = Vec::new();
        while let Some(item) = merged.recv().await {
            if item < 100 {
                low.push(item);
            } else {
                high.push(item);
            }
        }
        assert_eq!(low, (0..20).collect::<Vec<_>>());
        assert_eq!(high, (100..120).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn fan_in_waits_for_slowest_input() {
        let (slow_tx, slow_rx) = mpsc::channel(1);
        let mut merged = fan_in(vec![channel_of(vec![1, 2]), slow_rx]);

        assert!(merged.recv().await.is_some());
        assert!(merged.recv().await.is_some());
        let pending = tokio::time::timeout(Duration::from_millis(50), merged.recv()).await;
        assert!(pending.is_err(), "merged stream closed before slow input");

        slow_tx.send(3).await.unwrap();
        drop(slow_tx);
        assert_eq!(merged.recv().await, Some(3));
        assert_eq!(merged.recv().await, None);
    }

    #[tokio::test]
    async fn fan_in_of_nothing_closes() {
        let mut merged = fan_in::<u32>(vec![]);
        assert_eq!(merged.recv().await, None);
    }

    #[tokio::test]
    async fn producer_reports_sent_count() {
        let source: Arc<dyn NameSource> = Arc::new(Fixed(vec!["Jan", "Eva", "Jan"]));
        let (rx, handle) = spawn_producer(source, Duration::from_secs(1));

        let dataset = collect_unique(rx).await;
        assert_eq!(handle.await.unwrap().unwrap(), 3);
        assert_eq!(dataset.len(), 2);
    }
}
