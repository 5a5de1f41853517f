use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use thiserror::Error;

use crate::domain::dataset::Dataset;

pub mod dataset;

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("filesystem error at {}: {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid dataset document: {0}")]
    Serialization(#[from] serde_yaml::Error),
}

impl RepositoryError {
    pub(crate) fn filesystem(path: &Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| RepositoryError::Filesystem {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Snapshot of the persisted dataset file.
#[derive(Clone, Debug)]
pub struct DatasetStatus {
    pub path: PathBuf,
    pub updated_at: Option<DateTime<Local>>,
    pub count: usize,
}

impl DatasetStatus {
    /// Modification time as `YYYY-MM-DD HH:MM:SS`, or `--/--/----` when the
    /// file does not exist yet.
    pub fn updated_label(&self) -> String {
        match self.updated_at {
            Some(at) => at.format("%Y-%m-%d %H:%M:%S").to_string(),
            None => "--/--/----".to_string(),
        }
    }
}

pub trait DatasetReader {
    /// Loads the dataset. A missing file is an empty dataset.
    fn load(&self) -> RepositoryResult<Dataset>;
    fn status(&self) -> RepositoryResult<DatasetStatus>;
}

pub trait DatasetWriter {
    /// Replaces the stored dataset as a whole.
    fn save(&self, dataset: &Dataset) -> RepositoryResult<()>;
}

/// Dataset store backed by a single YAML file.
#[derive(Clone, Debug)]
pub struct YamlRepository {
    path: PathBuf,
}

impl YamlRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Loads the dataset stored at `path`, empty if the file does not exist.
pub fn load_dataset(path: impl Into<PathBuf>) -> RepositoryResult<Dataset> {
    YamlRepository::new(path).load()
}
