use std::fs;
use std::io::{self, Write};
use std::path::Path;

use chrono::{DateTime, Local};
use tempfile::NamedTempFile;

use crate::domain::dataset::{Dataset, DatasetDocument};
use crate::repository::{
    DatasetReader, DatasetStatus, DatasetWriter, RepositoryError, RepositoryResult,
    YamlRepository,
};

impl YamlRepository {
    fn directory(&self) -> &Path {
        match self.path().parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }
}

impl DatasetReader for YamlRepository {
    fn load(&self) -> RepositoryResult<Dataset> {
        let content = match fs::read_to_string(self.path()) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Dataset::new()),
            Err(e) => return Err(RepositoryError::filesystem(self.path())(e)),
        };

        let document: DatasetDocument = serde_yaml::from_str(&content)?;
        Ok(document.into())
    }

    fn status(&self) -> RepositoryResult<DatasetStatus> {
        let updated_at = match fs::metadata(self.path()) {
            Ok(meta) => Some(
                meta.modified()
                    .map(DateTime::<Local>::from)
                    .map_err(RepositoryError::filesystem(self.path()))?,
            ),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => return Err(RepositoryError::filesystem(self.path())(e)),
        };

        Ok(DatasetStatus {
            path: self.path().to_path_buf(),
            updated_at,
            count: self.load()?.len(),
        })
    }
}

impl DatasetWriter for YamlRepository {
    /// Writes to a temporary file next to the target and renames it into
    /// place, so readers see either the old or the new dataset.
    fn save(&self, dataset: &Dataset) -> RepositoryResult<()> {
        let dir = self.directory();
        fs::create_dir_all(dir).map_err(RepositoryError::filesystem(dir))?;

        let yaml = serde_yaml::to_string(&DatasetDocument::from(dataset))?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(RepositoryError::filesystem(dir))?;
        tmp.write_all(yaml.as_bytes())
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(RepositoryError::filesystem(tmp.path()))?;
        tmp.persist(self.path())
            .map_err(|e| RepositoryError::filesystem(self.path())(e.error))?;

        log::info!("Saved {} names to {}", dataset.len(), self.path().display());
        Ok(())
    }
}
