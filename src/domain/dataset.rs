use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// The canonical set of unique names.
///
/// Names are kept in a sorted set, so equality is set equality and the
/// persisted order is lexicographic. Empty names are never stored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dataset {
    names: BTreeSet<String>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a name after trimming it. Returns `true` when the name was
    /// not present before.
    pub fn insert(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.names.insert(name.to_string())
    }

    #[cfg(test)]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}

impl<S: AsRef<str>> FromIterator<S> for Dataset {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut dataset = Dataset::new();
        for name in iter {
            dataset.insert(name.as_ref());
        }
        dataset
    }
}

/// On-disk shape of a [`Dataset`]: a single `names` field.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct DatasetDocument {
    #[serde(default)]
    pub names: Vec<String>,
}

impl From<&Dataset> for DatasetDocument {
    fn from(dataset: &Dataset) -> Self {
        Self {
            names: dataset.names.iter().cloned().collect(),
        }
    }
}

impl From<DatasetDocument> for Dataset {
    fn from(document: DatasetDocument) -> Self {
        document.names.into_iter().collect()
    }
}
