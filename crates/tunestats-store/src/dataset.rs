//! Seed dataset files.
//!
//! A dataset is a single YAML or JSON document with `users`, `tracks` and
//! `favorites` lists, any of which may be omitted.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};
use tunestats_common::{Favorite, Result, StatsError, Track, User};

/// The three entity collections, in enumeration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dataset {
    pub users: Vec<User>,
    pub tracks: Vec<Track>,
    pub favorites: Vec<Favorite>,
}

/// On-disk encodings a dataset can be read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    Yaml,
    Json,
}

impl DatasetFormat {
    /// Picks the format from a file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            _ => Err(StatsError::validation_field(
                format!("unsupported dataset file '{}'", path.display()),
                "dataset_path",
            )),
        }
    }
}

impl Dataset {
    pub fn new(users: Vec<User>, tracks: Vec<Track>, favorites: Vec<Favorite>) -> Self {
        Self {
            users,
            tracks,
            favorites,
        }
    }

    /// Reads a dataset file, choosing the parser by extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = DatasetFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            StatsError::store_with_source(format!("Failed to read dataset {}", path.display()), e)
        })?;

        let dataset = Self::parse(&content, format)?;
        dataset.warn_on_duplicate_ids();
        info!(
            path = %path.display(),
            users = dataset.users.len(),
            tracks = dataset.tracks.len(),
            favorites = dataset.favorites.len(),
            "Loaded dataset"
        );
        Ok(dataset)
    }

    /// Parses dataset text in the given format.
    pub fn parse(content: &str, format: DatasetFormat) -> Result<Self> {
        match format {
            DatasetFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|e| StatsError::store_with_source("Failed to parse YAML dataset", e)),
            DatasetFormat::Json => serde_json::from_str(content)
                .map_err(|e| StatsError::store_with_source("Failed to parse JSON dataset", e)),
        }
    }

    /// Total number of entities across the three collections.
    pub fn len(&self) -> usize {
        self.users.len() + self.tracks.len() + self.favorites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Snapshots reject repeated ids; flag them at load time with the file context.
    fn warn_on_duplicate_ids(&self) {
        let mut user_ids = std::collections::HashSet::new();
        for user in &self.users {
            if !user_ids.insert(user.id) {
                warn!(user_id = %user.id, "Duplicate user id in dataset");
            }
        }
        let mut track_ids = std::collections::HashSet::new();
        for track in &self.tracks {
            if !track_ids.insert(&track.id) {
                warn!(track_id = %track.id, "Duplicate track id in dataset");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            DatasetFormat::from_path(&PathBuf::from("seed.YAML")).unwrap(),
            DatasetFormat::Yaml
        );
        assert_eq!(
            DatasetFormat::from_path(&PathBuf::from("seed.yml")).unwrap(),
            DatasetFormat::Yaml
        );
        assert_eq!(
            DatasetFormat::from_path(&PathBuf::from("seed.json")).unwrap(),
            DatasetFormat::Json
        );
        assert!(DatasetFormat::from_path(&PathBuf::from("seed.csv")).is_err());
        assert!(DatasetFormat::from_path(&PathBuf::from("seed")).is_err());
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let dataset = Dataset::parse("users: []\n", DatasetFormat::Yaml).unwrap();
        assert!(dataset.is_empty());

        let dataset = Dataset::parse("{}", DatasetFormat::Json).unwrap();
        assert_eq!(dataset, Dataset::default());
    }

    #[test]
    fn test_invalid_rating_fails_parse() {
        let json = r#"{"favorites":[{"id":1,"user_id":1,"track_id":"t1","rating":7,
            "created_at":"2024-01-01T00:00:00Z","last_played":null,"is_public":true,"comment":null}]}"#;
        let err = Dataset::parse(json, DatasetFormat::Json).unwrap_err();
        assert_eq!(err.to_string(), "Store error: Failed to parse JSON dataset");
    }

    #[test]
    fn test_malformed_input_is_a_store_error_in_both_formats() {
        let yaml = Dataset::parse("users: [", DatasetFormat::Yaml).unwrap_err();
        let json = Dataset::parse("{\"users\": [", DatasetFormat::Json).unwrap_err();
        for err in [yaml, json] {
            assert!(matches!(err, StatsError::Store { .. }));
            assert!(std::error::Error::source(&err).is_some());
        }
    }
}
