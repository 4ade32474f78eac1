#![allow(clippy::to_string_trait_impl)]
// NOTE: We don't want to implement Display here since the state
// file is only ever meant to be stringified, never displayed.

use std::{collections::BTreeMap, path::Path, str::FromStr};

use chrono::Local;
use serde::{Deserialize, Serialize, de::Error as _};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::{
    channel::Channel,
    result::{SyncError, SyncResult},
    util::{
        fs::{load_from_file, save_to_file},
        json::to_string_pretty_indented,
    },
};

pub const DEFAULT_STATE_FILE: &str = "last_processed_releases.json";

const STATE_FILE_INDENT: usize = 2;

/**
    A single entry in the processed releases state file.
*/
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedRelease {
    pub name: String,
    pub processed_at: String,
    pub is_draft: bool,
}

impl ProcessedRelease {
    /**
        Creates a new entry, timestamped with the current local time.
    */
    #[must_use]
    pub fn new(name: impl Into<String>, is_draft: bool) -> Self {
        Self {
            name: name.into(),
            processed_at: Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            is_draft,
        }
    }

    #[must_use]
    pub fn channel(&self) -> Channel {
        Channel::from_draft(self.is_draft)
    }
}

/**
    The processed releases state file.

    Maps release identifiers to the [`ProcessedRelease`] recorded for them.
    Entries keep the order they were written in, and any unknown
    fields in existing entries are preserved when saving.
*/
#[derive(Debug, Default, Clone)]
pub struct ProcessedReleases {
    document: Map<String, Value>,
}

impl ProcessedReleases {
    /**
        Loads the state file from the given path.

        If the file does not exist, an empty state is returned,
        and the file will be created on the next save.

        # Errors

        - If the file exists but could not be read or parsed.
    */
    #[tracing::instrument(level = "trace")]
    pub async fn load(path: impl AsRef<Path> + std::fmt::Debug) -> SyncResult<Self> {
        let path = path.as_ref();
        match load_from_file(path).await {
            Ok(state) => Ok(state),
            Err(SyncError::FileNotFound(_)) => {
                info!("{} not found. Creating new file.", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e),
        }
    }

    /**
        Saves the state file to the given path, replacing its previous contents.

        # Errors

        - If the file could not be written.
    */
    #[tracing::instrument(skip(self), level = "trace")]
    pub async fn save(&self, path: impl AsRef<Path> + std::fmt::Debug) -> SyncResult<()> {
        save_to_file(path, self).await
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.document.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.document.is_empty()
    }

    /**
        Checks if the release with the given identifier has been processed.
    */
    #[must_use]
    pub fn contains(&self, release_id: u64) -> bool {
        self.document.contains_key(&release_id.to_string())
    }

    /**
        Gets the entry for the release with the given identifier.

        Returns `None` if the release was not processed, or if its entry is invalid.
    */
    #[cfg(test)]
    pub(crate) fn get(&self, release_id: u64) -> Option<ProcessedRelease> {
        let value = self.document.get(&release_id.to_string())?;
        ProcessedRelease::deserialize(value).ok()
    }

    /**
        Records the release with the given identifier as processed.

        Returns `true` if an older entry was replaced.
    */
    pub fn insert(&mut self, release_id: u64, entry: &ProcessedRelease) -> bool {
        let value = serde_json::to_value(entry).expect("entries always serialize");
        self.document.insert(release_id.to_string(), value).is_some()
    }

    /**
        Removes the entry for the release with the given identifier.

        Returns `true` if the entry was present.
    */
    pub fn remove(&mut self, release_id: u64) -> bool {
        self.document.shift_remove(&release_id.to_string()).is_some()
    }

    /**
        Iterates over all valid entries, in file order.
    */
    pub fn entries(&self) -> impl Iterator<Item = (&str, ProcessedRelease)> {
        self.document.iter().filter_map(|(id, value)| {
            let entry = ProcessedRelease::deserialize(value).ok()?;
            Some((id.as_str(), entry))
        })
    }

    /**
        Gets the name of the last entry in file order for each channel.

        Channels without any entries are not present in the returned map.
    */
    #[must_use]
    pub fn latest_names(&self) -> BTreeMap<Channel, String> {
        let mut latest = BTreeMap::new();
        for (_, entry) in self.entries() {
            latest.insert(entry.channel(), entry.name);
        }
        latest
    }
}

impl FromStr for ProcessedReleases {
    type Err = serde_json::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Value::Object(document) = serde_json::from_str::<Value>(s)? else {
            return Err(serde_json::Error::custom(
                "processed releases must be a JSON object",
            ));
        };

        /*
            Check for invalid entries and warn the user about them
            as a preprocessing step. Invalid entries still count as
            processed, but are ignored when updating build manifests.
        */
        for (id, value) in &document {
            if id.parse::<u64>().is_err() {
                warn!("Encountered non-numeric release id '{id}' in processed releases!");
            }
            if let Err(e) = ProcessedRelease::deserialize(value) {
                warn!(
                    "Encountered invalid entry for release '{id}' in processed releases!\
                    \nError: {e}"
                );
            }
        }

        Ok(Self { document })
    }
}

impl ToString for ProcessedReleases {
    fn to_string(&self) -> String {
        to_string_pretty_indented(&self.document, STATE_FILE_INDENT)
            .expect("JSON documents always serialize")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, is_draft: bool) -> ProcessedRelease {
        ProcessedRelease {
            name: name.to_string(),
            processed_at: String::from("2024-05-01T12:00:00.000000"),
            is_draft,
        }
    }

    #[test]
    fn insert_and_contains() {
        let mut state = ProcessedReleases::default();
        assert!(!state.contains(1));
        assert!(!state.insert(1, &entry("v1.0.0", false)));
        assert!(state.contains(1));
        assert_eq!(state.get(1), Some(entry("v1.0.0", false)));
        assert_eq!(state.len(), 1);
        assert!(state.remove(1));
        assert!(state.is_empty());
    }

    #[test]
    fn parse_keeps_order_and_unknown_fields() {
        let contents = r#"{
  "30": {
    "name": "v3.0.0",
    "processed_at": "2024-05-03T12:00:00",
    "is_draft": false,
    "note": "kept"
  },
  "10": {
    "name": "v1.0.0",
    "processed_at": "2024-05-01T12:00:00",
    "is_draft": false
  }
}"#;
        let state = contents.parse::<ProcessedReleases>().unwrap();
        let ids = state.entries().map(|(id, _)| id).collect::<Vec<_>>();
        assert_eq!(ids, vec!["30", "10"]);
        assert_eq!(state.to_string(), contents);
    }

    #[test]
    fn parse_rejects_non_objects() {
        assert!("[]".parse::<ProcessedReleases>().is_err());
        assert!("not json".parse::<ProcessedReleases>().is_err());
    }

    #[test]
    fn invalid_entries_are_skipped() {
        let contents = r#"{"1": {"name": "v1"}, "2": {"name": "v2", "processed_at": "x", "is_draft": true}}"#;
        let state = contents.parse::<ProcessedReleases>().unwrap();
        assert!(state.contains(1));
        assert_eq!(state.get(1), None);
        assert_eq!(state.entries().count(), 1);
    }

    #[test]
    fn latest_names_last_entry_wins() {
        let mut state = ProcessedReleases::default();
        state.insert(1, &entry("v1.0.0", false));
        state.insert(2, &entry("Nightly 1", true));
        state.insert(3, &entry("v1.1.0", false));
        state.insert(4, &entry("Nightly 2", true));
        let latest = state.latest_names();
        assert_eq!(latest.get(&Channel::Main).map(String::as_str), Some("v1.1.0"));
        assert_eq!(
            latest.get(&Channel::Develop).map(String::as_str),
            Some("Nightly 2")
        );
    }

    #[test]
    fn latest_names_missing_channel() {
        let mut state = ProcessedReleases::default();
        state.insert(1, &entry("v1.0.0", false));
        let latest = state.latest_names();
        assert!(!latest.contains_key(&Channel::Develop));
    }

    #[test]
    fn new_entry_timestamp_is_iso8601() {
        let e = ProcessedRelease::new("v1.0.0", false);
        assert!(chrono::NaiveDateTime::parse_from_str(&e.processed_at, "%Y-%m-%dT%H:%M:%S%.f").is_ok());
        assert_eq!(e.channel(), Channel::Main);
    }

    #[tokio::test]
    async fn load_missing_is_empty_then_save_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_STATE_FILE);

        let mut state = ProcessedReleases::load(&path).await.unwrap();
        assert!(state.is_empty());

        state.insert(123, &entry("v1.0.0", false));
        state.save(&path).await.unwrap();

        let loaded = ProcessedReleases::load(&path).await.unwrap();
        assert!(loaded.contains(123));
        assert_eq!(loaded.get(123), Some(entry("v1.0.0", false)));
    }

    #[tokio::test]
    async fn load_invalid_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_STATE_FILE);
        tokio::fs::write(&path, "{ broken").await.unwrap();
        assert!(matches!(
            ProcessedReleases::load(&path).await,
            Err(SyncError::Json(_))
        ));
    }
}
