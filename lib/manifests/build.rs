#![allow(clippy::to_string_trait_impl)]
// NOTE: We don't want to implement Display here since build
// manifests are only meant to be stringified, never displayed.

use std::{path::Path, str::FromStr};

use serde::de::Error as _;
use serde_json::{Map, Value};

use crate::{
    result::SyncResult,
    util::{
        fs::{load_from_file, save_to_file},
        json::to_string_pretty_indented,
    },
};

pub const DEV_MANIFEST_FILE_NAME: &str = "manifest_geoseals_dev.json";
pub const PROD_MANIFEST_FILE_NAME: &str = "manifest_geoseals.json";

const MANIFEST_INDENT: usize = 4;
const VERSION_KEY: &str = "version";

/**
    A build manifest file.

    Only the `version` field is ever changed, all other
    fields are kept as-is and in their original order.
*/
#[derive(Debug, Default, Clone)]
pub struct BuildManifest {
    document: Map<String, Value>,
}

impl BuildManifest {
    /**
        Loads the manifest from the given path.

        # Errors

        - If the manifest file does not exist, could not be read, or is not a JSON object.
    */
    #[tracing::instrument(level = "trace")]
    pub async fn load(path: impl AsRef<Path> + std::fmt::Debug) -> SyncResult<Self> {
        tracing::trace!("Loading manifest");
        load_from_file(path).await
    }

    /**
        Saves the manifest to the given path, replacing its previous contents.

        # Errors

        - If the manifest file could not be written.
    */
    #[tracing::instrument(skip(self), level = "trace")]
    pub async fn save(&self, path: impl AsRef<Path> + std::fmt::Debug) -> SyncResult<()> {
        tracing::trace!("Saving manifest");
        save_to_file(path, self).await
    }

    /**
        Gets the current version in the manifest.

        Returns `None` if the version is missing or not a string.
    */
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.document.get(VERSION_KEY).and_then(Value::as_str)
    }

    /**
        Sets the version in the manifest.

        Returns `true` if the version was changed.
    */
    pub fn set_version(&mut self, version: impl Into<String>) -> bool {
        let version = version.into();
        if self.version() == Some(version.as_str()) {
            return false;
        }
        self.document
            .insert(VERSION_KEY.to_string(), Value::String(version));
        true
    }
}

impl FromStr for BuildManifest {
    type Err = serde_json::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match serde_json::from_str::<Value>(s)? {
            Value::Object(document) => Ok(Self { document }),
            _ => Err(serde_json::Error::custom(
                "build manifest must be a JSON object",
            )),
        }
    }
}

impl ToString for BuildManifest {
    fn to_string(&self) -> String {
        to_string_pretty_indented(&self.document, MANIFEST_INDENT)
            .expect("JSON documents always serialize")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::result::SyncError;

    use super::*;

    const MANIFEST: &str = r#"{
    "name": "GeoSeals",
    "version": "v0.9.0",
    "builds": [
        {
            "chipFamily": "ESP32",
            "parts": [
                {
                    "path": "firmware/main/merged.bin",
                    "offset": 0
                }
            ]
        }
    ]
}"#;

    #[test]
    fn set_version_keeps_other_fields() {
        let mut manifest = MANIFEST.parse::<BuildManifest>().unwrap();
        assert_eq!(manifest.version(), Some("v0.9.0"));
        assert!(manifest.set_version("v1.0.0"));
        assert!(!manifest.set_version("v1.0.0"));

        let written = manifest.to_string();
        assert_eq!(written, MANIFEST.replace("v0.9.0", "v1.0.0"));

        let value: Value = serde_json::from_str(&written).unwrap();
        let original: Value = serde_json::from_str(MANIFEST).unwrap();
        assert_eq!(value["builds"], original["builds"]);
        assert_eq!(value["name"], original["name"]);
    }

    #[test]
    fn set_version_adds_missing_field() {
        let mut manifest = r#"{"name": "x"}"#.parse::<BuildManifest>().unwrap();
        assert_eq!(manifest.version(), None);
        assert!(manifest.set_version("v1.0.0"));
        let value: Value = serde_json::from_str(&manifest.to_string()).unwrap();
        assert_eq!(value, json!({ "name": "x", "version": "v1.0.0" }));
    }

    #[test]
    fn parse_rejects_non_objects() {
        assert!("[1, 2]".parse::<BuildManifest>().is_err());
        assert!("".parse::<BuildManifest>().is_err());
    }

    #[tokio::test]
    async fn load_missing_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEV_MANIFEST_FILE_NAME);
        assert!(matches!(
            BuildManifest::load(&path).await,
            Err(SyncError::FileNotFound(_))
        ));
    }
}
