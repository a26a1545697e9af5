#![forbid(unsafe_code)]

use serde::Deserialize;
use std::path::{Path, PathBuf};

pub(crate) const CONFIG_FILE_NAME: &str = "check-matrix.yaml";

/// Optional YAML settings file. Every field may be omitted.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct AppConfig {
    /// Initial read-only mode when no CLI flag is given. Overrides the stored preference.
    pub(crate) read_only: Option<bool>,
    /// Log filter directive used when neither `CHECK_MATRIX_LOG` nor `RUST_LOG` is set.
    pub(crate) log: Option<String>,
    pub(crate) json_export_name: String,
    pub(crate) csv_export_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            read_only: None,
            log: None,
            json_export_name: "checklist.json".to_string(),
            csv_export_name: "checklist.csv".to_string(),
        }
    }
}

impl AppConfig {
    pub(crate) fn parse(text: &str) -> Result<Self, serde_yaml::Error> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text)
    }

    /// An explicit path must exist; the implicit `<storage-dir>/check-matrix.yaml` is optional.
    pub(crate) fn load(explicit: Option<&Path>, storage_dir: &Path) -> Result<Self, String> {
        let (path, required): (PathBuf, bool) = match explicit {
            Some(path) => (path.to_path_buf(), true),
            None => (storage_dir.join(CONFIG_FILE_NAME), false),
        };
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if !required && err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => return Err(format!("config {}: {err}", path.display())),
        };
        Self::parse(&text).map_err(|err| format!("config {}: {err}", path.display()))
    }
}
