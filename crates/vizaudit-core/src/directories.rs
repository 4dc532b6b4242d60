use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// How a directory's listing presence is determined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectoryProbe {
    /// Looked up through the places provider (real data).
    Places,
    /// Presence estimated from the business identity (no provider access).
    Estimated,
}

impl std::fmt::Display for DirectoryProbe {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DirectoryProbe::Places => write!(f, "places"),
            DirectoryProbe::Estimated => write!(f, "estimated"),
        }
    }
}

/// One listing directory to scan (e.g. the maps provider, a review site).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectorySpec {
    pub name: String,
    pub probe: DirectoryProbe,
    /// Threshold in `0..10` for the estimated probe: the name-hash digit must
    /// exceed it for the listing to count as found. Higher = rarer.
    pub found_threshold: Option<u8>,
}

#[derive(Debug, Deserialize)]
pub struct DirectoriesFile {
    pub directories: Vec<DirectorySpec>,
}

/// Load and validate the directory roster from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_directories(path: &Path) -> Result<DirectoriesFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::DirectoriesFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: DirectoriesFile = serde_yaml::from_str(&content)?;
    validate_directories(&file)?;
    Ok(file)
}

fn validate_directories(file: &DirectoriesFile) -> Result<(), ConfigError> {
    if file.directories.is_empty() {
        return Err(ConfigError::Validation(
            "directory roster must not be empty".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for dir in &file.directories {
        if dir.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "directory name must be non-empty".to_string(),
            ));
        }
        if !seen.insert(dir.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate directory name: '{}'",
                dir.name
            )));
        }
        if let Some(t) = dir.found_threshold {
            if t > 9 {
                return Err(ConfigError::Validation(format!(
                    "directory '{}' has found_threshold {t}; must be 0–9",
                    dir.name
                )));
            }
        }
    }

    Ok(())
}
