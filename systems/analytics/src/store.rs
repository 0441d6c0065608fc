//! Best-effort JSON persistence of statistics and unlocked achievements.

use std::{collections::BTreeSet, fs, io, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::Statistics;

/// Document written to disk between sessions.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveData {
    /// Lifetime counters.
    pub statistics: Statistics,
    /// Identifiers of unlocked achievements.
    pub achievements: BTreeSet<String>,
}

/// Failure while reading or writing the save document.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The file could not be read or written.
    #[error("save file i/o failed: {0}")]
    Io(#[from] io::Error),
    /// The file contents were not a valid save document.
    #[error("save file is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reads the save document, returning `None` when no file exists yet.
pub fn try_load(path: &Path) -> Result<Option<SaveData>, StoreError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(error) => return Err(error.into()),
    };
    Ok(Some(serde_json::from_str(&contents)?))
}

/// Writes the save document as pretty-printed JSON.
pub fn try_save(path: &Path, data: &SaveData) -> Result<(), StoreError> {
    let encoded = serde_json::to_vec_pretty(data)?;
    fs::write(path, encoded)?;
    Ok(())
}

/// Loads saved data, falling back to empty data on any failure.
#[must_use]
pub fn load(path: &Path) -> SaveData {
    match try_load(path) {
        Ok(Some(data)) => {
            debug!(path = %path.display(), "loaded save data");
            data
        }
        Ok(None) => SaveData::default(),
        Err(error) => {
            warn!(path = %path.display(), %error, "ignoring unreadable save data");
            SaveData::default()
        }
    }
}

/// Saves data, logging instead of failing. Returns whether the write succeeded.
pub fn save(path: &Path, data: &SaveData) -> bool {
    match try_save(path, data) {
        Ok(()) => {
            debug!(path = %path.display(), "saved statistics");
            true
        }
        Err(error) => {
            warn!(path = %path.display(), %error, "could not save statistics");
            false
        }
    }
}
