//! Progress kept in a JSON side file.
//!
//! The file is rewritten in full on every mark: written and synced to a
//! sibling temp file, then renamed over the original, so a crash or power
//! loss leaves either the old or the new state on disk.

use std::collections::{BTreeSet, HashSet};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::io::AsyncWriteExt;

use crate::error_handling::ProgressError;
use crate::input::ZipCode;

#[derive(Debug, Serialize, Deserialize)]
struct ProgressFile {
    collection: String,
    updated_at: DateTime<Utc>,
    completed: BTreeSet<ZipCode>,
}

pub(super) async fn load_completed(
    path: &Path,
    collection: &str,
) -> Result<HashSet<ZipCode>, ProgressError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            log::info!("No progress file at {}, starting fresh", path.display());
            return Ok(HashSet::new());
        }
        Err(e) => return Err(e.into()),
    };

    let state: ProgressFile =
        serde_json::from_str(&content).map_err(|source| ProgressError::Corrupt {
            path: path.to_path_buf(),
            source,
        })?;
    if state.collection != collection {
        return Err(ProgressError::CollectionMismatch {
            path: path.to_path_buf(),
            expected: collection.to_string(),
            found: state.collection,
        });
    }
    Ok(state.completed.into_iter().collect())
}

pub(super) async fn save(
    path: &Path,
    collection: &str,
    completed: &HashSet<ZipCode>,
) -> Result<(), ProgressError> {
    let state = ProgressFile {
        collection: collection.to_string(),
        updated_at: Utc::now(),
        completed: completed.iter().cloned().collect(),
    };
    let json = serde_json::to_vec_pretty(&state).map_err(ProgressError::Encode)?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let tmp = temp_path(path);
    let mut file = tokio::fs::File::create(&tmp).await?;
    file.write_all(&json).await?;
    file.sync_all().await?;
    drop(file);
    tokio::fs::rename(&tmp, path).await?;
    Ok(())
}

pub(super) async fn remove(path: &Path) -> Result<(), ProgressError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}
