//! Storage for the raw bytes of uploaded CSV files.

use anyhow::{Context, Result};
use std::path::{Component, Path, PathBuf};
use tracing::info;

const DEFAULT_FILE_NAME: &str = "upload.csv";

/// Writes uploaded files into one directory, addressed by file name.
///
/// A second upload with the same name replaces the first one.
#[derive(Debug, Clone)]
pub struct UploadStore {
    directory: PathBuf,
}

impl UploadStore {
    pub fn new<P: AsRef<Path>>(directory: P) -> Self {
        Self {
            directory: directory.as_ref().to_path_buf(),
        }
    }

    /// Where a file with this client supplied name would be stored
    pub fn path_for(&self, file_name: Option<&str>) -> PathBuf {
        self.directory.join(safe_file_name(file_name))
    }

    /// Save `bytes` and return the path written
    pub async fn save(&self, file_name: Option<&str>, bytes: &[u8]) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.directory)
            .await
            .with_context(|| {
                format!("Failed to create upload directory {}", self.directory.display())
            })?;

        let path = self.path_for(file_name);
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("Failed to write upload to {}", path.display()))?;

        info!("Saved {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }
}

/// Reduce a client supplied file name to its last normal path component so
/// it cannot escape the upload directory.
fn safe_file_name(file_name: Option<&str>) -> String {
    let cleaned = file_name
        .map(|name| name.trim().replace('\\', "/"))
        .unwrap_or_default();

    Path::new(&cleaned)
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .last()
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_FILE_NAME)
        .to_string()
}
