use std::path::{Path, PathBuf};

use serde::Serialize;
use tokio::fs;

use crate::errors::ServiceError;

/// Whole-file JSON mirror.
///
/// Every `write` serializes the full value and replaces the target file.
/// The bytes land in a sibling temp file first and are renamed over the
/// target, so a failed write never leaves a truncated mirror behind.
#[derive(Clone, Debug)]
pub struct JsonMirror {
    file_path: PathBuf,
}

impl JsonMirror {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { file_path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .file_path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "mirror".into());
        name.push(".tmp");
        self.file_path.with_file_name(name)
    }

    /// Serialize `value` and atomically replace the mirror file.
    pub async fn write<T: Serialize + ?Sized>(&self, value: &T) -> Result<(), ServiceError> {
        let data = serde_json::to_vec(value).map_err(ServiceError::storage)?;
        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await.map_err(ServiceError::storage)?;
            }
        }
        let tmp = self.temp_path();
        fs::write(&tmp, data).await.map_err(ServiceError::storage)?;
        if let Err(e) = fs::rename(&tmp, &self.file_path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(ServiceError::storage(e));
        }
        Ok(())
    }
}
