//! On-disk JSON cache for the bulk hash listing.

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{Error, Result};

pub const HASH_LIST_FILE: &str = "hash_list.json";

/// A single JSON artifact on disk.
///
/// Writes go to a dot-prefixed temporary sibling first and are renamed into
/// place, so readers never observe a half-written file.
#[derive(Clone, Debug)]
pub struct ListingCache {
    path: PathBuf,
}

impl ListingCache {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

    /// The hash listing artifact inside `cache_dir`.
    pub fn hash_list(cache_dir: impl AsRef<Path>) -> Self { Self::new(cache_dir.as_ref().join(HASH_LIST_FILE)) }

    pub fn path(&self) -> &Path { &self.path }

    /// Parsed contents, or `None` when the artifact does not exist.
    pub async fn load<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::Io(e)),
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| Error::CacheRead {
                path: self.path.clone(),
                source,
            })
    }

    /// Persist `value` as pretty-printed JSON.
    pub async fn store<T: Serialize + ?Sized>(&self, value: &T) -> Result<()> {
        let content = serde_json::to_vec_pretty(value)?;
        self.write_atomic(&content).await.map_err(|source| Error::CacheWrite {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = ?self.path, bytes = content.len(), "stored cache artifact");
        Ok(())
    }

    async fn write_atomic(&self, content: &[u8]) -> io::Result<()> {
        let parent = self.path.parent().unwrap_or(Path::new(""));
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let file_name = self.path.file_name().unwrap_or_default().to_string_lossy();
        let tmp_path = parent.join(format!(".{file_name}.tmp"));

        tokio::fs::write(&tmp_path, content).await?;
        tokio::fs::rename(&tmp_path, &self.path).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn missing_artifact_is_none() {
        let dir = tempdir().unwrap();
        let cache = ListingCache::hash_list(dir.path());
        assert!(cache.load::<Vec<String>>().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn store_then_load() {
        let dir = tempdir().unwrap();
        let cache = ListingCache::hash_list(dir.path().join("nested"));
        let list = vec!["b".to_string(), "a".to_string()];

        cache.store(&list).await.unwrap();

        assert_eq!(cache.load::<Vec<String>>().await.unwrap(), Some(list));
        let text = std::fs::read_to_string(cache.path()).unwrap();
        assert_eq!(text, "[\n  \"b\",\n  \"a\"\n]");
        assert!(!dir.path().join("nested").join(".hash_list.json.tmp").exists());
    }

    #[tokio::test]
    async fn malformed_artifact_is_a_cache_read_error() {
        let dir = tempdir().unwrap();
        let cache = ListingCache::hash_list(dir.path());
        std::fs::write(cache.path(), "[\"unterminated").unwrap();

        let err = cache.load::<Vec<String>>().await.unwrap_err();
        assert!(matches!(err, Error::CacheRead { .. }));
    }
}
