use std::fs;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;
use xxhash_rust::xxh3::xxh3_64;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Could not prepare cache directory `{0}`: {1}")]
    CreateDir(String, #[source] std::io::Error),
    #[error("Could not serialize cache entry `{0}`: {1}")]
    Serialize(String, #[source] serde_json::Error),
    #[error("Could not read cache entry `{0}`: {1}")]
    Read(String, #[source] std::io::Error),
    #[error("Cache entry `{0}` is corrupt: {1}")]
    Corrupt(String, #[source] serde_json::Error),
    #[error("Could not persist cache entry `{0}`: {1}")]
    Write(String, #[source] std::io::Error),
}

/// Disk-backed memoization rooted at a caller-supplied directory.
///
/// An entry is keyed by a function name plus the hash of the serialized
/// argument. There is no eviction and no cross-process locking; concurrent
/// writers of the same entry race on the file.
pub struct DiskCache {
    root: PathBuf,
}

impl DiskCache {

    pub fn new(root: impl Into<PathBuf>) -> Result<DiskCache, CacheError> {
        let root = root.into();
        fs::create_dir_all(&root)
            .map_err(|e| CacheError::CreateDir(root.display().to_string(), e))?;
        Ok(DiskCache { root })
    }

    /// Run `f` once per distinct argument; later calls with the same `name`
    /// and argument replay the persisted result without executing `f`.
    pub fn cached<A, R, F>(&self, name: &str, arg: A, f: F) -> Result<R, CacheError>
    where
        A: Serialize,
        R: Serialize + DeserializeOwned,
        F: FnOnce(A) -> R,
    {
        let entry = self.entry_path(name, &arg)?;
        let key = entry.display().to_string();

        if entry.exists() {
            let raw = fs::read_to_string(&entry).map_err(|e| CacheError::Read(key.clone(), e))?;
            return serde_json::from_str(&raw).map_err(|e| CacheError::Corrupt(key, e));
        }

        let result = f(arg);
        let raw = serde_json::to_string(&result)
            .map_err(|e| CacheError::Serialize(key.clone(), e))?;
        fs::write(&entry, raw).map_err(|e| CacheError::Write(key, e))?;
        Ok(result)
    }

    fn entry_path<A: Serialize>(&self, name: &str, arg: &A) -> Result<PathBuf, CacheError> {
        let serialized = serde_json::to_string(arg)
            .map_err(|e| CacheError::Serialize(name.to_string(), e))?;
        let digest = xxh3_64(serialized.as_bytes());
        Ok(self.root.join(format!("{}-{:016x}.json", name, digest)))
    }
}
