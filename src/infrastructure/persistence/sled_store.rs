//! Embedded sled store holding path → destination entries.
//!
//! All entries live in the [`PARTITION`] tree; keys are raw request paths
//! (leading slash included) and values are raw destination URLs, both UTF-8
//! bytes.
//!
//! The store is used in two strictly sequential phases:
//!
//! 1. [`seed`] opens a [`StoreWriter`], inserts entries, flushes and releases
//!    the handle.
//! 2. [`ServingStore::open`] opens the handle shared by request tasks. It only
//!    exposes reads.
//!
//! sled holds an exclusive lock on the directory, so phase 1 must finish (and
//! its handle be dropped) before phase 2 starts, and the admin CLI cannot run
//! against a store a live server has open.

use crate::domain::entities::PathRecord;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Name of the tree holding path → destination entries.
pub const PARTITION: &str = "PathsToURLs";

/// Entry inserted by the bootstrap seeding step.
pub const DEFAULT_SEED: &[(&str, &str)] =
    &[("/urlshort-bolt", "https://github.com/gophercises/urlshort")];

/// Errors that can occur while opening or reading the store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to open store at {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: sled::Error,
    },

    #[error("Store not found at {}", .0.display())]
    Missing(PathBuf),

    #[error("Store at {} has no PathsToURLs partition", .0.display())]
    MissingPartition(PathBuf),

    #[error("Store operation failed: {0}")]
    Database(#[from] sled::Error),

    #[error("Value stored under '{key}' is not valid UTF-8")]
    InvalidUtf8 { key: String },
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

fn open_db(path: &Path) -> StoreResult<sled::Db> {
    sled::open(path).map_err(|source| StoreError::Open {
        path: path.to_path_buf(),
        source,
    })
}

fn decode(key: &[u8], value: &[u8]) -> StoreResult<String> {
    String::from_utf8(value.to_vec()).map_err(|_| StoreError::InvalidUtf8 {
        key: String::from_utf8_lossy(key).into_owned(),
    })
}

fn collect_entries(tree: &sled::Tree) -> StoreResult<Vec<PathRecord>> {
    let mut records = Vec::new();
    for entry in tree.iter() {
        let (key, value) = entry?;
        let path = String::from_utf8_lossy(&key).into_owned();
        let url = decode(&key, &value)?;
        records.push(PathRecord { path, url });
    }
    Ok(records)
}

/// Read-write handle used by the seeding step and the admin CLI.
pub struct StoreWriter {
    db: sled::Db,
    tree: sled::Tree,
}

impl StoreWriter {
    /// Opens (creating if needed) the store and its partition.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Open`] if the directory cannot be opened or is
    /// locked by another handle.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let db = open_db(path.as_ref())?;
        let tree = db.open_tree(PARTITION)?;
        Ok(Self { db, tree })
    }

    /// Inserts or replaces an entry, returning the previous destination.
    pub fn put(&self, path: &str, url: &str) -> StoreResult<Option<String>> {
        let previous = self.tree.insert(path.as_bytes(), url.as_bytes())?;
        previous
            .map(|value| decode(path.as_bytes(), &value))
            .transpose()
    }

    pub fn get(&self, path: &str) -> StoreResult<Option<String>> {
        self.tree
            .get(path.as_bytes())?
            .map(|value| decode(path.as_bytes(), &value))
            .transpose()
    }

    /// Removes an entry. Returns `true` if it existed.
    pub fn remove(&self, path: &str) -> StoreResult<bool> {
        Ok(self.tree.remove(path.as_bytes())?.is_some())
    }

    /// Lists all entries in key order.
    pub fn entries(&self) -> StoreResult<Vec<PathRecord>> {
        collect_entries(&self.tree)
    }

    /// Flushes pending writes and releases the handle.
    pub fn close(self) -> StoreResult<()> {
        let bytes = self.db.flush()?;
        debug!("Store flushed ({} bytes)", bytes);
        Ok(())
    }
}

/// Seeds the store with `entries`, then releases the read-write handle.
///
/// Existing entries under the same paths are overwritten.
///
/// # Errors
///
/// Returns [`StoreError::Open`] if the store cannot be opened, or
/// [`StoreError::Database`] if an insert or the final flush fails.
pub fn seed(path: impl AsRef<Path>, entries: &[(&str, &str)]) -> StoreResult<()> {
    let path = path.as_ref();
    let writer = StoreWriter::open(path)?;
    for (key, url) in entries {
        writer.put(key, url)?;
    }
    writer.close()?;

    info!("Seeded {} entries into {}", entries.len(), path.display());
    Ok(())
}

/// Shared handle used while serving requests.
///
/// Cloning is cheap (sled handles are reference counted). Only reads are
/// exposed, so request tasks never mutate the store.
#[derive(Clone)]
pub struct ServingStore {
    db: sled::Db,
    tree: sled::Tree,
    path: PathBuf,
}

impl ServingStore {
    /// Opens an existing, seeded store for serving.
    ///
    /// # Errors
    ///
    /// - [`StoreError::Missing`] if nothing exists at `path`
    /// - [`StoreError::Open`] if the store is locked or unreadable
    /// - [`StoreError::MissingPartition`] if the store was never seeded
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(StoreError::Missing(path.to_path_buf()));
        }

        let db = open_db(path)?;
        let has_partition = db
            .tree_names()
            .iter()
            .any(|name| &name[..] == PARTITION.as_bytes());
        if !has_partition {
            return Err(StoreError::MissingPartition(path.to_path_buf()));
        }

        let tree = db.open_tree(PARTITION)?;
        info!(
            "Opened store {} ({} entries)",
            path.display(),
            tree.len()
        );

        Ok(Self {
            db,
            tree,
            path: path.to_path_buf(),
        })
    }

    /// Reads the destination stored under `path`.
    ///
    /// Each call is an independent point read; nothing is held between calls.
    pub fn get(&self, path: &str) -> StoreResult<Option<String>> {
        self.tree
            .get(path.as_bytes())?
            .map(|value| decode(path.as_bytes(), &value))
            .transpose()
    }

    /// Counts entries. Walks the whole tree, so keep it off the request path.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Lists all entries in key order.
    pub fn entries(&self) -> StoreResult<Vec<PathRecord>> {
        collect_entries(&self.tree)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Probes the store with a cheap read.
    pub fn health_check(&self) -> bool {
        self.tree.first().is_ok()
    }

    /// Releases this handle. The store closes once every clone is dropped.
    pub fn close(self) {
        debug!("Releasing store handle {}", self.path.display());
        drop(self.tree);
        drop(self.db);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_seed_then_serve() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.db");

        seed(&path, DEFAULT_SEED).unwrap();
        let store = ServingStore::open(&path).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get("/urlshort-bolt").unwrap().as_deref(),
            Some("https://github.com/gophercises/urlshort")
        );
        assert_eq!(store.get("/unknown").unwrap(), None);
        assert!(store.health_check());
    }

    #[test]
    fn test_seed_is_idempotent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.db");

        seed(&path, DEFAULT_SEED).unwrap();
        seed(&path, DEFAULT_SEED).unwrap();

        let store = ServingStore::open(&path).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_open_missing_store() {
        let dir = tempdir().unwrap();
        let result = ServingStore::open(dir.path().join("absent.db"));

        assert!(matches!(result, Err(StoreError::Missing(_))));
    }

    #[test]
    fn test_open_unseeded_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("store.db");
        drop(sled::open(&path).unwrap());

        let result = ServingStore::open(&path);
        assert!(matches!(result, Err(StoreError::MissingPartition(_))));
    }

    #[test]
    fn test_writer_put_get_remove() {
        let dir = tempdir().unwrap();
        let writer = StoreWriter::open(dir.path().join("store.db")).unwrap();

        assert_eq!(writer.put("/a", "https://a.test").unwrap(), None);
        assert_eq!(
            writer.put("/a", "https://a2.test").unwrap().as_deref(),
            Some("https://a.test")
        );
        writer.put("/b", "https://b.test").unwrap();

        assert_eq!(writer.get("/a").unwrap().as_deref(), Some("https://a2.test"));
        assert_eq!(
            writer.entries().unwrap(),
            vec![
                PathRecord::new("/a", "https://a2.test"),
                PathRecord::new("/b", "https://b.test"),
            ]
        );

        assert!(writer.remove("/a").unwrap());
        assert!(!writer.remove("/a").unwrap());
        assert_eq!(writer.get("/a").unwrap(), None);
    }

    #[test]
    fn test_invalid_utf8_value() {
        let dir = tempdir().unwrap();
        let writer = StoreWriter::open(dir.path().join("store.db")).unwrap();
        writer
            .tree
            .insert("/bin".as_bytes(), vec![0xff_u8, 0xfe])
            .unwrap();

        let result = writer.get("/bin");
        assert!(matches!(result, Err(StoreError::InvalidUtf8 { key }) if key == "/bin"));
    }
}
