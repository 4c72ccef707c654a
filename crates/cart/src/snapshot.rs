//! Durable cart snapshots.
//!
//! The cart is persisted as one JSON document under a fixed key and fully
//! overwritten on every mutation. There is no incremental format.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::cart::Cart;
use crate::error::SnapshotError;

/// Storage key the cart snapshot lives under.
pub const CART_STORAGE_KEY: &str = "shopcart:cart";

/// Synchronous, local byte store holding the cart snapshot.
///
/// `write` must be atomic: on failure the previously stored bytes are still
/// what `read` returns.
pub trait SnapshotStore: Send + Sync {
    /// Stored bytes, or `None` if nothing was ever written.
    fn read(&self) -> Result<Option<Vec<u8>>, SnapshotError>;

    /// Replace the stored bytes.
    fn write(&self, bytes: &[u8]) -> Result<(), SnapshotError>;
}

impl<S> SnapshotStore for Arc<S>
where
    S: SnapshotStore + ?Sized,
{
    fn read(&self) -> Result<Option<Vec<u8>>, SnapshotError> {
        (**self).read()
    }

    fn write(&self, bytes: &[u8]) -> Result<(), SnapshotError> {
        (**self).write(bytes)
    }
}

pub fn encode_cart(cart: &Cart) -> Result<Vec<u8>, SnapshotError> {
    Ok(serde_json::to_vec(cart)?)
}

pub fn decode_cart(bytes: &[u8]) -> Result<Cart, SnapshotError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// In-memory key-value byte store.
///
/// Intended for tests/dev.
#[derive(Debug)]
pub struct InMemorySnapshotStore {
    key: String,
    slots: RwLock<HashMap<String, Vec<u8>>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::with_key(CART_STORAGE_KEY)
    }

    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// Pre-populate the slot, e.g. with a snapshot left by an earlier session.
    pub fn seeded(self, bytes: impl Into<Vec<u8>>) -> Self {
        self.slots
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(self.key.clone(), bytes.into());
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl Default for InMemorySnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn read(&self) -> Result<Option<Vec<u8>>, SnapshotError> {
        let slots = self
            .slots
            .read()
            .map_err(|_| SnapshotError::unavailable("lock poisoned"))?;
        Ok(slots.get(&self.key).cloned())
    }

    fn write(&self, bytes: &[u8]) -> Result<(), SnapshotError> {
        let mut slots = self
            .slots
            .write()
            .map_err(|_| SnapshotError::unavailable("lock poisoned"))?;
        slots.insert(self.key.clone(), bytes.to_vec());
        Ok(())
    }
}

/// File-backed store: one file per key inside a directory.
///
/// Writes land in a temporary sibling that is flushed and then renamed over
/// the real file, so a crash mid-write leaves the old snapshot readable.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_key(dir, CART_STORAGE_KEY)
    }

    pub fn with_key(dir: impl Into<PathBuf>, key: &str) -> Self {
        let mut path = dir.into();
        path.push(format!("{}.json", file_stem(key)));
        Self { path }
    }

    /// Store rooted at `{app_data_dir}/shopcart`.
    pub fn in_default_dir() -> Result<Self, SnapshotError> {
        Ok(Self::new(default_data_dir()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn read(&self) -> Result<Option<Vec<u8>>, SnapshotError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, bytes: &[u8]) -> Result<(), SnapshotError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.temp_path();
        if let Err(e) = replace_file(&tmp, &self.path, bytes) {
            let _ = fs::remove_file(&tmp);
            tracing::error!(path = ?self.path, error = %e, "failed to write cart snapshot");
            return Err(e.into());
        }
        Ok(())
    }
}

fn replace_file(tmp: &Path, target: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = fs::File::create(tmp)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    fs::rename(tmp, target)
}

/// Keys such as `shopcart:cart` are not valid file names everywhere.
fn file_stem(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

/// Resolve `{app_data_dir}/shopcart`.
pub fn default_data_dir() -> Result<PathBuf, SnapshotError> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .ok_or_else(|| {
            SnapshotError::unavailable(
                "failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share",
            )
        })?;

    let mut dir = base;
    dir.push("shopcart");
    Ok(dir)
}
