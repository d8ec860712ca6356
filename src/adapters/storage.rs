//! Key/value storage adapters.
//!
//! Implement both [`ConfigPort`] and [`StoragePort`] for the simulator.
//!
//! - [`MemStore`]: in-memory map, used by tests and as the default
//!   console backend.
//! - [`FileStore`]: the same map persisted as one JSON document, so the
//!   login flag and saved config survive restarts.
//!
//! Keys are composed as `namespace::key`.  The config is stored as a
//! postcard blob and validated before every save.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};

use crate::app::ports::{ConfigError, ConfigPort, StorageError, StoragePort};
use crate::config::SystemConfig;

const CONFIG_NAMESPACE: &str = "plantcare";
const CONFIG_KEY: &str = "syscfg";

/// Largest value either backend accepts.
const MAX_BLOB_SIZE: usize = 4000;

fn composite_key(namespace: &str, key: &str) -> String {
    format!("{}::{}", namespace, key)
}

fn read_into(map: &BTreeMap<String, Vec<u8>>, composite: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
    match map.get(composite) {
        Some(data) => {
            let len = data.len().min(buf.len());
            buf[..len].copy_from_slice(&data[..len]);
            Ok(len)
        }
        None => Err(StorageError::NotFound),
    }
}

fn decode_config(map: &BTreeMap<String, Vec<u8>>) -> Result<SystemConfig, ConfigError> {
    let key = composite_key(CONFIG_NAMESPACE, CONFIG_KEY);
    match map.get(&key) {
        Some(bytes) => {
            let cfg: SystemConfig = postcard::from_bytes(bytes).map_err(|_| ConfigError::Corrupted)?;
            cfg.validate()?;
            info!("storage: loaded config ({} bytes)", bytes.len());
            Ok(cfg)
        }
        None => {
            info!("storage: no stored config, using defaults");
            Ok(SystemConfig::default())
        }
    }
}

fn encode_config(config: &SystemConfig) -> Result<Vec<u8>, ConfigError> {
    config.validate()?;
    let bytes = postcard::to_allocvec(config).map_err(|_| ConfigError::IoError)?;
    if bytes.len() > MAX_BLOB_SIZE {
        return Err(StorageError::Full.into());
    }
    Ok(bytes)
}

// ───────────────────────────────────────────────────────────────
// In-memory backend
// ───────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct MemStore {
    store: BTreeMap<String, Vec<u8>>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StoragePort for MemStore {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        read_into(&self.store, &composite_key(namespace, key), buf)
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        if data.len() > MAX_BLOB_SIZE {
            return Err(StorageError::Full);
        }
        self.store.insert(composite_key(namespace, key), data.to_vec());
        Ok(())
    }

    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError> {
        self.store.remove(&composite_key(namespace, key));
        Ok(())
    }

    fn exists(&self, namespace: &str, key: &str) -> bool {
        self.store.contains_key(&composite_key(namespace, key))
    }
}

impl ConfigPort for MemStore {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        decode_config(&self.store)
    }

    fn save(&mut self, config: &SystemConfig) -> Result<(), ConfigError> {
        let bytes = encode_config(config)?;
        self.store
            .insert(composite_key(CONFIG_NAMESPACE, CONFIG_KEY), bytes);
        info!("storage: config saved (memory)");
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// JSON file backend
// ───────────────────────────────────────────────────────────────

pub struct FileStore {
    path: PathBuf,
    store: BTreeMap<String, Vec<u8>>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`.
    ///
    /// A missing file starts empty; an unreadable or malformed one is an
    /// I/O error rather than silently discarded.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let store = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).map_err(|e| {
                warn!("storage: {} is not a valid store: {}", path.display(), e);
                StorageError::IoError
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!("storage: cannot read {}: {}", path.display(), e);
                return Err(StorageError::IoError);
            }
        };
        info!("storage: opened {} ({} keys)", path.display(), store.len());
        Ok(Self { path, store })
    }

    /// Set (`Some`) or remove (`None`) one entry and flush.  When the file
    /// write fails the entry is restored, so memory never runs ahead of disk.
    fn commit(&mut self, key: String, value: Option<Vec<u8>>) -> Result<(), StorageError> {
        let previous = match value {
            Some(data) => self.store.insert(key.clone(), data),
            None => self.store.remove(&key),
        };
        if let Err(e) = self.flush() {
            match previous {
                Some(old) => self.store.insert(key, old),
                None => self.store.remove(&key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn flush(&self) -> Result<(), StorageError> {
        let text = serde_json::to_string_pretty(&self.store).map_err(|_| StorageError::IoError)?;
        fs::write(&self.path, text).map_err(|e| {
            warn!("storage: cannot write {}: {}", self.path.display(), e);
            StorageError::IoError
        })
    }
}

impl StoragePort for FileStore {
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError> {
        read_into(&self.store, &composite_key(namespace, key), buf)
    }

    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError> {
        if data.len() > MAX_BLOB_SIZE {
            return Err(StorageError::Full);
        }
        self.commit(composite_key(namespace, key), Some(data.to_vec()))
    }

    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError> {
        let composite = composite_key(namespace, key);
        if !self.store.contains_key(&composite) {
            return Ok(());
        }
        self.commit(composite, None)
    }

    fn exists(&self, namespace: &str, key: &str) -> bool {
        self.store.contains_key(&composite_key(namespace, key))
    }
}

impl ConfigPort for FileStore {
    fn load(&self) -> Result<SystemConfig, ConfigError> {
        decode_config(&self.store)
    }

    fn save(&mut self, config: &SystemConfig) -> Result<(), ConfigError> {
        let bytes = encode_config(config)?;
        self.commit(composite_key(CONFIG_NAMESPACE, CONFIG_KEY), Some(bytes))?;
        info!("storage: config saved to {}", self.path.display());
        Ok(())
    }
}
