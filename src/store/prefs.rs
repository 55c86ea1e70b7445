use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::error::{Result, StoreError};

/// Suffix for keys and files holding data that failed to parse.
pub(crate) const CORRUPT_SUFFIX: &str = ".corrupt";

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> StoreError + '_ {
    move |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// A named file of string values keyed by name, stored as one JSON object.
///
/// Values are usually JSON documents themselves. Writes replace the file
/// atomically (temp file + rename); the last writer wins.
#[derive(Debug)]
pub struct PrefStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl PrefStore {
    /// Open `<dir>/<name>.json`, creating `dir` if needed.
    pub fn open(dir: &Path, name: &str) -> Result<Self> {
        fs::create_dir_all(dir).map_err(io_err(dir))?;
        let mut store = Self {
            path: dir.join(format!("{name}.json")),
            values: BTreeMap::new(),
        };
        store.reload();
        Ok(store)
    }

    /// Re-read the file. A missing or unreadable file is empty; an
    /// unparsable one is set aside as `<file>.corrupt` and treated as empty.
    pub fn reload(&mut self) {
        self.values.clear();
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "preference file unreadable, starting empty");
                return;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(values) => self.values = values,
            Err(e) => {
                let aside = self.path.with_extension(format!("json{CORRUPT_SUFFIX}"));
                warn!(path = %self.path.display(), error = %e, "preference file malformed, starting empty");
                if let Err(e) = fs::write(&aside, &raw) {
                    warn!(path = %aside.display(), error = %e, "could not keep a copy of the malformed file");
                }
            }
        }
        debug!(path = %self.path.display(), keys = self.values.len(), "preferences loaded");
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Store `value` under `key`. Nothing changes in memory unless the file
    /// was written.
    pub fn put_string(&mut self, key: &str, value: impl Into<String>) -> Result<()> {
        let mut values = self.values.clone();
        values.insert(key.to_string(), value.into());
        self.commit(values)
    }

    pub fn remove(&mut self, key: &str) -> Result<()> {
        if !self.values.contains_key(key) {
            return Ok(());
        }
        let mut values = self.values.clone();
        values.remove(key);
        self.commit(values)
    }

    /// Decode the JSON stored under `key`.
    ///
    /// Malformed data is copied to `<key>.corrupt` before being reported as
    /// absent, so the next write cannot destroy it.
    pub fn get_json<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        let raw = self.get_string(key)?.to_owned();

        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(key, error = %e, "stored value is malformed, keeping a copy");
                if let Err(e) = self.put_string(&format!("{key}{CORRUPT_SUFFIX}"), raw) {
                    warn!(key, error = %e, "could not keep a copy of the malformed value");
                }
                None
            }
        }
    }

    pub fn put_json<T: Serialize + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.put_string(key, raw)
    }

    fn commit(&mut self, values: BTreeMap<String, String>) -> Result<()> {
        let body = serde_json::to_string_pretty(&values)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body).map_err(io_err(&tmp))?;
        if let Err(e) = fs::rename(&tmp, &self.path) {
            let _ = fs::remove_file(&tmp);
            return Err(io_err(&self.path)(e));
        }
        self.values = values;
        Ok(())
    }
}
