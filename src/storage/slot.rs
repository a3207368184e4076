use std::{
    collections::BTreeMap,
    fs::{self, OpenOptions},
    io::{BufWriter, ErrorKind, Write},
    path::PathBuf,
};

use log::{debug, warn};

use crate::error::{Result, RosterError};

/// Key-value storage holding string values, in the manner of browser local storage.
pub trait Storage {
    /// Retrieves the value stored under `key`, if any
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value
    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`; removing a missing key is not an error
    fn remove_item(&mut self, key: &str) -> Result<()>;
}

/// Storage kept only for the lifetime of the process
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    items: BTreeMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.items.remove(key);
        Ok(())
    }
}

/// Storage backed by a JSON object on disk.
///
/// A missing or empty file is treated as empty storage. Every write rewrites the whole file
/// through a sibling `.tmp` file renamed into place. A file that cannot be read or parsed is
/// reported on every access and is never overwritten.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    items: BTreeMap<String, String>,
    unreadable: Option<String>,
}

impl FileStorage {
    pub fn open(path: PathBuf) -> Self {
        let read: std::result::Result<BTreeMap<String, String>, String> =
            match fs::read_to_string(&path) {
                Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
                Ok(raw) => serde_json::from_str(&raw)
                    .map_err(|e| format!("storage file `{}`; {e}", path.display())),
                Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
                Err(e) => Err(format!(
                    "storage file `{}` is unreadable; {e}",
                    path.display()
                )),
            };

        match read {
            Ok(items) => {
                debug!("opened storage `{}` with {} keys", path.display(), items.len());
                Self {
                    path,
                    items,
                    unreadable: None,
                }
            }
            Err(reason) => {
                warn!("{reason}");
                Self {
                    path,
                    items: BTreeMap::new(),
                    unreadable: Some(reason),
                }
            }
        }
    }

    fn check_readable(&self) -> Result<()> {
        match &self.unreadable {
            Some(reason) => Err(RosterError::Data(reason.clone())),
            None => Ok(()),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }

    /// Writes `items` to disk, leaving the previous file intact on failure
    fn flush(&self, items: &BTreeMap<String, String>) -> Result<()> {
        let tmp = self.temp_path();
        let out = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&tmp)?;
        let mut writer = BufWriter::new(out);
        serde_json::to_writer_pretty(&mut writer, items)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn replace(&mut self, items: BTreeMap<String, String>) -> Result<()> {
        self.flush(&items)?;
        self.items = items;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        self.check_readable()?;
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.check_readable()?;
        let mut items = self.items.clone();
        items.insert(key.to_string(), value.to_string());
        self.replace(items)
    }

    fn remove_item(&mut self, key: &str) -> Result<()> {
        self.check_readable()?;
        if self.items.contains_key(key) {
            let mut items = self.items.clone();
            items.remove(key);
            self.replace(items)?;
        }
        Ok(())
    }
}
