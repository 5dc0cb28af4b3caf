// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! File-backed durable store.
//!
//! Each key lives in `<dir>/<key>.json`. Writes go to a temp file that is
//! fsynced and renamed over the target, so a crash leaves either the old or
//! the new value. An exclusive lock on `<dir>/store.lock` is held from
//! [`FileStore::open`] until [`FileStore::close`] (or drop).

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use fs2::FileExt;

use super::{check_key, DurableStore};
use crate::error::{Error, Result};

const LOCK_NAME: &str = "store.lock";

/// A [`DurableStore`] keeping one JSON file per key in a directory.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    /// Held lock file; `None` once closed.
    lock: Mutex<Option<File>>,
}

impl FileStore {
    /// Opens (creating if needed) a store in `dir` and takes its lock.
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;

        let lock_file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(dir.join(LOCK_NAME))?;
        lock_file
            .try_lock_exclusive()
            .map_err(|_| Error::StoreLocked(dir.display().to_string()))?;

        tracing::debug!(dir = %dir.display(), "opened file store");
        Ok(FileStore {
            dir: dir.to_path_buf(),
            lock: Mutex::new(Some(lock_file)),
        })
    }

    /// Returns the store directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(Error::StoreClosed)
        }
    }

    fn value_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl DurableStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        check_key(key)?;
        self.ensure_open()?;
        match fs::read_to_string(self.value_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        check_key(key)?;
        self.ensure_open()?;

        let tmp_path = self.dir.join(format!(".{key}.json.tmp"));
        {
            let mut tmp = File::create(&tmp_path)?;
            tmp.write_all(value.as_bytes())?;
            tmp.sync_all()?;
        }
        fs::rename(&tmp_path, self.value_path(key))?;

        // Persist the rename itself; not supported on every platform.
        if let Ok(dir) = File::open(&self.dir) {
            let _ = dir.sync_all();
        }
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        check_key(key)?;
        self.ensure_open()?;
        match fs::remove_file(self.value_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn close(&self) -> Result<()> {
        let mut lock = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(file) = lock.take() {
            let _ = FileExt::unlock(&file);
            tracing::debug!(dir = %self.dir.display(), "closed file store");
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.lock.lock().unwrap_or_else(|e| e.into_inner()).is_some()
    }
}

#[cfg(test)]
#[path = "file_tests.rs"]
mod tests;
