//! Durable record store.
//!
//! The whole log lives in one pretty-printed JSON array. Every access holds
//! the store's mutex, and an advisory lock on a sibling `.lock` file keeps
//! separate processes out of each other's way. Writes go to a temp file in
//! the same directory which is then renamed over the live file, so readers
//! only ever see a complete document.

use crate::{Error, Result, WorkoutRecord};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tempfile::NamedTempFile;

/// Storage for the workout log
pub trait WorkoutStore {
    /// Every record, in insertion order
    fn get_all(&self) -> Result<Vec<WorkoutRecord>>;

    /// Add one record at the end of the log
    fn append(&self, record: WorkoutRecord) -> Result<()>;

    /// Replace the entire log
    fn replace_all(&self, records: &[WorkoutRecord]) -> Result<()>;
}

/// JSON-file backed store with locking and atomic replacement
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock_path: PathBuf,
    guard: Mutex<()>,
}

impl JsonFileStore {
    /// Open the store at `path`, creating the parent directory and an empty
    /// log if they do not exist yet.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file_name = path
            .file_name()
            .ok_or_else(|| Error::Store(format!("store path {:?} has no file name", path)))?
            .to_string_lossy()
            .into_owned();
        let lock_path = path.with_file_name(format!("{}.lock", file_name));

        let store = Self {
            path,
            lock_path,
            guard: Mutex::new(()),
        };
        store.init()?;
        Ok(store)
    }

    /// Location of the JSON document
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn init(&self) -> Result<()> {
        let parent = self.parent_dir()?;
        std::fs::create_dir_all(parent)?;

        let _guard = self.lock();
        let lock_file = self.open_lock_file()?;
        lock_file.lock_exclusive()?;

        let result = if self.path.exists() {
            Ok(())
        } else {
            tracing::info!("Initializing empty workout log at {:?}", self.path);
            self.write_unlocked(&[])
        };

        lock_file.unlock()?;
        result
    }

    fn parent_dir(&self) -> Result<&Path> {
        match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => Ok(parent),
            Some(_) => Ok(Path::new(".")),
            None => Err(Error::Store(format!(
                "store path {:?} missing parent",
                self.path
            ))),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ()> {
        // The mutex guards no data, so a poisoned lock is still usable
        self.guard.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn open_lock_file(&self) -> Result<File> {
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&self.lock_path)?;
        Ok(file)
    }

    fn read_unlocked(&self) -> Result<Vec<WorkoutRecord>> {
        let mut contents = String::new();
        File::open(&self.path)?.read_to_string(&mut contents)?;

        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        let records: Option<Vec<WorkoutRecord>> = serde_json::from_str(&contents)?;
        Ok(records.unwrap_or_default())
    }

    fn write_unlocked(&self, records: &[WorkoutRecord]) -> Result<()> {
        let temp = NamedTempFile::new_in(self.parent_dir()?)?;

        {
            let mut writer = BufWriter::new(temp.as_file());
            serde_json::to_writer_pretty(&mut writer, records)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        temp.as_file().sync_all()?;

        temp.persist(&self.path).map_err(|e| Error::Io(e.error))?;
        Ok(())
    }
}

impl WorkoutStore for JsonFileStore {
    fn get_all(&self) -> Result<Vec<WorkoutRecord>> {
        let _guard = self.lock();
        let lock_file = self.open_lock_file()?;
        lock_file.lock_shared()?;

        let result = self.read_unlocked();
        lock_file.unlock()?;

        let records = result?;
        tracing::debug!("Read {} records from {:?}", records.len(), self.path);
        Ok(records)
    }

    fn append(&self, record: WorkoutRecord) -> Result<()> {
        let _guard = self.lock();
        let lock_file = self.open_lock_file()?;
        lock_file.lock_exclusive()?;

        let result = self.read_unlocked().and_then(|mut records| {
            records.push(record);
            self.write_unlocked(&records).map(|()| records.len())
        });
        lock_file.unlock()?;

        let count = result?;
        tracing::debug!("Appended workout; log now holds {} records", count);
        Ok(())
    }

    fn replace_all(&self, records: &[WorkoutRecord]) -> Result<()> {
        let _guard = self.lock();
        let lock_file = self.open_lock_file()?;
        lock_file.lock_exclusive()?;

        let result = self.write_unlocked(records);
        lock_file.unlock()?;

        result?;
        tracing::debug!("Replaced workout log with {} records", records.len());
        Ok(())
    }
}

/// In-memory store, handy for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<WorkoutRecord>>,
}

impl MemoryStore {
    pub fn new(records: Vec<WorkoutRecord>) -> Self {
        Self {
            records: Mutex::new(records),
        }
    }

    fn records(&self) -> Result<MutexGuard<'_, Vec<WorkoutRecord>>> {
        self.records
            .lock()
            .map_err(|_| Error::Store("memory store lock poisoned".into()))
    }
}

impl WorkoutStore for MemoryStore {
    fn get_all(&self) -> Result<Vec<WorkoutRecord>> {
        Ok(self.records()?.clone())
    }

    fn append(&self, record: WorkoutRecord) -> Result<()> {
        self.records()?.push(record);
        Ok(())
    }

    fn replace_all(&self, records: &[WorkoutRecord]) -> Result<()> {
        *self.records()? = records.to_vec();
        Ok(())
    }
}
