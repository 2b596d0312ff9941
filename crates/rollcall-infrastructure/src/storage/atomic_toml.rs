//! Atomic TOML file operations.
//!
//! Small preference files (the search mode, for one) must be fully written
//! before a setter returns and must never be observed half-written.

use fs2::FileExt;
use rollcall_core::RollcallError;
use serde::{Serialize, de::DeserializeOwned};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Errors that can occur during atomic TOML operations.
#[derive(Debug)]
pub enum AtomicTomlError {
    /// File I/O error.
    IoError(std::io::Error),
    /// TOML parse error.
    TomlError(toml::de::Error),
    /// TOML serialization error.
    TomlSerError(toml::ser::Error),
    /// File locking error.
    LockError(String),
}

impl std::fmt::Display for AtomicTomlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AtomicTomlError::IoError(e) => write!(f, "I/O error: {}", e),
            AtomicTomlError::TomlError(e) => write!(f, "TOML parse error: {}", e),
            AtomicTomlError::TomlSerError(e) => write!(f, "TOML serialization error: {}", e),
            AtomicTomlError::LockError(e) => write!(f, "Lock error: {}", e),
        }
    }
}

impl std::error::Error for AtomicTomlError {}

impl From<std::io::Error> for AtomicTomlError {
    fn from(e: std::io::Error) -> Self {
        AtomicTomlError::IoError(e)
    }
}

impl From<toml::de::Error> for AtomicTomlError {
    fn from(e: toml::de::Error) -> Self {
        AtomicTomlError::TomlError(e)
    }
}

impl From<toml::ser::Error> for AtomicTomlError {
    fn from(e: toml::ser::Error) -> Self {
        AtomicTomlError::TomlSerError(e)
    }
}

impl From<AtomicTomlError> for RollcallError {
    fn from(e: AtomicTomlError) -> Self {
        match e {
            AtomicTomlError::IoError(io) => io.into(),
            AtomicTomlError::TomlError(de) => de.into(),
            AtomicTomlError::TomlSerError(ser) => ser.into(),
            AtomicTomlError::LockError(msg) => RollcallError::io(msg),
        }
    }
}

/// A handle to a TOML file that is only ever replaced whole.
///
/// - Writes go to a temporary sibling, are fsynced, then renamed over the target
/// - Read-modify-write cycles hold an exclusive lock on a `.lock` sibling
pub struct AtomicTomlFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> AtomicTomlFile<T>
where
    T: Serialize + DeserializeOwned,
{
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads and deserializes the file.
    ///
    /// - `Ok(None)`: file doesn't exist or is empty
    /// - `Err`: failed to read or parse the file
    pub fn load(&self) -> Result<Option<T>, AtomicTomlError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        let data: T = toml::from_str(&content)?;
        Ok(Some(data))
    }

    /// Writes `data` via temp file + fsync + rename.
    ///
    /// Each call writes its own uniquely named temp file in the target's
    /// directory, so concurrent saves never rename each other's file away.
    pub fn save(&self, data: &T) -> Result<(), AtomicTomlError> {
        let parent = self.parent_dir()?;
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(data)?;

        let mut tmp_file = NamedTempFile::new_in(parent)?;
        tmp_file.write_all(toml_string.as_bytes())?;
        tmp_file.as_file().sync_all()?;
        tmp_file.persist(&self.path).map_err(|e| e.error)?;

        Ok(())
    }

    /// Load, modify, save under an exclusive lock.
    ///
    /// `default_value` is used when the file doesn't exist yet.
    pub fn update<F>(&self, default_value: T, f: F) -> Result<(), AtomicTomlError>
    where
        F: FnOnce(&mut T),
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut data = self.load()?.unwrap_or(default_value);
        f(&mut data);
        self.save(&data)
    }

    fn parent_dir(&self) -> Result<&Path, AtomicTomlError> {
        self.path.parent().ok_or_else(|| {
            AtomicTomlError::IoError(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Path has no parent directory",
            ))
        })
    }
}

/// Exclusive lock guard; released when dropped.
///
/// The `.lock` file itself is never removed: every writer must lock the same
/// inode, or a waiter and a newcomer could both hold "the" lock.
struct FileLock {
    file: File,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self, AtomicTomlError> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        file.lock_exclusive()
            .map_err(|e| AtomicTomlError::LockError(format!("Failed to acquire lock: {}", e)))?;

        Ok(FileLock { file })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = FileExt::unlock(&self.file);
    }
}
