use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use reader_core::FeedError;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("cache directory missing or not writable: {0}")]
    OutputDir(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl From<PersistError> for FeedError {
    fn from(err: PersistError) -> Self {
        FeedError::Cache(err.to_string())
    }
}

/// Key-value substrate holding the serialized cache as a single blob.
pub trait Persistence: Send + Sync {
    fn read_raw(&self) -> Result<Option<String>, PersistError>;
    fn write_raw(&self, raw: &str) -> Result<(), PersistError>;
}

/// Ensure the directory exists; create if missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
        if !meta.is_dir() {
            return Err(PersistError::OutputDir("path is not a directory".into()));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| PersistError::OutputDir(e.to_string()))?;
    }
    Ok(())
}

/// Atomically write content to `{dir}/{filename}` by writing a temp file then renaming.
#[derive(Debug, Clone)]
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn write(&self, filename: &str, content: &str) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;

        let target = self.dir.join(filename);
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;
        tmp.as_file_mut().sync_all()?;

        // Rename over the old file so readers never see a partial write.
        tmp.persist(&target).map_err(|e| PersistError::Io(e.error))?;
        Ok(target)
    }
}

/// Single-file persistence; a missing file reads as "nothing stored".
#[derive(Debug, Clone)]
pub struct FilePersistence {
    writer: AtomicFileWriter,
    filename: String,
}

impl FilePersistence {
    pub fn new(dir: PathBuf, filename: impl Into<String>) -> Self {
        Self {
            writer: AtomicFileWriter::new(dir),
            filename: filename.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.writer.dir().join(&self.filename)
    }
}

impl Persistence for FilePersistence {
    fn read_raw(&self) -> Result<Option<String>, PersistError> {
        match fs::read_to_string(self.path()) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn write_raw(&self, raw: &str) -> Result<(), PersistError> {
        self.writer.write(&self.filename, raw).map(|_| ())
    }
}

/// In-process persistence, for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryPersistence {
    raw: Mutex<Option<String>>,
}

impl MemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(raw.into())),
        }
    }

    /// Last written blob.
    pub fn snapshot(&self) -> Option<String> {
        self.raw.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl Persistence for MemoryPersistence {
    fn read_raw(&self) -> Result<Option<String>, PersistError> {
        Ok(self.snapshot())
    }

    fn write_raw(&self, raw: &str) -> Result<(), PersistError> {
        *self.raw.lock().unwrap_or_else(PoisonError::into_inner) = Some(raw.to_string());
        Ok(())
    }
}
