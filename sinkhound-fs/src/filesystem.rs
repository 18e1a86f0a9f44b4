//! Filesystem trait with real and mock implementations.
//!
//! The policy publisher needs atomic replacement (write to a temp file in
//! the destination directory, then rename over the target) so concurrent
//! readers of the policy path never observe a partial file. The telemetry
//! ingestor needs to read from a byte offset and to detect log rotation by
//! a change of file identity.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors from filesystem operations.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("path error: {0}")]
    Path(String),
}

/// Trait for filesystem operations.
/// Abstracted so the daemon loop can be tested without touching disk.
pub trait Filesystem: Send + Sync {
    /// Replace `path` atomically with `data` (write to temp, then rename).
    /// The temp file lives next to the destination so the rename never
    /// crosses a filesystem boundary.
    fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<(), FsError>;

    /// Read entire file contents as a string.
    fn read_file(&self, path: &Path) -> Result<String, FsError>;

    /// Read file contents from `offset` to end of file.
    fn read_from(&self, path: &Path, offset: u64) -> Result<Vec<u8>, FsError>;

    /// Stable identity of the file at `path` (inode number). A changed
    /// identity at the same path means the file was rotated or recreated.
    fn file_id(&self, path: &Path) -> Result<u64, FsError>;

    /// Check if a path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Create directory and parents if needed.
    fn create_dir_all(&self, path: &Path) -> Result<(), FsError>;
}

/// Real filesystem implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct RealFilesystem;

impl Filesystem for RealFilesystem {
    fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<(), FsError> {
        let temp_path = path.with_extension("tmp");

        fs::write(&temp_path, data)?;

        // Rename over the destination (atomic on POSIX filesystems)
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    fn read_file(&self, path: &Path) -> Result<String, FsError> {
        Ok(fs::read_to_string(path)?)
    }

    fn read_from(&self, path: &Path, offset: u64) -> Result<Vec<u8>, FsError> {
        let mut file = fs::File::open(path)?;
        file.seek(SeekFrom::Start(offset))?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        Ok(data)
    }

    fn file_id(&self, path: &Path) -> Result<u64, FsError> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::MetadataExt;
            Ok(fs::metadata(path)?.ino())
        }
        #[cfg(not(unix))]
        {
            Err(FsError::Path(format!(
                "file identity not supported on this platform: {}",
                path.display()
            )))
        }
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), FsError> {
        fs::create_dir_all(path)?;
        Ok(())
    }
}

#[derive(Debug, Clone)]
struct MockFile {
    data: Vec<u8>,
    id: u64,
}

/// Mock filesystem for testing.
/// Cloning creates a new handle to the same underlying data.
#[derive(Debug, Clone, Default)]
pub struct MockFilesystem {
    files: std::sync::Arc<std::sync::RwLock<HashMap<PathBuf, MockFile>>>,
    dirs: std::sync::Arc<std::sync::RwLock<std::collections::HashSet<PathBuf>>>,
    next_id: std::sync::Arc<std::sync::atomic::AtomicU64>,
}

impl MockFilesystem {
    pub fn new() -> Self {
        Self::default()
    }

    fn fresh_id(&self) -> u64 {
        self.next_id
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst)
            + 1
    }

    /// Get content of a specific file.
    pub fn get_file(&self, path: &Path) -> Option<Vec<u8>> {
        self.files
            .read()
            .unwrap()
            .get(path)
            .map(|f| f.data.clone())
    }

    /// Create or replace a file. A replaced file gets a new identity,
    /// which is how tests simulate log rotation.
    pub fn add_file(&self, path: PathBuf, data: Vec<u8>) {
        let id = self.fresh_id();
        self.files.write().unwrap().insert(path, MockFile { data, id });
    }

    /// Append to a file without changing its identity, which is how tests
    /// simulate the sensor appending telemetry between cycles.
    pub fn append_file(&self, path: &Path, data: &[u8]) {
        let mut files = self.files.write().unwrap();
        match files.get_mut(path) {
            Some(file) => file.data.extend_from_slice(data),
            None => {
                let id = self.fresh_id();
                files.insert(
                    path.to_path_buf(),
                    MockFile {
                        data: data.to_vec(),
                        id,
                    },
                );
            }
        }
    }
}

impl Filesystem for MockFilesystem {
    fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<(), FsError> {
        let id = self.fresh_id();
        self.files
            .write()
            .unwrap()
            .insert(path.to_path_buf(), MockFile { data: data.to_vec(), id });
        Ok(())
    }

    fn read_file(&self, path: &Path) -> Result<String, FsError> {
        let files = self.files.read().unwrap();
        match files.get(path) {
            Some(file) => String::from_utf8(file.data.clone())
                .map_err(|e| FsError::Path(format!("invalid utf8: {}", e))),
            None => Err(FsError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {}", path.display()),
            ))),
        }
    }

    fn read_from(&self, path: &Path, offset: u64) -> Result<Vec<u8>, FsError> {
        let files = self.files.read().unwrap();
        match files.get(path) {
            Some(file) => {
                let start = (offset as usize).min(file.data.len());
                Ok(file.data[start..].to_vec())
            }
            None => Err(FsError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {}", path.display()),
            ))),
        }
    }

    fn file_id(&self, path: &Path) -> Result<u64, FsError> {
        let files = self.files.read().unwrap();
        match files.get(path) {
            Some(file) => Ok(file.id),
            None => Err(FsError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {}", path.display()),
            ))),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.read().unwrap().contains_key(path)
            || self.dirs.read().unwrap().contains(path)
    }

    fn create_dir_all(&self, path: &Path) -> Result<(), FsError> {
        self.dirs.write().unwrap().insert(path.to_path_buf());
        Ok(())
    }
}
