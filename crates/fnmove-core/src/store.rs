//! File store port used by the commit protocol.
//!
//! Commit never touches the filesystem directly; it reads and writes
//! through a [`FileStore`]. The default [`OsFileStore`] writes each file
//! via a temp file in the same directory followed by a rename, so a
//! crashed write never leaves a half-written file behind.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// Read/write access to the files touched by a commit.
pub trait FileStore {
    /// Read the full contents of `path`.
    fn read(&mut self, path: &Path) -> io::Result<Vec<u8>>;

    /// Replace the contents of `path` with `contents`.
    fn write(&mut self, path: &Path, contents: &[u8]) -> io::Result<()>;
}

/// The real filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsFileStore;

impl FileStore for OsFileStore {
    fn read(&mut self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn write(&mut self, path: &Path, contents: &[u8]) -> io::Result<()> {
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut tmp = NamedTempFile::new_in(&parent)?;
        tmp.write_all(contents)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;
        Ok(())
    }
}

/// In-memory store with optional write fault injection.
///
/// Write attempts are counted from 1. With `fail_on_write(k)`, the k-th
/// attempt fails without changing anything; every other write succeeds,
/// including the ones rollback issues afterwards.
#[derive(Debug, Default, Clone)]
pub struct MemoryFileStore {
    files: BTreeMap<PathBuf, Vec<u8>>,
    fail_on: Option<usize>,
    attempts: usize,
    log: Vec<PathBuf>,
}

impl MemoryFileStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file.
    pub fn insert(&mut self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), contents.into());
    }

    /// Fail the k-th write attempt (1-based).
    pub fn fail_on_write(mut self, k: usize) -> Self {
        self.fail_on = Some(k);
        self
    }

    /// Current contents of `path`, if present.
    pub fn get(&self, path: &Path) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    /// Paths of every write attempt, in order, including the failed one.
    pub fn write_log(&self) -> &[PathBuf] {
        &self.log
    }
}

impl FileStore for MemoryFileStore {
    fn read(&mut self, path: &Path) -> io::Result<Vec<u8>> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }

    fn write(&mut self, path: &Path, contents: &[u8]) -> io::Result<()> {
        self.attempts += 1;
        self.log.push(path.to_path_buf());
        if self.fail_on == Some(self.attempts) {
            return Err(io::Error::other(format!(
                "injected failure on write {}",
                self.attempts
            )));
        }
        self.files.insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }
}

/// Wraps another store and fails its k-th write attempt.
///
/// Used by integration tests to drive the real filesystem while forcing
/// a commit failure at a chosen point.
#[derive(Debug)]
pub struct FaultyFileStore<S> {
    inner: S,
    fail_on: usize,
    attempts: usize,
}

impl<S: FileStore> FaultyFileStore<S> {
    /// Fail the k-th write attempt (1-based) of `inner`.
    pub fn new(inner: S, fail_on: usize) -> Self {
        FaultyFileStore {
            inner,
            fail_on,
            attempts: 0,
        }
    }

    /// Number of write attempts seen so far.
    pub fn attempts(&self) -> usize {
        self.attempts
    }
}

impl<S: FileStore> FileStore for FaultyFileStore<S> {
    fn read(&mut self, path: &Path) -> io::Result<Vec<u8>> {
        self.inner.read(path)
    }

    fn write(&mut self, path: &Path, contents: &[u8]) -> io::Result<()> {
        self.attempts += 1;
        if self.attempts == self.fail_on {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("injected failure writing {}", path.display()),
            ));
        }
        self.inner.write(path, contents)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    mod os_store {
        use super::*;

        #[test]
        fn write_replaces_contents() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("a.go");
            fs::write(&path, "old").unwrap();

            let mut store = OsFileStore;
            store.write(&path, b"new").unwrap();
            assert_eq!(store.read(&path).unwrap(), b"new");
        }

        #[test]
        fn write_leaves_no_temp_files() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("a.go");
            OsFileStore.write(&path, b"x").unwrap();

            let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
            assert_eq!(entries.len(), 1);
        }

        #[test]
        fn write_into_missing_directory_fails() {
            let dir = TempDir::new().unwrap();
            let path = dir.path().join("missing").join("a.go");
            assert!(OsFileStore.write(&path, b"x").is_err());
        }
    }

    mod memory_store {
        use super::*;

        #[test]
        fn fails_only_the_chosen_attempt() {
            let mut store = MemoryFileStore::new().fail_on_write(2);
            store.write(Path::new("a"), b"1").unwrap();
            assert!(store.write(Path::new("b"), b"2").is_err());
            store.write(Path::new("c"), b"3").unwrap();

            assert_eq!(store.get(Path::new("a")), Some(&b"1"[..]));
            assert_eq!(store.get(Path::new("b")), None);
            assert_eq!(store.write_log().len(), 3);
        }

        #[test]
        fn read_missing_is_not_found() {
            let mut store = MemoryFileStore::new();
            let err = store.read(Path::new("nope")).unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::NotFound);
        }
    }

    #[test]
    fn faulty_store_delegates_other_writes() {
        let mut inner = MemoryFileStore::new();
        inner.insert("a", "orig");
        let mut store = FaultyFileStore::new(inner, 1);
        assert!(store.write(Path::new("a"), b"new").is_err());
        store.write(Path::new("a"), b"newer").unwrap();
        assert_eq!(store.read(Path::new("a")).unwrap(), b"newer");
        assert_eq!(store.attempts(), 2);
    }
}
