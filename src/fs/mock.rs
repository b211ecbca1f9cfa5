// src/fs/mock.rs

use super::FileSystem;
use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File(Vec<u8>),
    Dir,
}

/// In-memory filesystem for tests.
///
/// Directories must exist before files are written into them, as on a real
/// filesystem, so tests can tell whether the output directory was created.
/// `fail_writes` makes every subsequent `write` fail, to exercise the
/// write-error path.
#[derive(Debug, Clone)]
pub struct MockFileSystem {
    entries: Arc<Mutex<BTreeMap<PathBuf, MockEntry>>>,
    fail_writes: Arc<Mutex<Option<io::ErrorKind>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(PathBuf::from("."), MockEntry::Dir);
        entries.insert(PathBuf::from("/"), MockEntry::Dir);

        Self {
            entries: Arc::new(Mutex::new(entries)),
            fail_writes: Arc::new(Mutex::new(None)),
        }
    }

    pub fn fail_writes(&self, kind: io::ErrorKind) {
        *self.fail_writes.lock().unwrap() = Some(kind);
    }

    /// All file paths currently stored, sorted.
    pub fn files(&self) -> Vec<PathBuf> {
        self.lock()
            .iter()
            .filter(|(_, e)| matches!(e, MockEntry::File(_)))
            .map(|(p, _)| p.clone())
            .collect()
    }

    pub fn is_dir(&self, path: &Path) -> bool {
        matches!(self.lock().get(path), Some(MockEntry::Dir))
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<PathBuf, MockEntry>> {
        self.entries.lock().unwrap()
    }
}

impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

fn parent_of(path: &Path) -> Option<PathBuf> {
    path.parent().map(|parent| {
        if parent.as_os_str().is_empty() {
            PathBuf::from(".")
        } else {
            parent.to_path_buf()
        }
    })
}

fn ensure_dir_entry(entries: &mut BTreeMap<PathBuf, MockEntry>, path: &Path) {
    if entries.contains_key(path) {
        return;
    }
    entries.insert(path.to_path_buf(), MockEntry::Dir);
    if let Some(parent) = parent_of(path) {
        // Avoid infinite loop at root
        if parent != path {
            ensure_dir_entry(entries, &parent);
        }
    }
}

fn not_found(path: &Path) -> io::Error {
    io::Error::new(io::ErrorKind::NotFound, format!("not found: {path:?}"))
}

impl FileSystem for MockFileSystem {
    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        let mut entries = self.lock();
        if let Some(MockEntry::File(_)) = entries.get(path) {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("file exists: {path:?}"),
            ));
        }
        ensure_dir_entry(&mut entries, path);
        Ok(())
    }

    fn write(&self, path: &Path, contents: &[u8]) -> io::Result<()> {
        if let Some(kind) = *self.fail_writes.lock().unwrap() {
            return Err(io::Error::new(kind, "simulated write failure"));
        }
        let mut entries = self.lock();
        let parent = parent_of(path).unwrap_or_else(|| PathBuf::from("."));
        if !matches!(entries.get(&parent), Some(MockEntry::Dir)) {
            return Err(not_found(&parent));
        }
        entries.insert(path.to_path_buf(), MockEntry::File(contents.to_vec()));
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        let mut entries = self.lock();
        match entries.remove(from) {
            Some(entry @ MockEntry::File(_)) => {
                entries.insert(to.to_path_buf(), entry);
                Ok(())
            }
            Some(entry) => {
                entries.insert(from.to_path_buf(), entry);
                Err(io::Error::other(format!("not a file: {from:?}")))
            }
            None => Err(not_found(from)),
        }
    }

    fn remove_file(&self, path: &Path) -> io::Result<()> {
        let mut entries = self.lock();
        match entries.get(path) {
            Some(MockEntry::File(_)) => {
                entries.remove(path);
                Ok(())
            }
            Some(MockEntry::Dir) => Err(io::Error::other(format!("is a directory: {path:?}"))),
            None => Err(not_found(path)),
        }
    }

    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        match self.lock().get(path) {
            Some(MockEntry::File(content)) => Ok(content.clone()),
            Some(MockEntry::Dir) => Err(io::Error::other(format!("is a directory: {path:?}"))),
            None => Err(not_found(path)),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.lock().contains_key(path)
    }
}
