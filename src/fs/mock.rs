// src/fs/mock.rs

use super::FileSystem;
use anyhow::{anyhow, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub enum MockEntry {
    File(Vec<u8>),
    Dir(Vec<String>), // List of child names
}

/// In-memory filesystem for tests.
///
/// Clones share the same tree, so a test can keep a handle and inspect what
/// the code under test wrote.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
    read_only: Arc<AtomicBool>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        let mut files = HashMap::new();
        files.insert(PathBuf::from("."), MockEntry::Dir(Vec::new()));

        Self {
            files: Arc::new(Mutex::new(files)),
            read_only: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Make every subsequent `write` / `rename` fail.
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }

    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let path = path.as_ref().to_path_buf();
        let mut files = self.lock();
        files.insert(path.clone(), MockEntry::File(content.into()));
        Self::link_into_parent(&mut files, &path);
    }

    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut files = self.lock();
        Self::ensure_dir_entry(&mut files, path.as_ref());
    }

    /// Raw contents of a file, if present.
    pub fn contents(&self, path: impl AsRef<Path>) -> Option<String> {
        match self.lock().get(path.as_ref()) {
            Some(MockEntry::File(bytes)) => Some(String::from_utf8_lossy(bytes).into_owned()),
            _ => None,
        }
    }

    /// All file paths currently stored, sorted.
    pub fn file_paths(&self) -> Vec<PathBuf> {
        let mut paths: Vec<PathBuf> = self
            .lock()
            .iter()
            .filter(|(_, e)| matches!(e, MockEntry::File(_)))
            .map(|(p, _)| p.clone())
            .collect();
        paths.sort();
        paths
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, MockEntry>> {
        // A panic while holding the lock only happens in a failing test.
        self.files.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn parent_of(path: &Path) -> Option<&Path> {
        path.parent().map(|parent| {
            if parent.as_os_str().is_empty() {
                Path::new(".")
            } else {
                parent
            }
        })
    }

    fn link_into_parent(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        let Some(parent) = Self::parent_of(path) else {
            return;
        };
        if parent == path {
            return;
        }
        Self::ensure_dir_entry(files, parent);
        if let Some(MockEntry::Dir(children)) = files.get_mut(parent) {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                if !children.iter().any(|c| c == name) {
                    children.push(name.to_string());
                }
            }
        }
    }

    fn unlink_from_parent(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        let (Some(parent), Some(name)) = (
            Self::parent_of(path),
            path.file_name().and_then(|n| n.to_str()),
        ) else {
            return;
        };
        if let Some(MockEntry::Dir(children)) = files.get_mut(parent) {
            children.retain(|c| c != name);
        }
    }

    fn ensure_dir_entry(files: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        if files.contains_key(path) {
            return;
        }
        files.insert(path.to_path_buf(), MockEntry::Dir(Vec::new()));
        Self::link_into_parent(files, path);
    }

    fn check_writable(&self, path: &Path) -> Result<()> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(anyhow!("Read-only file system: {:?}", path));
        }
        Ok(())
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let files = self.lock();
        match files.get(path) {
            Some(MockEntry::File(content)) => {
                String::from_utf8(content.clone()).map_err(|e| anyhow!("Invalid UTF-8: {}", e))
            }
            Some(MockEntry::Dir(_)) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        self.check_writable(path)?;
        self.add_file(path, contents);
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        self.check_writable(to)?;
        let mut files = self.lock();
        let entry = files
            .remove(from)
            .ok_or_else(|| anyhow!("File not found: {:?}", from))?;
        Self::unlink_from_parent(&mut files, from);
        files.insert(to.to_path_buf(), entry);
        Self::link_into_parent(&mut files, to);
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        let mut files = self.lock();
        match files.get(path) {
            Some(MockEntry::File(_)) => {
                files.remove(path);
                Self::unlink_from_parent(&mut files, path);
                Ok(())
            }
            Some(MockEntry::Dir(_)) => Err(anyhow!("Is a directory: {:?}", path)),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.lock().contains_key(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        matches!(self.lock().get(path), Some(MockEntry::File(_)))
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.lock().get(path), Some(MockEntry::Dir(_)))
    }
}
