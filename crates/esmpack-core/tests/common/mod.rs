//! Shared test helpers.

#![allow(dead_code)]

use esmpack_util::FileSystem;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::io;
use std::path::{Path, PathBuf};

/// In-memory filesystem that records every operation.
#[derive(Debug)]
pub struct MemoryFs {
    files: RefCell<BTreeMap<PathBuf, String>>,
    dirs: RefCell<BTreeSet<PathBuf>>,
    reads: RefCell<Vec<PathBuf>>,
    writes: RefCell<Vec<PathBuf>>,
    create_dir_calls: RefCell<Vec<PathBuf>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        let mut dirs = BTreeSet::new();
        dirs.insert(PathBuf::from("/"));
        Self {
            files: RefCell::new(BTreeMap::new()),
            dirs: RefCell::new(dirs),
            reads: RefCell::new(Vec::new()),
            writes: RefCell::new(Vec::new()),
            create_dir_calls: RefCell::new(Vec::new()),
        }
    }

    /// Seed a file, creating its ancestors. Not recorded as a write.
    pub fn with_file(self, path: &str, contents: &str) -> Self {
        let path = PathBuf::from(path);
        {
            let mut dirs = self.dirs.borrow_mut();
            for ancestor in path.ancestors().skip(1) {
                dirs.insert(ancestor.to_path_buf());
            }
        }
        self.files.borrow_mut().insert(path, contents.to_string());
        self
    }

    pub fn file(&self, path: &str) -> Option<String> {
        self.files.borrow().get(Path::new(path)).cloned()
    }

    pub fn reads(&self) -> Vec<PathBuf> {
        self.reads.borrow().clone()
    }

    pub fn writes(&self) -> Vec<PathBuf> {
        self.writes.borrow().clone()
    }

    pub fn create_dir_calls(&self) -> Vec<PathBuf> {
        self.create_dir_calls.borrow().clone()
    }

    pub fn read_count(&self, path: &str) -> usize {
        self.reads
            .borrow()
            .iter()
            .filter(|p| p.as_path() == Path::new(path))
            .count()
    }
}

impl FileSystem for MemoryFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.reads.borrow_mut().push(path.to_path_buf());
        self.files
            .borrow()
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.display().to_string()))
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        let parent = path.parent().unwrap_or(Path::new("/"));
        if !self.dirs.borrow().contains(parent) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no parent directory for {}", path.display()),
            ));
        }
        self.writes.borrow_mut().push(path.to_path_buf());
        self.files
            .borrow_mut()
            .insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        self.create_dir_calls.borrow_mut().push(path.to_path_buf());
        if self.exists(path) {
            return Err(io::Error::new(io::ErrorKind::AlreadyExists, "exists"));
        }
        if let Some(parent) = path.parent() {
            if !self.dirs.borrow().contains(parent) {
                return Err(io::Error::new(io::ErrorKind::NotFound, "no parent"));
            }
        }
        self.dirs.borrow_mut().insert(path.to_path_buf());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.borrow().contains_key(path) || self.dirs.borrow().contains(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.borrow().contains(path)
    }
}

/// `package.json` with only a `module` field.
pub fn module_manifest(entry: &str) -> String {
    format!(r#"{{"name": "fixture", "module": "{entry}"}}"#)
}
