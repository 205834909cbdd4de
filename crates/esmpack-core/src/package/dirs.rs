//! Destination directory creation.

use crate::error::{Error, Result};
use esmpack_util::FileSystem;
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Directories already created during one run.
///
/// A directory's ancestors are always created, and recorded, before the
/// directory itself.
#[derive(Debug, Default)]
pub struct DirectorySet {
    created: HashSet<PathBuf>,
}

impl DirectorySet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, dir: &Path) -> bool {
        self.created.contains(dir)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.created.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.created.is_empty()
    }

    /// Make sure `dir` exists, creating missing ancestors first.
    ///
    /// A directory that already exists is fine. Any other creation failure
    /// is an error unless the directory turns out to be present anyway.
    pub fn ensure<F: FileSystem + ?Sized>(&mut self, fs: &F, dir: &Path) -> Result<()> {
        if dir.as_os_str().is_empty() || self.created.contains(dir) {
            return Ok(());
        }

        if let Some(parent) = dir.parent() {
            self.ensure(fs, parent)?;
        }

        self.created.insert(dir.to_path_buf());
        match fs.create_dir(dir) {
            Ok(()) => {
                debug!(dir = %dir.display(), "created directory");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(()),
            Err(_) if fs.is_dir(dir) => Ok(()),
            Err(source) => Err(Error::CreateDir {
                path: dir.to_path_buf(),
                source,
            }),
        }
    }
}
