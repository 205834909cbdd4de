use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The filesystem primitives the packaging engine needs.
///
/// Kept deliberately narrow so a run can be driven against an in-memory
/// tree in tests.
pub trait FileSystem {
    /// Read a whole file as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Replace the contents of a file, creating it if needed.
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;

    /// Create a single directory level. The parent must already exist.
    fn create_dir(&self, path: &Path) -> io::Result<()>;

    /// Whether anything exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Whether `path` is an existing directory.
    fn is_dir(&self, path: &Path) -> bool;
}

/// [`FileSystem`] backed by `std::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsFs;

impl FileSystem for OsFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        replace_file(path, contents.as_bytes())
    }

    fn create_dir(&self, path: &Path) -> io::Result<()> {
        fs::create_dir(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}

/// Replace `path` with `bytes` through a sibling staging file and a rename.
///
/// Readers see the previous contents or the new ones, never a truncated
/// module. Not fsynced.
pub fn replace_file(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let staging = staging_path(path);
    fs::write(&staging, bytes)?;
    fs::rename(&staging, path).map_err(|e| {
        let _ = fs::remove_file(&staging);
        e
    })
}

/// `<dir>/.<name>.esmpack-<pid>`, on the same filesystem as `path`.
fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map_or_else(|| "module".into(), |n| n.to_string_lossy());
    let dir = path.parent().unwrap_or(Path::new("."));
    dir.join(format!(".{name}.esmpack-{}", std::process::id()))
}
