//! Lexical path helpers.
//!
//! None of these touch the filesystem: no symlink resolution, no
//! canonicalization.

use std::path::{Component, Path, PathBuf};

/// Lexically clean a path: drop `.` components and fold `..` into the
/// preceding component.
///
/// `..` at the root is dropped; a leading `..` on a relative path is kept.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut ret = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Prefix(..) | Component::RootDir => ret.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match ret.components().next_back() {
                Some(Component::Normal(_)) => {
                    ret.pop();
                }
                Some(Component::RootDir | Component::Prefix(..)) => {}
                _ => ret.push(".."),
            },
            Component::Normal(c) => ret.push(c),
        }
    }

    ret
}

/// Render a path with forward slashes regardless of platform.
#[must_use]
pub fn to_slash(path: &Path) -> String {
    let s = path.to_string_lossy();
    if std::path::MAIN_SEPARATOR == '/' {
        s.into_owned()
    } else {
        s.replace(std::path::MAIN_SEPARATOR, "/")
    }
}

/// Inverse of [`to_slash`]: turn a forward-slash string into a platform path.
#[must_use]
pub fn from_slash(s: &str) -> PathBuf {
    if std::path::MAIN_SEPARATOR == '/' {
        PathBuf::from(s)
    } else {
        PathBuf::from(s.replace('/', std::path::MAIN_SEPARATOR_STR))
    }
}

/// Strip trailing separators, keeping a bare root intact.
#[must_use]
pub fn trim_trailing_separators(path: &Path) -> PathBuf {
    let s = path.to_string_lossy();
    let trimmed = s.trim_end_matches(['/', std::path::MAIN_SEPARATOR]);
    if trimmed.is_empty() {
        // "/" (or "//") stays a root
        return path.components().take(1).collect();
    }
    PathBuf::from(trimmed)
}
