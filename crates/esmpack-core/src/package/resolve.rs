//! Import specifier resolution.
//!
//! Three kinds of specifier are handled:
//! - skipped: matches a skip prefix, never resolved
//! - relative: `./` or `../`, joined with the importer's directory plus `.js`
//! - bare: an alias entry, or the ESM entry of a `node_modules` package

use super::options::PackageOptions;
use crate::error::{Error, Result};
use esmpack_util::path::normalize;
use esmpack_util::FileSystem;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Conventional dependency directory name.
pub const NODE_MODULES: &str = "node_modules";

/// Package manifest file name.
pub const PACKAGE_JSON: &str = "package.json";

/// Extension of compiled modules. Relative specifiers omit it.
pub const JS_EXTENSION: &str = ".js";

/// Outcome of resolving one import specifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedImport {
    /// Matched a skip prefix; left alone.
    Skipped,
    /// Relative specifier. Enqueued, never rewritten.
    Relative(PathBuf),
    /// Alias or package entry. Enqueued and rewritten to a relative path.
    Bare(PathBuf),
}

impl ResolvedImport {
    /// Resolved source path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Skipped => None,
            Self::Relative(path) | Self::Bare(path) => Some(path),
        }
    }
}

/// Whether a specifier is relative (`./` or `../`).
#[must_use]
pub fn is_relative_specifier(specifier: &str) -> bool {
    specifier.starts_with("./") || specifier.starts_with("../")
}

/// Resolve `specifier` as written in `importer`.
///
/// `options` must already be normalized.
pub fn resolve_import<F: FileSystem + ?Sized>(
    fs: &F,
    options: &PackageOptions,
    specifier: &str,
    importer: &Path,
) -> Result<ResolvedImport> {
    if options.is_skipped(specifier) {
        return Ok(ResolvedImport::Skipped);
    }

    if is_relative_specifier(specifier) {
        let dir = importer.parent().unwrap_or(Path::new(""));
        let target = dir.join(format!("{specifier}{JS_EXTENSION}"));
        return Ok(ResolvedImport::Relative(normalize(&target)));
    }

    if let Some(target) = options.alias.get(specifier) {
        return Ok(ResolvedImport::Bare(target.clone()));
    }

    resolve_package_entry(fs, &options.root, &options.entry_field, specifier, importer)
        .map(ResolvedImport::Bare)
}

/// Find the installed directory of `package` closest to `importer`.
///
/// Walks from the importer's directory upward; the root is the last
/// directory tested.
pub fn find_package_dir<F: FileSystem + ?Sized>(
    fs: &F,
    root: &Path,
    package: &str,
    importer: &Path,
) -> Option<PathBuf> {
    let root_len = root.as_os_str().len();
    let mut current = importer.parent();

    while let Some(dir) = current {
        if dir.as_os_str().len() < root_len {
            break;
        }

        let candidate = dir.join(NODE_MODULES).join(package);
        if fs.exists(&candidate) {
            return Some(candidate);
        }

        current = dir.parent();
    }

    None
}

/// Resolve a package name to the file named by its manifest's entry field.
pub fn resolve_package_entry<F: FileSystem + ?Sized>(
    fs: &F,
    root: &Path,
    entry_field: &str,
    package: &str,
    importer: &Path,
) -> Result<PathBuf> {
    let pkg_dir =
        find_package_dir(fs, root, package, importer).ok_or_else(|| Error::ModuleNotFound {
            specifier: package.to_string(),
            importer: importer.to_path_buf(),
        })?;

    let manifest_path = pkg_dir.join(PACKAGE_JSON);
    if !fs.exists(&manifest_path) {
        return Err(Error::MissingManifest {
            path: manifest_path,
        });
    }

    let content = fs
        .read_to_string(&manifest_path)
        .map_err(|source| Error::Read {
            path: manifest_path.clone(),
            source,
        })?;
    let manifest: Value =
        serde_json::from_str(&content).map_err(|source| Error::InvalidManifest {
            path: manifest_path.clone(),
            source,
        })?;

    let Some(entry) = manifest.get(entry_field).and_then(Value::as_str) else {
        return Err(Error::MissingModuleField {
            path: manifest_path,
            field: entry_field.to_string(),
        });
    };

    let entry_path = normalize(&pkg_dir.join(entry));
    if !fs.exists(&entry_path) {
        return Err(Error::MissingFile { path: entry_path });
    }

    Ok(entry_path)
}
