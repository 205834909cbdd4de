//! Packaging options.

use crate::error::{Error, Result};
use esmpack_util::path::{normalize, trim_trailing_separators};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Manifest field read when none is configured.
pub const DEFAULT_ENTRY_FIELD: &str = "module";

fn default_entry_field() -> String {
    DEFAULT_ENTRY_FIELD.to_string()
}

/// Everything one packaging run needs to know.
///
/// `src_folder` and `dest_folder` are relative to `root`; entry points are
/// relative to `src_folder`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageOptions {
    /// Repository root.
    pub root: PathBuf,
    /// Source subdirectory.
    pub src_folder: PathBuf,
    /// Destination subdirectory.
    pub dest_folder: PathBuf,
    /// Traversal roots, in the order they are enqueued.
    pub entry_points: Vec<String>,
    /// Exact specifier → file. Bypasses package resolution.
    #[serde(default)]
    pub alias: BTreeMap<String, PathBuf>,
    /// Specifier prefixes left untouched (host built-ins and the like).
    #[serde(default)]
    pub skip: Vec<String>,
    /// Literal substring → replacement, applied to third-party output paths.
    #[serde(default)]
    pub dest_folder_simplification: BTreeMap<String, String>,
    /// Manifest field naming a package's ESM entry file.
    #[serde(default = "default_entry_field")]
    pub entry_field: String,
}

impl PackageOptions {
    #[must_use]
    pub fn new(
        root: impl Into<PathBuf>,
        src_folder: impl Into<PathBuf>,
        dest_folder: impl Into<PathBuf>,
    ) -> Self {
        Self {
            root: root.into(),
            src_folder: src_folder.into(),
            dest_folder: dest_folder.into(),
            entry_points: Vec::new(),
            alias: BTreeMap::new(),
            skip: Vec::new(),
            dest_folder_simplification: BTreeMap::new(),
            entry_field: default_entry_field(),
        }
    }

    /// Add an entry point.
    #[must_use]
    pub fn entry(mut self, entry: impl Into<String>) -> Self {
        self.entry_points.push(entry.into());
        self
    }

    /// Map a specifier straight to a file.
    #[must_use]
    pub fn alias(mut self, specifier: impl Into<String>, target: impl Into<PathBuf>) -> Self {
        self.alias.insert(specifier.into(), target.into());
        self
    }

    /// Leave specifiers starting with `prefix` untouched.
    #[must_use]
    pub fn skip(mut self, prefix: impl Into<String>) -> Self {
        self.skip.push(prefix.into());
        self
    }

    /// Add a destination-folder simplification rule.
    #[must_use]
    pub fn simplify(mut self, pattern: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.dest_folder_simplification
            .insert(pattern.into(), replacement.into());
        self
    }

    /// Set the manifest entry field.
    #[must_use]
    pub fn entry_field(mut self, field: impl Into<String>) -> Self {
        self.entry_field = field.into();
        self
    }

    /// Resolve relative paths against `base` (the config file's directory).
    #[must_use]
    pub fn relative_to(mut self, base: &Path) -> Self {
        if self.root.is_relative() {
            self.root = base.join(&self.root);
        }
        for target in self.alias.values_mut() {
            if target.is_relative() {
                *target = base.join(&*target);
            }
        }
        self
    }

    /// Source directory (`root/src_folder`).
    #[must_use]
    pub fn source_dir(&self) -> PathBuf {
        normalize(&self.root.join(&self.src_folder))
    }

    /// Destination directory (`root/dest_folder`).
    #[must_use]
    pub fn destination_dir(&self) -> PathBuf {
        normalize(&self.root.join(&self.dest_folder))
    }

    /// Whether `specifier` is covered by the skip list.
    #[must_use]
    pub fn is_skipped(&self, specifier: &str) -> bool {
        self.skip.iter().any(|prefix| specifier.starts_with(prefix.as_str()))
    }

    /// Validate and return a normalized copy.
    ///
    /// The root loses trailing separators and is lexically cleaned; relative
    /// alias targets are anchored at the root.
    pub fn normalized(&self) -> Result<Self> {
        if self.root.as_os_str().is_empty() {
            return Err(Error::invalid_options("root must not be empty"));
        }
        if self.root.is_relative() {
            return Err(Error::invalid_options(format!(
                "root must be an absolute path, got {}",
                self.root.display()
            )));
        }
        if self.entry_points.is_empty() {
            return Err(Error::invalid_options("at least one entry point is required"));
        }
        if self.entry_field.is_empty() {
            return Err(Error::invalid_options("entry field must not be empty"));
        }
        for (pattern, replacement) in &self.dest_folder_simplification {
            if pattern.is_empty() {
                return Err(Error::invalid_options(
                    "simplification pattern must not be empty",
                ));
            }
            // Repeated replacement would never terminate
            if replacement.contains(pattern.as_str()) {
                return Err(Error::invalid_options(format!(
                    "simplification replacement '{replacement}' reintroduces pattern '{pattern}'"
                )));
            }
        }

        let mut options = self.clone();
        options.root = normalize(&trim_trailing_separators(&self.root));
        for target in options.alias.values_mut() {
            *target = normalize(&options.root.join(&*target));
        }
        Ok(options)
    }
}
