//! Source path → output path mapping.

use super::options::PackageOptions;
use esmpack_util::path::{from_slash, normalize, to_slash};
use std::path::{Component, Path, PathBuf};

/// Computes where each source file is written.
///
/// Files under the source directory keep their layout below the destination
/// directory. Anything else (third-party packages, alias targets) keeps its
/// layout relative to the repository root, shortened by the simplification
/// rules.
#[derive(Debug, Clone)]
pub struct DestinationMapper {
    root: PathBuf,
    source_dir: PathBuf,
    destination_dir: PathBuf,
    rules: Vec<(String, String)>,
}

impl DestinationMapper {
    /// Build a mapper from normalized options.
    #[must_use]
    pub fn new(options: &PackageOptions) -> Self {
        Self {
            root: options.root.clone(),
            source_dir: options.source_dir(),
            destination_dir: options.destination_dir(),
            rules: options
                .dest_folder_simplification
                .iter()
                .map(|(pattern, replacement)| (pattern.clone(), replacement.clone()))
                .collect(),
        }
    }

    #[must_use]
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    #[must_use]
    pub fn destination_dir(&self) -> &Path {
        &self.destination_dir
    }

    /// Output path for an absolute source path.
    #[must_use]
    pub fn destination(&self, source: &Path) -> PathBuf {
        if let Ok(relative) = source.strip_prefix(&self.source_dir) {
            return normalize(&self.destination_dir.join(relative));
        }

        let relative = match pathdiff::diff_paths(source, &self.root) {
            Some(relative) if !escapes(&relative) => relative,
            // Outside the root: keep the absolute layout below the destination
            _ => source
                .components()
                .filter(|c| matches!(c, Component::Normal(_)))
                .collect(),
        };
        normalize(&self.destination_dir.join(self.simplify(&relative)))
    }

    /// Apply the simplification rules to a root-relative path.
    ///
    /// The result is always relative and never climbs above its base.
    fn simplify(&self, relative: &Path) -> PathBuf {
        if self.rules.is_empty() {
            return relative.to_path_buf();
        }

        let mut s = to_slash(relative);
        for (pattern, replacement) in &self.rules {
            while s.contains(pattern.as_str()) {
                s = s.replace(pattern.as_str(), replacement);
            }
        }
        normalize(&from_slash(&s))
            .components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .collect()
    }
}

fn escapes(relative: &Path) -> bool {
    relative.is_absolute() || matches!(relative.components().next(), Some(Component::ParentDir))
}
