//! `esmpack package` command implementation.
//!
//! Builds [`PackageOptions`] from `esmpack.json` and command-line flags, runs
//! a packaging session and reports the files written.

use esmpack_core::config::{find_config_file, load_options};
use esmpack_core::version::SCHEMA_VERSION;
use esmpack_core::{package_esm, Error, PackageOptions, PackagedFile};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

/// Package command action.
#[derive(Debug, Clone, Default)]
pub struct PackageAction {
    /// Working directory. Relative paths on the command line resolve here.
    pub cwd: PathBuf,
    /// Explicit config file (otherwise `esmpack.json` in `cwd`, if present).
    pub config: Option<PathBuf>,
    pub root: Option<PathBuf>,
    pub src: Option<PathBuf>,
    pub dest: Option<PathBuf>,
    /// Entry points; replace the config file's list when non-empty.
    pub entries: Vec<String>,
    /// `specifier=path` pairs.
    pub aliases: Vec<String>,
    pub skip: Vec<String>,
    /// `pattern=replacement` pairs.
    pub simplify: Vec<String>,
    pub entry_field: Option<String>,
}

/// JSON output for the package command.
#[derive(Serialize)]
struct PackageResultJson {
    ok: bool,
    schema_version: u32,
    files: Vec<PackagedFile>,
    /// Output directories visited while writing.
    directories: usize,
    duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<PackageErrorJson>,
}

#[derive(Serialize)]
struct PackageErrorJson {
    code: String,
    message: String,
}

/// Run the package command.
pub fn run(action: PackageAction, json: bool) -> Result<()> {
    let start = Instant::now();

    let result = build_options(&action).and_then(|options| {
        info!(
            root = %options.root.display(),
            entries = options.entry_points.len(),
            "packaging"
        );
        let summary = package_esm(&options)?;
        Ok((options, summary))
    });

    let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

    match result {
        Ok((options, summary)) => {
            if json {
                let out = PackageResultJson {
                    ok: true,
                    schema_version: SCHEMA_VERSION,
                    files: summary.files,
                    directories: summary.directories,
                    duration_ms,
                    error: None,
                };
                println!("{}", serde_json::to_string(&out).into_diagnostic()?);
            } else {
                let rewritten: usize = summary.files.iter().map(|f| f.rewritten).sum();
                println!(
                    "  {} -> {} ({} files, {} directories, {} specifiers rewritten, {}ms)",
                    options.source_dir().display(),
                    options.destination_dir().display(),
                    summary.files.len(),
                    summary.directories,
                    rewritten,
                    duration_ms
                );
            }
            Ok(())
        }
        Err(e) => {
            if json {
                let out = PackageResultJson {
                    ok: false,
                    schema_version: SCHEMA_VERSION,
                    files: Vec::new(),
                    directories: 0,
                    duration_ms,
                    error: Some(PackageErrorJson {
                        code: e.code().to_string(),
                        message: e.to_string(),
                    }),
                };
                println!("{}", serde_json::to_string(&out).into_diagnostic()?);
                std::process::exit(1);
            }
            Err(e).into_diagnostic()
        }
    }
}

/// Merge the config file (if any) with command-line overrides.
pub fn build_options(action: &PackageAction) -> esmpack_core::Result<PackageOptions> {
    let cwd = dunce::canonicalize(&action.cwd).unwrap_or_else(|_| action.cwd.clone());

    let config_path = match &action.config {
        Some(path) => Some(absolute(&cwd, path)),
        None => find_config_file(&cwd),
    };

    let mut options = match config_path {
        Some(path) => load_options(&path)?,
        None => {
            let (Some(src), Some(dest)) = (&action.src, &action.dest) else {
                return Err(Error::invalid_options(
                    "no esmpack.json found; pass --src and --dest",
                ));
            };
            PackageOptions::new(cwd.clone(), src.clone(), dest.clone())
        }
    };

    if let Some(root) = &action.root {
        options.root = absolute(&cwd, root);
    }
    if let Some(src) = &action.src {
        options.src_folder.clone_from(src);
    }
    if let Some(dest) = &action.dest {
        options.dest_folder.clone_from(dest);
    }
    if !action.entries.is_empty() {
        options.entry_points.clone_from(&action.entries);
    }
    for alias in &action.aliases {
        let (specifier, target) = split_pair(alias, "--alias")?;
        options = options.alias(specifier, absolute(&cwd, Path::new(target)));
    }
    for prefix in &action.skip {
        options = options.skip(prefix.as_str());
    }
    for rule in &action.simplify {
        let (pattern, replacement) = split_pair(rule, "--simplify")?;
        options = options.simplify(pattern, replacement);
    }
    if let Some(field) = &action.entry_field {
        options = options.entry_field(field.as_str());
    }

    Ok(options)
}

fn split_pair<'s>(value: &'s str, flag: &str) -> esmpack_core::Result<(&'s str, &'s str)> {
    value
        .split_once('=')
        .map(|(key, value)| (key.trim(), value.trim()))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| Error::invalid_options(format!("{flag} expects KEY=VALUE, got '{value}'")))
}

fn absolute(cwd: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}
