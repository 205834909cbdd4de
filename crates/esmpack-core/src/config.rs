//! Runtime configuration and config file loading.
//!
//! A project describes its packaging run in `esmpack.json`:
//!
//! ```json
//! {
//!   "root": ".",
//!   "srcFolder": "out-build",
//!   "destFolder": "out-esm",
//!   "entryPoints": ["vs/workbench/main.js"],
//!   "alias": { "lib": "vendor/lib.js" },
//!   "skip": ["vscode"],
//!   "destFolderSimplification": { "node_modules/foo/dist": "foo" }
//! }
//! ```
//!
//! Relative `root` and alias paths are anchored at the file's directory.

use crate::error::{Error, Result};
use crate::package::PackageOptions;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory.
pub const CONFIG_FILE: &str = "esmpack.json";

/// Runtime configuration for the esmpack CLI.
#[derive(Debug, Clone)]
pub struct Config {
    /// Current working directory.
    pub cwd: PathBuf,

    /// Whether to emit JSON logs.
    pub json_logs: bool,

    /// Verbosity level (0 = INFO, 1 = DEBUG, 2+ = TRACE).
    pub verbosity: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            json_logs: false,
            verbosity: 0,
        }
    }
}

impl Config {
    /// Create a new config with the given working directory.
    #[must_use]
    pub fn new(cwd: PathBuf) -> Self {
        Self {
            cwd,
            ..Default::default()
        }
    }

    /// Set verbosity level.
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set JSON log output.
    #[must_use]
    pub fn with_json_logs(mut self, json: bool) -> Self {
        self.json_logs = json;
        self
    }
}

/// Find `esmpack.json` in `dir`.
#[must_use]
pub fn find_config_file(dir: &Path) -> Option<PathBuf> {
    let path = dir.join(CONFIG_FILE);
    path.is_file().then_some(path)
}

/// Load packaging options from a JSON config file.
pub fn load_options(path: &Path) -> Result<PackageOptions> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    let options: PackageOptions =
        serde_json::from_str(&content).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;

    let base = path.parent().unwrap_or(Path::new("."));
    Ok(options.relative_to(base))
}
