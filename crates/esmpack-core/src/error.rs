use std::path::PathBuf;
use thiserror::Error;

/// Stable error codes for machine-readable output.
pub mod codes {
    pub const MODULE_NOT_FOUND: &str = "MODULE_NOT_FOUND";
    pub const MISSING_MANIFEST: &str = "MISSING_MANIFEST";
    pub const INVALID_MANIFEST: &str = "INVALID_MANIFEST";
    pub const MISSING_MODULE_FIELD: &str = "MISSING_MODULE_FIELD";
    pub const MISSING_FILE: &str = "MISSING_FILE";
    pub const READ_FAILED: &str = "READ_FAILED";
    pub const WRITE_FAILED: &str = "WRITE_FAILED";
    pub const CREATE_DIR_FAILED: &str = "CREATE_DIR_FAILED";
    pub const INVALID_IMPORT_SPAN: &str = "INVALID_IMPORT_SPAN";
    pub const INVALID_OPTIONS: &str = "INVALID_OPTIONS";
    pub const CONFIG_READ_FAILED: &str = "CONFIG_READ_FAILED";
    pub const CONFIG_PARSE_FAILED: &str = "CONFIG_PARSE_FAILED";
}

/// Core error type for esmpack operations.
///
/// Every variant aborts the packaging run it was raised in.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Cannot find module '{specifier}' imported from {}", .importer.display())]
    ModuleNotFound { specifier: String, importer: PathBuf },

    #[error("Missing package manifest: {}", .path.display())]
    MissingManifest { path: PathBuf },

    #[error("Invalid package manifest at {}: {source}", .path.display())]
    InvalidManifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Missing string field '{field}' in package manifest: {}", .path.display())]
    MissingModuleField { path: PathBuf, field: String },

    #[error("Missing file: {}", .path.display())]
    MissingFile { path: PathBuf },

    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Import span {start}..{end} does not fit the text of {}", .path.display())]
    InvalidImportSpan {
        path: PathBuf,
        start: usize,
        end: usize,
    },

    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Failed to read config at {}: {source}", .path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config at {}: {source}", .path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    #[must_use]
    pub fn invalid_options(msg: impl Into<String>) -> Self {
        Self::InvalidOptions(msg.into())
    }

    /// The stable code for this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ModuleNotFound { .. } => codes::MODULE_NOT_FOUND,
            Self::MissingManifest { .. } => codes::MISSING_MANIFEST,
            Self::InvalidManifest { .. } => codes::INVALID_MANIFEST,
            Self::MissingModuleField { .. } => codes::MISSING_MODULE_FIELD,
            Self::MissingFile { .. } => codes::MISSING_FILE,
            Self::Read { .. } => codes::READ_FAILED,
            Self::Write { .. } => codes::WRITE_FAILED,
            Self::CreateDir { .. } => codes::CREATE_DIR_FAILED,
            Self::InvalidImportSpan { .. } => codes::INVALID_IMPORT_SPAN,
            Self::InvalidOptions(_) => codes::INVALID_OPTIONS,
            Self::ConfigRead { .. } => codes::CONFIG_READ_FAILED,
            Self::ConfigParse { .. } => codes::CONFIG_PARSE_FAILED,
        }
    }
}

/// Result alias used across the core crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
