#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::return_self_not_must_use)]

pub mod config;
pub mod error;
pub mod imports;
pub mod package;
pub mod version;

pub use config::Config;
pub use error::{Error, Result};
pub use imports::{ImportKind, ImportReference, ImportScanner, StaticScanner};
pub use package::{
    package_esm, package_esm_with, PackageOptions, PackageSession, PackageSummary, PackagedFile,
};
pub use version::VERSION;
