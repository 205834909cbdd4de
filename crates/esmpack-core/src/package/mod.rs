//! ESM packaging.
//!
//! Copies the modules reachable from a set of entry points into an output
//! tree, rewriting bare import specifiers into relative paths so the output
//! loads as plain ES modules.
//!
//! ## Usage
//!
//! ```ignore
//! use esmpack_core::package::{package_esm, PackageOptions};
//!
//! let options = PackageOptions::new("/repo", "out-build", "out-esm")
//!     .entry("vs/workbench/main.js")
//!     .skip("vscode")
//!     .simplify("node_modules/foo/dist", "foo");
//! let summary = package_esm(&options)?;
//! ```
//!
//! ## Pipeline
//!
//! 1. **Queue** - entry points seed a FIFO worklist
//! 2. **Scan** - each dequeued file's import spans are extracted
//! 3. **Resolve** - skip / relative / alias / `node_modules` entry
//! 4. **Rewrite** - bare specifiers become destination-relative paths
//! 5. **Write** - directories are materialized and the file is written

mod dest;
mod dirs;
mod options;
mod resolve;
mod rewrite;
mod session;

pub use dest::DestinationMapper;
pub use dirs::DirectorySet;
pub use options::{PackageOptions, DEFAULT_ENTRY_FIELD};
pub use resolve::{
    find_package_dir, is_relative_specifier, resolve_import, resolve_package_entry,
    ResolvedImport, JS_EXTENSION, NODE_MODULES, PACKAGE_JSON,
};
pub use rewrite::{relative_specifier, splice_specifier};
pub use session::{PackageSession, PackageSummary, PackagedFile};

use crate::error::Result;
use crate::imports::{ImportScanner, StaticScanner};
use esmpack_util::{FileSystem, OsFs};

/// Package the modules reachable from `options.entry_points`.
///
/// Uses the OS filesystem and the built-in import scanner.
pub fn package_esm(options: &PackageOptions) -> Result<PackageSummary> {
    package_esm_with(options, &OsFs, &StaticScanner)
}

/// [`package_esm`] with injectable filesystem and scanner.
pub fn package_esm_with<F, S>(options: &PackageOptions, fs: &F, scanner: &S) -> Result<PackageSummary>
where
    F: FileSystem + ?Sized,
    S: ImportScanner + ?Sized,
{
    PackageSession::new(options, fs, scanner)?.run()
}
