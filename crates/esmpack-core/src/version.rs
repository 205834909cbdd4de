use git2::Repository;
use std::fmt::Write;
use std::path::Path;

/// The current version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Schema version of the CLI's JSON output.
/// Bump this when changing fields in a way that breaks consumers.
pub const SCHEMA_VERSION: u32 = 1;

/// Returns a formatted version string, with the commit of `repo` if known.
#[must_use]
pub fn version_string(repo: Option<&Path>) -> String {
    let mut s = format!("esmpack {VERSION}");

    if let Some(commit) = repo.and_then(git_commit) {
        let short = commit.get(..7).unwrap_or(&commit);
        let _ = write!(s, " ({short})");
    }

    s
}

/// The checked-out commit of the git repository containing `path`.
///
/// The repository is discovered upward from `path`, so subdirectories,
/// worktrees and submodules all work. Returns `None` outside a repository or
/// when `HEAD` has no commit yet.
#[must_use]
pub fn git_commit(path: &Path) -> Option<String> {
    let repo = Repository::discover(path).ok()?;
    let commit = repo.head().ok()?.peel_to_commit().ok()?;
    Some(commit.id().to_string())
}
