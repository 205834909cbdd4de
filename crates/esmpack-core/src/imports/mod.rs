//! Import discovery for JavaScript files.
//!
//! The packaging engine only sees the [`ImportScanner`] trait; [`StaticScanner`]
//! is the lexical implementation used by default.

mod scan;

pub use scan::{ImportKind, ImportReference, StaticScanner};

/// Extracts import specifiers and their spans from module source text.
pub trait ImportScanner {
    /// Every import reference in `source`, in source order.
    fn scan(&self, source: &str) -> Vec<ImportReference>;
}

impl ImportScanner for StaticScanner {
    fn scan(&self, source: &str) -> Vec<ImportReference> {
        scan::scan_imports(source)
    }
}
