//! Import specifier rewriting.
//!
//! Bare specifiers are replaced with paths relative to the importer's
//! destination, so the output tree resolves without `node_modules` lookup.

use super::resolve::JS_EXTENSION;
use crate::imports::ImportReference;
use esmpack_util::path::to_slash;
use std::path::Path;

/// Relative ESM specifier from `importer_dest` to `target_dest`.
///
/// Always starts with `./` or `../`, uses forward slashes, and drops a
/// trailing `.js`.
#[must_use]
pub fn relative_specifier(importer_dest: &Path, target_dest: &Path) -> String {
    let from_dir = importer_dest.parent().unwrap_or(Path::new(""));
    let relative = pathdiff::diff_paths(target_dest, from_dir)
        .unwrap_or_else(|| target_dest.to_path_buf());

    let mut specifier = to_slash(&relative);
    if !specifier.starts_with("./") && !specifier.starts_with("../") {
        specifier.insert_str(0, "./");
    }
    if let Some(stripped_len) = specifier.strip_suffix(JS_EXTENSION).map(str::len) {
        specifier.truncate(stripped_len);
    }
    specifier
}

/// Replace the quoted literal of `reference` in `text` with `specifier`,
/// keeping the original quote character.
///
/// Returns `false` (leaving `text` untouched) if the span does not fit the
/// text.
pub fn splice_specifier(text: &mut String, reference: &ImportReference, specifier: &str) -> bool {
    let ImportReference { start, end, .. } = *reference;
    if start > end
        || end > text.len()
        || !text.is_char_boundary(start)
        || !text.is_char_boundary(end)
    {
        return false;
    }

    let quote = reference.quote;
    text.replace_range(start..end, &format!("{quote}{specifier}{quote}"));
    true
}
