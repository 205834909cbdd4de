//! Import specifier scanner.
//!
//! Scans JavaScript source for ESM import/export specifiers without full
//! parsing. Offsets are byte offsets into the scanned text.

/// Syntactic form an import was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportKind {
    /// `import x from "s"` or `import "s"`.
    Static,
    /// `import("s")` with a string literal argument.
    Dynamic,
    /// `export ... from "s"`.
    ExportFrom,
}

/// One import specifier occurrence in a source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportReference {
    /// Specifier text, without quotes.
    pub specifier: String,
    /// Offset of the opening quote.
    pub start: usize,
    /// Offset one past the closing quote.
    pub end: usize,
    /// Delimiting quote character.
    pub quote: char,
    pub kind: ImportKind,
}

/// Lexical scanner for ESM imports.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticScanner;

/// Upper bound on how far a statement head is searched for its `from` clause.
const MAX_STATEMENT_SCAN: usize = 1000;

/// Scan source code for import specifiers.
///
/// Returns every occurrence in source order. Repeated specifiers are reported
/// once per occurrence since each span is rewritten independently.
#[must_use]
pub fn scan_imports(source: &str) -> Vec<ImportReference> {
    let bytes = source.as_bytes();
    let len = bytes.len();
    let mut results = Vec::new();
    let mut i = 0;

    while i < len {
        if let Some(end) = skip_comment(bytes, i) {
            i = end;
            continue;
        }

        if is_quote(bytes[i]) {
            i = skip_string(bytes, i);
            continue;
        }

        if matches_keyword(bytes, i, b"import") {
            if let Some(reference) = scan_import(source, i + 6) {
                i = reference.end;
                results.push(reference);
            } else {
                i += 6;
            }
            continue;
        }

        if matches_keyword(bytes, i, b"export") {
            if let Some(reference) = scan_export_from(source, i + 6) {
                i = reference.end;
                results.push(reference);
            } else {
                i += 6;
            }
            continue;
        }

        i += 1;
    }

    results
}

fn is_quote(b: u8) -> bool {
    b == b'"' || b == b'\'' || b == b'`'
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

/// Check if bytes at position match a keyword (with word boundary).
fn matches_keyword(bytes: &[u8], pos: usize, keyword: &[u8]) -> bool {
    let end = pos + keyword.len();
    if end > bytes.len() || &bytes[pos..end] != keyword {
        return false;
    }

    if pos > 0 && (is_ident_byte(bytes[pos - 1]) || bytes[pos - 1] == b'.') {
        return false;
    }

    !(end < bytes.len() && is_ident_byte(bytes[end]))
}

/// If a comment starts at `i`, return the offset just past it.
fn skip_comment(bytes: &[u8], i: usize) -> Option<usize> {
    let len = bytes.len();
    if i + 1 >= len || bytes[i] != b'/' {
        return None;
    }

    match bytes[i + 1] {
        b'/' => {
            let mut j = i + 2;
            while j < len && bytes[j] != b'\n' {
                j += 1;
            }
            Some(j)
        }
        b'*' => {
            let mut j = i + 2;
            while j + 1 < len && !(bytes[j] == b'*' && bytes[j + 1] == b'/') {
                j += 1;
            }
            Some((j + 2).min(len))
        }
        _ => None,
    }
}

/// Skip whitespace and comments.
fn skip_trivia(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() {
        if bytes[i].is_ascii_whitespace() {
            i += 1;
        } else if let Some(end) = skip_comment(bytes, i) {
            i = end;
        } else {
            break;
        }
    }
    i
}

/// Skip a string literal starting at `i`, returning the offset after it.
fn skip_string(bytes: &[u8], i: usize) -> usize {
    let len = bytes.len();
    let quote = bytes[i];
    let mut j = i + 1;

    while j < len && bytes[j] != quote {
        if bytes[j] == b'\\' {
            j += 2;
            continue;
        }
        if bytes[j] == b'\n' && quote != b'`' {
            return j;
        }
        j += 1;
    }

    (j + 1).min(len)
}

/// Read a complete, non-interpolated string literal starting at `i`.
fn read_literal(source: &str, i: usize, kind: ImportKind) -> Option<ImportReference> {
    let bytes = source.as_bytes();
    let len = bytes.len();
    if i >= len || !is_quote(bytes[i]) {
        return None;
    }

    let quote = bytes[i];
    let mut j = i + 1;
    while j < len && bytes[j] != quote {
        match bytes[j] {
            b'\\' => {
                j += 2;
                continue;
            }
            b'\n' if quote != b'`' => return None,
            b'$' if quote == b'`' && bytes.get(j + 1) == Some(&b'{') => return None,
            _ => {}
        }
        j += 1;
    }

    if j >= len {
        return None;
    }

    Some(ImportReference {
        specifier: source[i + 1..j].to_string(),
        start: i,
        end: j + 1,
        quote: char::from(quote),
        kind,
    })
}

/// Scan what follows an `import` keyword.
fn scan_import(source: &str, start: usize) -> Option<ImportReference> {
    let bytes = source.as_bytes();
    let len = bytes.len();
    let i = skip_trivia(bytes, start);
    if i >= len {
        return None;
    }

    match bytes[i] {
        // import.meta
        b'.' => None,
        b'(' => {
            let lit = read_literal(source, skip_trivia(bytes, i + 1), ImportKind::Dynamic)?;
            let after = skip_trivia(bytes, lit.end);
            match bytes.get(after) {
                Some(b')' | b',') => Some(lit),
                _ => None,
            }
        }
        b if is_quote(b) => read_literal(source, i, ImportKind::Static),
        _ => scan_from_clause(source, i, ImportKind::Static),
    }
}

/// Scan what follows an `export` keyword for a `from` clause.
fn scan_export_from(source: &str, start: usize) -> Option<ImportReference> {
    scan_from_clause(source, start, ImportKind::ExportFrom)
}

/// Walk a statement head looking for `from "<specifier>"`.
fn scan_from_clause(source: &str, start: usize, kind: ImportKind) -> Option<ImportReference> {
    let bytes = source.as_bytes();
    let limit = (start + MAX_STATEMENT_SCAN).min(bytes.len());
    let mut j = start;

    while j < limit {
        if let Some(end) = skip_comment(bytes, j) {
            j = end;
            continue;
        }

        match bytes[j] {
            // Not an import/export-from statement head
            b';' | b'(' | b')' | b'=' => return None,
            b if is_quote(b) => return None,
            _ => {}
        }

        if matches_keyword(bytes, j, b"from") {
            let k = skip_trivia(bytes, j + 4);
            if k < bytes.len() && is_quote(bytes[k]) {
                return read_literal(source, k, kind);
            }
            // `from` used as a binding name
            j += 4;
            continue;
        }

        j += 1;
    }

    None
}
