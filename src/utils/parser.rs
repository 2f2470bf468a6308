//! Text and path primitives shared by the project file tools.
//!
//! Project files are handled as raw bytes, so the line helpers here work on
//! `&[u8]` rather than `&str`.

use std::path::{Component, Path, PathBuf};

/// Split a line into (content, terminator), where the terminator is
/// `\r\n`, `\n`, or empty for a final unterminated line.
pub fn split_terminator(line: &[u8]) -> (&[u8], &[u8]) {
    if line.ends_with(b"\r\n") {
        line.split_at(line.len() - 2)
    } else if line.ends_with(b"\n") {
        line.split_at(line.len() - 1)
    } else {
        (line, &[])
    }
}

/// Leading spaces and tabs of a line.
pub fn leading_whitespace(line: &[u8]) -> &[u8] {
    let end = line
        .iter()
        .position(|b| *b != b' ' && *b != b'\t')
        .unwrap_or(line.len());
    &line[..end]
}

/// Convert Windows-style separators so references resolve on any host.
pub fn to_portable_separators(reference: &str) -> String {
    reference.replace('\\', "/")
}

/// Lexically normalize a path: drop `.` segments and fold `..` into the
/// preceding segment. Does not touch the filesystem.
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(
                    out.components().next_back(),
                    Some(Component::Normal(_))
                );
                if can_pop {
                    out.pop();
                } else if !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }

    if out.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        out
    }
}

/// Resolve a (possibly backslash-separated) reference relative to the
/// directory of the file that contains it.
pub fn resolve_reference(referencing_file: &Path, reference: &str) -> PathBuf {
    let reference = PathBuf::from(to_portable_separators(reference));
    if reference.is_absolute() {
        return normalize_path(&reference);
    }

    let base = referencing_file.parent().unwrap_or_else(|| Path::new(""));
    normalize_path(&base.join(reference))
}
