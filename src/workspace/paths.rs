//! Path and URI normalization for workspace documents

use std::path::{Component, MAIN_SEPARATOR, Path, PathBuf};
use std::sync::LazyLock;

use regex::{NoExpand, Regex};
use tower_lsp::lsp_types::Url;

/// File extensions treated as PowerShell scripts
pub const SCRIPT_EXTENSIONS: [&str; 3] = ["ps1", "psm1", "psd1"];

static SCRIPT_ROOT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\$\{?PSScriptRoot\}?").expect("PSScriptRoot pattern is valid")
});

/// Returns true if the path has a PowerShell script extension
pub fn is_script_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            SCRIPT_EXTENSIONS
                .iter()
                .any(|known| known.eq_ignore_ascii_case(ext))
        })
}

/// Removes `.` and `..` components without touching the filesystem
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            other => normalized.push(other),
        }
    }
    normalized
}

/// Canonical identity of a document: `file:` URIs are rebuilt from their
/// normalized path, anything else is kept as is.
pub fn canonical_uri(uri: &Url) -> Url {
    if uri.scheme() != "file" {
        return uri.clone();
    }
    uri.to_file_path()
        .ok()
        .and_then(|path| Url::from_file_path(normalize_path(&path)).ok())
        .unwrap_or_else(|| uri.clone())
}

/// Resolves the path of a dot-sourcing directive relative to the directory of
/// the including script. Returns None for paths built from other variables.
pub fn resolve_script_path(base_dir: &Path, raw: &str) -> Option<PathBuf> {
    let base = base_dir.to_string_lossy().into_owned();
    let expanded = SCRIPT_ROOT.replace_all(raw.trim(), NoExpand(&base));
    if expanded.is_empty() || expanded.contains('$') {
        return None;
    }

    let expanded = if MAIN_SEPARATOR == '/' {
        expanded.replace('\\', "/")
    } else {
        expanded.into_owned()
    };

    let path = Path::new(&expanded);
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    };
    Some(normalize_path(&joined))
}
