//! Script documents held by the workspace

use std::path::{Path, PathBuf};

use tower_lsp::lsp_types::Url;

use crate::parser::traits::{ParseError, Parser};
use crate::parser::types::{Inclusion, SymbolTable};
use crate::symbols::position::{ScriptPosition, ScriptRegion};
use crate::workspace::paths::{canonical_uri, resolve_script_path};

/// A text edit in script coordinates. `region: None` replaces the whole text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentChange {
    pub region: Option<ScriptRegion>,
    pub text: String,
}

/// Immutable snapshot of a script and its parsed symbols.
/// Edits produce a new snapshot, so readers never observe a half-applied change.
#[derive(Debug, Clone)]
pub struct ScriptFile {
    uri: Url,
    path: Option<PathBuf>,
    version: i32,
    text: String,
    symbols: SymbolTable,
}

impl ScriptFile {
    pub fn new(uri: &Url, text: String, version: i32, parser: &dyn Parser) -> Result<Self, ParseError> {
        let uri = canonical_uri(uri);
        let path = if uri.scheme() == "file" {
            uri.to_file_path().ok()
        } else {
            None
        };
        let symbols = parser.parse(&text)?;

        Ok(Self {
            uri,
            path,
            version,
            text,
            symbols,
        })
    }

    pub fn uri(&self) -> &Url {
        &self.uri
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// Applies edits in order and re-parses the result
    pub fn with_changes(
        &self,
        changes: &[DocumentChange],
        version: i32,
        parser: &dyn Parser,
    ) -> Result<Self, ParseError> {
        let mut text = self.text.clone();
        for change in changes {
            match change.region {
                Some(region) => {
                    let start = offset_at(&text, region.start);
                    let end = offset_at(&text, region.end).max(start);
                    text.replace_range(start..end, &change.text);
                }
                None => text.clone_from(&change.text),
            }
        }
        Self::new(&self.uri, text, version, parser)
    }

    /// URI of the script a dot-sourcing directive refers to, if it can be
    /// determined statically
    pub fn resolve_inclusion(&self, inclusion: &Inclusion) -> Option<Url> {
        let base_dir = self.path.as_deref()?.parent()?;
        let path = resolve_script_path(base_dir, &inclusion.path)?;
        Url::from_file_path(path).ok()
    }
}

/// Byte offset of a script position. Columns are UTF-16 units; positions
/// past the end of a line clamp to the line end.
fn offset_at(text: &str, position: ScriptPosition) -> usize {
    let mut line_start = 0;
    for _ in 1..position.line {
        match text[line_start..].find('\n') {
            Some(index) => line_start += index + 1,
            None => return text.len(),
        }
    }

    let mut units = 1;
    for (index, c) in text[line_start..].char_indices() {
        if units >= position.column || c == '\n' {
            return line_start + index;
        }
        units += c.len_utf16() as u32;
    }
    text.len()
}
