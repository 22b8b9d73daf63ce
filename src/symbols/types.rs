//! Symbol occurrences as seen by the reference pipeline

use tower_lsp::lsp_types::Url;

use crate::parser::types::{ParsedSymbol, SymbolKind, SymbolScope};
use crate::symbols::position::ScriptRegion;

/// An occurrence of a symbol in a specific file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolReference {
    pub name: String,
    pub kind: SymbolKind,
    pub file_uri: Url,
    pub region: ScriptRegion,
    pub scope: SymbolScope,
    pub is_declaration: bool,
}

impl SymbolReference {
    pub fn from_parsed(symbol: &ParsedSymbol, file_uri: &Url) -> Self {
        Self {
            name: symbol.name.clone(),
            kind: symbol.kind,
            file_uri: file_uri.clone(),
            region: symbol.region,
            scope: symbol.scope,
            is_declaration: symbol.is_declaration,
        }
    }

    /// Returns true if `other` is this very occurrence
    pub fn is_same_occurrence(&self, other: &SymbolReference) -> bool {
        self.file_uri == other.file_uri && self.region == other.region
    }
}

/// Result of looking up the symbol under a position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SymbolLookup {
    Found(SymbolReference),
    NotFound,
}

impl SymbolLookup {
    pub fn found(self) -> Option<SymbolReference> {
        match self {
            SymbolLookup::Found(symbol) => Some(symbol),
            SymbolLookup::NotFound => None,
        }
    }
}
