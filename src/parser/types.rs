//! Common types produced by script parsers

use crate::symbols::position::ScriptRegion;

/// Kind of a symbol occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SymbolKind {
    /// Function declaration or command invocation
    Function,
    /// Variable read or assignment
    Variable,
    /// Parameter declared in a `param` block or function signature
    Parameter,
}

/// Kinds that can name the same entity are grouped into one family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindFamily {
    Function,
    Variable,
}

impl SymbolKind {
    pub fn family(self) -> KindFamily {
        match self {
            SymbolKind::Function => KindFamily::Function,
            SymbolKind::Variable | SymbolKind::Parameter => KindFamily::Variable,
        }
    }
}

/// Identifies a function body within one script, by declaration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FunctionScopeId(pub u32);

/// Scope a symbol occurrence is bound in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolScope {
    /// Script (or global) scope, shared with every dot-sourced script
    Script,
    /// Local to one function body
    Function(FunctionScopeId),
}

/// A symbol occurrence found by a parser
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSymbol {
    /// Name without sigil or scope qualifier (e.g. `x` for `$script:x`)
    pub name: String,
    pub kind: SymbolKind,
    pub region: ScriptRegion,
    pub scope: SymbolScope,
    pub is_declaration: bool,
}

/// A dot-sourcing directive (e.g. `. $PSScriptRoot/lib.ps1`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Inclusion {
    /// Path text as written, without surrounding quotes
    pub path: String,
    pub region: ScriptRegion,
}

/// Everything the reference pipeline needs from a parsed script
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    /// Occurrences in ascending start position
    pub symbols: Vec<ParsedSymbol>,
    /// Dot-sourcing directives in source order
    pub inclusions: Vec<Inclusion>,
}
