//! Finds every occurrence of a resolved symbol across a set of scripts

use std::sync::Arc;

use tracing::debug;

use crate::config::SymbolMatchPolicy;
use crate::parser::types::{ParsedSymbol, SymbolScope};
use crate::symbols::types::SymbolReference;
use crate::workspace::document::ScriptFile;

pub struct ReferenceScanner {
    policy: SymbolMatchPolicy,
}

impl ReferenceScanner {
    pub fn new(policy: SymbolMatchPolicy) -> Self {
        Self { policy }
    }

    /// Returns every occurrence of `symbol` in `documents`, grouped by
    /// document in the given order and sorted by position within a document.
    pub fn find_references(
        &self,
        symbol: &SymbolReference,
        documents: &[Arc<ScriptFile>],
    ) -> Vec<SymbolReference> {
        let references = documents
            .iter()
            .flat_map(|document| self.references_in(symbol, document))
            .collect();
        self.finish(symbol, references)
    }

    /// Occurrences of `symbol` within one document, in ascending position
    pub fn references_in(
        &self,
        symbol: &SymbolReference,
        document: &ScriptFile,
    ) -> Vec<SymbolReference> {
        let mut references: Vec<SymbolReference> = document
            .symbols()
            .symbols
            .iter()
            .filter(|candidate| self.is_same_symbol(symbol, candidate, document))
            .map(|candidate| SymbolReference::from_parsed(candidate, document.uri()))
            .collect();
        references.sort_by_key(|reference| (reference.region.start, reference.region.end));
        references
    }

    /// A symbol whose only occurrence is the one under the cursor has no
    /// references.
    pub fn finish(
        &self,
        symbol: &SymbolReference,
        references: Vec<SymbolReference>,
    ) -> Vec<SymbolReference> {
        if references.iter().all(|r| r.is_same_occurrence(symbol)) {
            debug!("No references to '{}' beyond the symbol itself", symbol.name);
            return Vec::new();
        }
        debug!("Found {} references to '{}'", references.len(), symbol.name);
        references
    }

    fn is_same_symbol(
        &self,
        target: &SymbolReference,
        candidate: &ParsedSymbol,
        document: &ScriptFile,
    ) -> bool {
        if target.kind.family() != candidate.kind.family()
            || target.name.to_lowercase() != candidate.name.to_lowercase()
        {
            return false;
        }

        match self.policy {
            SymbolMatchPolicy::NameOnly => true,
            SymbolMatchPolicy::ScopeAware => match (target.scope, candidate.scope) {
                (SymbolScope::Script, SymbolScope::Script) => true,
                (SymbolScope::Function(a), SymbolScope::Function(b)) => {
                    a == b && target.file_uri == *document.uri()
                }
                _ => false,
            },
        }
    }
}

impl Default for ReferenceScanner {
    fn default() -> Self {
        Self::new(SymbolMatchPolicy::default())
    }
}
