//! Finds the symbol under a script position

use tracing::debug;

use crate::symbols::position::ScriptPosition;
use crate::symbols::types::{SymbolLookup, SymbolReference};
use crate::workspace::document::ScriptFile;

/// Returns the innermost symbol whose region contains `position`.
/// Positions on whitespace, comments or a token's end column resolve to
/// `SymbolLookup::NotFound`.
pub fn find_symbol_at(file: &ScriptFile, position: ScriptPosition) -> SymbolLookup {
    let found = file
        .symbols()
        .symbols
        .iter()
        .filter(|symbol| symbol.region.contains(position))
        .min_by_key(|symbol| symbol.region.specificity());

    match found {
        Some(symbol) => {
            debug!(
                "Found {:?} '{}' at {} in {}",
                symbol.kind,
                symbol.name,
                position,
                file.uri()
            );
            SymbolLookup::Found(SymbolReference::from_parsed(symbol, file.uri()))
        }
        None => {
            debug!("No symbol at {} in {}", position, file.uri());
            SymbolLookup::NotFound
        }
    }
}
