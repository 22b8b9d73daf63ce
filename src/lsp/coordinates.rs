//! Conversion between protocol coordinates (0-based line/character) and
//! script coordinates (1-based line/column).
//!
//! Every value crossing the protocol boundary goes through exactly one of
//! these functions.

use tower_lsp::lsp_types::{Position, Range};

use crate::symbols::position::{ScriptPosition, ScriptRegion};

pub fn to_internal(position: Position) -> ScriptPosition {
    ScriptPosition::new(position.line + 1, position.character + 1)
}

pub fn to_internal_range(range: Range) -> ScriptRegion {
    ScriptRegion::new(to_internal(range.start), to_internal(range.end))
}

pub fn to_protocol_position(position: ScriptPosition) -> Position {
    Position {
        line: position.line.saturating_sub(1),
        character: position.column.saturating_sub(1),
    }
}

pub fn to_protocol_range(region: ScriptRegion) -> Range {
    Range {
        start: to_protocol_position(region.start),
        end: to_protocol_position(region.end),
    }
}
