//! Symbol layer
//! - position.rs: 1-based script positions and regions
//! - types.rs: SymbolReference and lookup results
//! - resolver.rs: symbol under a position
//! - scanner.rs: occurrences of a symbol across scripts

pub mod position;
pub mod resolver;
pub mod scanner;
pub mod types;

pub use position::{ScriptPosition, ScriptRegion};
pub use resolver::find_symbol_at;
pub use scanner::ReferenceScanner;
pub use types::{SymbolLookup, SymbolReference};
