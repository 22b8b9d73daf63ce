//! Parser layer
//! - traits.rs: Parser trait definition
//! - types.rs: Common types (ParsedSymbol, SymbolTable, Inclusion)
//! - powershell.rs: PowerShell script tokenizer

pub mod powershell;
pub mod traits;
pub mod types;

pub use powershell::PowerShellParser;
pub use traits::{ParseError, Parser};
pub use types::{Inclusion, ParsedSymbol, SymbolKind, SymbolScope, SymbolTable};
