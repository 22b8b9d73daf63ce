//! Parser trait definition

use thiserror::Error;

use crate::parser::types::SymbolTable;

/// Errors that can occur while parsing a script
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Tree-sitter error: {0}")]
    TreeSitter(String),

    #[error("Parse failed: {0}")]
    ParseFailed(String),

    #[error("Syntax error at {line}:{column}")]
    Syntax { line: u32, column: u32 },
}

/// Trait for extracting symbols and inclusion directives from script text
pub trait Parser: Send + Sync {
    fn parse(&self, content: &str) -> Result<SymbolTable, ParseError>;
}
