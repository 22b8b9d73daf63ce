use thiserror::Error;
use tower_lsp::lsp_types::Url;

use crate::parser::traits::ParseError;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("Document not found: {0}")]
    DocumentNotFound(Url),

    #[error("Failed to read {uri}: {source}")]
    Io {
        uri: Url,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {uri}: {source}")]
    Parse {
        uri: Url,
        #[source]
        source: ParseError,
    },

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
