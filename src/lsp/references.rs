//! `textDocument/references` request handling

use std::sync::Arc;

use tower_lsp::jsonrpc;
use tower_lsp::lsp_types::{Location, ReferenceParams};
use tracing::debug;

use crate::config::ServerConfig;
use crate::lsp::coordinates::{to_internal, to_protocol_range};
use crate::symbols::resolver::find_symbol_at;
use crate::symbols::scanner::ReferenceScanner;
use crate::symbols::types::{SymbolLookup, SymbolReference};
use crate::workspace::error::WorkspaceError;
use crate::workspace::graph::expand_script_references;
use crate::workspace::service::WorkspaceService;

/// Resolves the symbol under the cursor and collects its references across
/// the dot-sourcing graph. Holds no per-request state.
///
/// Yields to the runtime between stages and between scanned scripts, so a
/// `$/cancelRequest` (which drops this future) stops the search there.
pub struct ReferencesHandler {
    workspace: Arc<WorkspaceService>,
    scanner: ReferenceScanner,
    include_referencing: bool,
}

impl ReferencesHandler {
    pub fn new(workspace: Arc<WorkspaceService>, config: &ServerConfig) -> Self {
        Self {
            workspace,
            scanner: ReferenceScanner::new(config.symbol_match_policy),
            include_referencing: config.include_referencing_documents,
        }
    }

    /// Declarations and usages are always returned together; the request's
    /// `includeDeclaration` flag is not consulted.
    pub async fn handle(&self, params: ReferenceParams) -> Result<Vec<Location>, WorkspaceError> {
        let document = &params.text_document_position;
        let file = self.workspace.get_file(&document.text_document.uri)?;
        let position = to_internal(document.position);

        let SymbolLookup::Found(symbol) = find_symbol_at(&file, position) else {
            return Ok(Vec::new());
        };
        tokio::task::yield_now().await;

        // Expansion may read scripts from disk
        let workspace = Arc::clone(&self.workspace);
        let include_referencing = self.include_referencing;
        let start = Arc::clone(&file);
        let documents = tokio::task::spawn_blocking(move || {
            expand_script_references(&start, &*workspace, include_referencing)
        })
        .await??;
        debug!(
            "Searching {} scripts for '{}'",
            documents.len(),
            symbol.name
        );

        let mut references = Vec::new();
        for document in &documents {
            tokio::task::yield_now().await;
            references.extend(self.scanner.references_in(&symbol, document));
        }
        let references = self.scanner.finish(&symbol, references);

        Ok(references.iter().map(to_location).collect())
    }
}

fn to_location(reference: &SymbolReference) -> Location {
    Location {
        uri: reference.file_uri.clone(),
        range: to_protocol_range(reference.region),
    }
}

/// Unknown documents are the caller's mistake; anything else is ours
pub fn to_rpc_error(error: WorkspaceError) -> jsonrpc::Error {
    match error {
        WorkspaceError::DocumentNotFound(_) => jsonrpc::Error::invalid_params(error.to_string()),
        WorkspaceError::Io { .. } | WorkspaceError::Parse { .. } | WorkspaceError::Task(_) => {
            jsonrpc::Error {
                code: jsonrpc::ErrorCode::InternalError,
                message: error.to_string().into(),
                data: None,
            }
        }
    }
}
