use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer};
use tracing::{error, info, warn};

use crate::config::ServerConfig;
use crate::lsp::coordinates::to_internal_range;
use crate::lsp::references::{ReferencesHandler, to_rpc_error};
use crate::parser::PowerShellParser;
use crate::workspace::document::DocumentChange;
use crate::workspace::service::WorkspaceService;

const REFERENCES_REGISTRATION_ID: &str = "pwsh-refs-lsp/references";

/// Per-session settings captured during `initialize`
#[derive(Debug, Clone, Default)]
struct Session {
    config: ServerConfig,
    workspace_roots: Vec<PathBuf>,
    dynamic_references: bool,
}

pub struct Backend {
    client: Client,
    workspace: Arc<WorkspaceService>,
    session: RwLock<Session>,
}

impl Backend {
    pub fn new(client: Client) -> Self {
        let workspace = Arc::new(WorkspaceService::new(Box::new(PowerShellParser::new())));
        Self::build(client, workspace)
    }

    pub fn build(client: Client, workspace: Arc<WorkspaceService>) -> Self {
        Self {
            client,
            workspace,
            session: RwLock::new(Session::default()),
        }
    }

    /// References are advertised statically unless the client registers
    /// them dynamically with a document selector.
    pub fn server_capabilities(dynamic_references: bool) -> ServerCapabilities {
        ServerCapabilities {
            text_document_sync: Some(TextDocumentSyncCapability::Options(
                TextDocumentSyncOptions {
                    open_close: Some(true),
                    change: Some(TextDocumentSyncKind::INCREMENTAL),
                    ..Default::default()
                },
            )),
            references_provider: (!dynamic_references).then_some(OneOf::Left(true)),
            ..Default::default()
        }
    }

    /// Documents the references capability applies to
    pub fn document_selector() -> DocumentSelector {
        ["file", "untitled"]
            .into_iter()
            .map(|scheme| DocumentFilter {
                language: Some("powershell".to_string()),
                scheme: Some(scheme.to_string()),
                pattern: None,
            })
            .collect()
    }

    pub fn references_registration() -> Registration {
        let options = TextDocumentRegistrationOptions {
            document_selector: Some(Self::document_selector()),
        };
        Registration {
            id: REFERENCES_REGISTRATION_ID.to_string(),
            method: "textDocument/references".to_string(),
            register_options: serde_json::to_value(options)
                .inspect_err(|e| error!("Failed to serialize registration options: {}", e))
                .ok(),
        }
    }

    fn session(&self) -> Session {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn references_handler(&self) -> ReferencesHandler {
        ReferencesHandler::new(Arc::clone(&self.workspace), &self.session().config)
    }

    fn spawn_reference_registration(&self) {
        let client = self.client.clone();
        tokio::spawn(async move {
            if let Err(e) = client
                .register_capability(vec![Self::references_registration()])
                .await
            {
                error!("Failed to register references capability: {}", e);
            }
        });
    }

    fn spawn_workspace_indexing(&self, roots: Vec<PathBuf>, max_files: usize) {
        if roots.is_empty() {
            info!("No workspace folders, skipping indexing");
            return;
        }

        let workspace = Arc::clone(&self.workspace);
        tokio::task::spawn_blocking(move || {
            for root in roots {
                workspace.load_workspace_files(&root, max_files);
            }
        });
    }
}

#[allow(deprecated)]
fn workspace_roots(params: &InitializeParams) -> Vec<PathBuf> {
    let folders = params
        .workspace_folders
        .iter()
        .flatten()
        .map(|folder| &folder.uri);
    let uris: Vec<&Url> = match params.workspace_folders {
        Some(_) => folders.collect(),
        None => params.root_uri.iter().collect(),
    };

    uris.into_iter()
        .filter_map(|uri| uri.to_file_path().ok())
        .collect()
}

fn supports_dynamic_references(params: &InitializeParams) -> bool {
    params
        .capabilities
        .text_document
        .as_ref()
        .and_then(|text_document| text_document.references.as_ref())
        .and_then(|references| references.dynamic_registration)
        .unwrap_or(false)
}

#[tower_lsp::async_trait]
impl LanguageServer for Backend {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        self.client
            .log_message(MessageType::INFO, "LSP server initializing")
            .await;

        let session = Session {
            config: ServerConfig::from_initialization_options(
                params.initialization_options.clone(),
            ),
            workspace_roots: workspace_roots(&params),
            dynamic_references: supports_dynamic_references(&params),
        };
        info!("Session settings: {:?}", session);
        let dynamic_references = session.dynamic_references;
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = session;

        Ok(InitializeResult {
            capabilities: Self::server_capabilities(dynamic_references),
            server_info: Some(ServerInfo {
                name: "pwsh-refs-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _params: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "LSP server initialized")
            .await;

        let session = self.session();
        if session.dynamic_references {
            self.spawn_reference_registration();
        }
        if session.config.enumerate_workspace_files {
            self.spawn_workspace_indexing(
                session.workspace_roots,
                session.config.max_workspace_files,
            );
        }
    }

    async fn shutdown(&self) -> Result<()> {
        self.client
            .log_message(MessageType::INFO, "LSP server shutting down")
            .await;
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let document = params.text_document;

        self.client
            .log_message(MessageType::LOG, format!("Document opened: {}", document.uri))
            .await;

        if let Err(e) = self
            .workspace
            .open_document(&document.uri, document.text, document.version)
        {
            warn!("Failed to open {}: {}", document.uri, e);
            self.client
                .log_message(MessageType::WARNING, format!("Failed to open document: {}", e))
                .await;
        }
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let changes: Vec<DocumentChange> = params
            .content_changes
            .into_iter()
            .map(|change| DocumentChange {
                region: change.range.map(to_internal_range),
                text: change.text,
            })
            .collect();

        if let Err(e) = self
            .workspace
            .change_document(&uri, &changes, params.text_document.version)
        {
            warn!("Failed to apply changes to {}: {}", uri, e);
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        self.workspace.close_document(&params.text_document.uri);
    }

    async fn references(&self, params: ReferenceParams) -> Result<Option<Vec<Location>>> {
        let uri = params.text_document_position.text_document.uri.clone();

        let locations = self
            .references_handler()
            .handle(params)
            .await
            .map_err(|e| {
                warn!("References request for {} failed: {}", uri, e);
                to_rpc_error(e)
            })?;

        info!("Returning {} references for {}", locations.len(), uri);
        Ok(Some(locations))
    }
}
