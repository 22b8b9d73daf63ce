use tower_lsp::{LspService, Server};
use tracing::info;

use crate::config;
use crate::log::init;
use crate::lsp::backend::Backend;

pub async fn run_server() -> anyhow::Result<()> {
    let _guard = init()?;

    info!(
        "Starting pwsh-refs-lsp server, logging to {}",
        config::log_path().display()
    );

    let stdin = tokio::io::stdin();
    let stdout = tokio::io::stdout();

    let (service, socket) = LspService::new(Backend::new);
    Server::new(stdin, stdout, socket).serve(service).await;

    info!("pwsh-refs-lsp server stopped");
    Ok(())
}
