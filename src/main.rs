use clap::Parser;
use pwsh_refs_lsp::lsp::server::run_server;

/// Find-all-references language server for PowerShell scripts
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Communicate over stdin/stdout (the only supported transport)
    #[arg(long)]
    stdio: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if !cli.stdio {
        // stdout carries the protocol, so notices go to stderr
        eprintln!("pwsh-refs-lsp: no transport given, defaulting to --stdio");
    }
    run_server().await
}
