use std::path::PathBuf;

use serde::Deserialize;
use tracing::warn;

/// Default upper bound on scripts indexed from workspace folders
pub const DEFAULT_MAX_WORKSPACE_FILES: usize = 2000;

/// File name of the server log inside the data directory
pub const LOG_FILE_NAME: &str = "pwsh-refs-lsp.log";

/// Returns the path to the data directory for pwsh-refs-lsp.
/// Uses $XDG_DATA_HOME/pwsh-refs-lsp if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/pwsh-refs-lsp,
/// or ./pwsh-refs-lsp if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the path to the log file.
pub fn log_path() -> PathBuf {
    data_dir().join(LOG_FILE_NAME)
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("pwsh-refs-lsp")
}

/// How two occurrences are decided to name the same symbol
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SymbolMatchPolicy {
    /// Name, kind family and declaring scope must agree
    #[default]
    ScopeAware,
    /// Name and kind family must agree
    NameOnly,
}

/// Server settings, read from `initializationOptions`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServerConfig {
    pub symbol_match_policy: SymbolMatchPolicy,
    /// Also search scripts that dot-source the requested script
    pub include_referencing_documents: bool,
    /// Index scripts under the workspace folders on startup
    pub enumerate_workspace_files: bool,
    pub max_workspace_files: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            symbol_match_policy: SymbolMatchPolicy::default(),
            include_referencing_documents: true,
            enumerate_workspace_files: true,
            max_workspace_files: DEFAULT_MAX_WORKSPACE_FILES,
        }
    }
}

impl ServerConfig {
    /// Builds the config from client initialization options.
    /// Missing or malformed options fall back to defaults.
    pub fn from_initialization_options(options: Option<serde_json::Value>) -> Self {
        let Some(options) = options else {
            return Self::default();
        };

        serde_json::from_value(options)
            .inspect_err(|e| warn!("Invalid initialization options, using defaults: {}", e))
            .unwrap_or_default()
    }
}
