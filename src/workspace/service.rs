//! Open and on-disk scripts known to the server

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

use tower_lsp::lsp_types::Url;
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::parser::traits::Parser;
use crate::workspace::document::{DocumentChange, ScriptFile};
use crate::workspace::error::WorkspaceError;
use crate::workspace::graph::DocumentSource;
use crate::workspace::paths::{canonical_uri, is_script_path};

/// Holds the latest snapshot of every known script.
/// Locks are only held while reading or swapping snapshots, never during
/// parsing or disk I/O.
pub struct WorkspaceService {
    parser: Box<dyn Parser>,
    files: RwLock<HashMap<Url, Arc<ScriptFile>>>,
}

impl WorkspaceService {
    pub fn new(parser: Box<dyn Parser>) -> Self {
        Self {
            parser,
            files: RwLock::new(HashMap::new()),
        }
    }

    /// Stores the editor's buffer, replacing any earlier snapshot
    pub fn open_document(
        &self,
        uri: &Url,
        text: String,
        version: i32,
    ) -> Result<Arc<ScriptFile>, WorkspaceError> {
        let file = ScriptFile::new(uri, text, version, &*self.parser).map_err(|source| {
            WorkspaceError::Parse {
                uri: uri.clone(),
                source,
            }
        })?;
        Ok(self.insert(file))
    }

    pub fn change_document(
        &self,
        uri: &Url,
        changes: &[DocumentChange],
        version: i32,
    ) -> Result<Arc<ScriptFile>, WorkspaceError> {
        let current = self
            .cached(uri)
            .ok_or_else(|| WorkspaceError::DocumentNotFound(uri.clone()))?;
        let file = current
            .with_changes(changes, version, &*self.parser)
            .map_err(|source| WorkspaceError::Parse {
                uri: uri.clone(),
                source,
            })?;
        Ok(self.insert(file))
    }

    /// Drops the editor's buffer. Scripts that exist on disk are reloaded so
    /// they keep taking part in reference searches.
    pub fn close_document(&self, uri: &Url) {
        let key = canonical_uri(uri);
        self.write_files().remove(&key);

        match self.load_from_disk(&key) {
            Ok(Some(_)) => debug!("Reloaded {} from disk after close", key),
            Ok(None) => debug!("Removed {}", key),
            Err(e) => warn!("Failed to reload {} after close: {}", key, e),
        }
    }

    /// Returns the latest snapshot of a script, loading `file:` URIs from
    /// disk on first access.
    pub fn get_file(&self, uri: &Url) -> Result<Arc<ScriptFile>, WorkspaceError> {
        if let Some(file) = self.cached(uri) {
            return Ok(file);
        }
        self.load_from_disk(&canonical_uri(uri))?
            .ok_or_else(|| WorkspaceError::DocumentNotFound(uri.clone()))
    }

    /// Every known script, ordered by URI
    pub fn documents(&self) -> Vec<Arc<ScriptFile>> {
        let mut documents: Vec<_> = self.read_files().values().cloned().collect();
        documents.sort_by(|a, b| a.uri().as_str().cmp(b.uri().as_str()));
        documents
    }

    /// Indexes scripts below `root`, skipping hidden directories.
    /// Returns the number of scripts loaded.
    pub fn load_workspace_files(&self, root: &Path, max_files: usize) -> usize {
        let mut loaded = 0;
        let scripts = WalkDir::new(root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry))
            .filter_map(|entry| {
                entry
                    .inspect_err(|e| debug!("Skipping unreadable entry: {}", e))
                    .ok()
            })
            .filter(|entry| entry.file_type().is_file() && is_script_path(entry.path()))
            .take(max_files);

        for entry in scripts {
            let Ok(uri) = Url::from_file_path(entry.path()) else {
                continue;
            };
            if self.cached(&uri).is_some() {
                continue;
            }
            match self.load_from_disk(&uri) {
                Ok(Some(_)) => loaded += 1,
                Ok(None) => {}
                Err(e) => warn!("Failed to index {}: {}", uri, e),
            }
        }

        info!("Indexed {} scripts under {:?}", loaded, root);
        loaded
    }

    fn cached(&self, uri: &Url) -> Option<Arc<ScriptFile>> {
        self.read_files().get(&canonical_uri(uri)).cloned()
    }

    fn insert(&self, file: ScriptFile) -> Arc<ScriptFile> {
        let file = Arc::new(file);
        self.write_files()
            .insert(file.uri().clone(), Arc::clone(&file));
        file
    }

    /// Reads and parses a script from disk. Missing files are `Ok(None)`.
    /// An open buffer inserted meanwhile wins over the disk copy.
    fn load_from_disk(&self, uri: &Url) -> Result<Option<Arc<ScriptFile>>, WorkspaceError> {
        if uri.scheme() != "file" {
            return Ok(None);
        }
        let Ok(path) = uri.to_file_path() else {
            return Ok(None);
        };

        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(WorkspaceError::Io {
                    uri: uri.clone(),
                    source,
                });
            }
        };

        let file = ScriptFile::new(uri, text, 0, &*self.parser).map_err(|source| {
            WorkspaceError::Parse {
                uri: uri.clone(),
                source,
            }
        })?;
        debug!("Loaded {} from disk", file.uri());

        let file = Arc::new(file);
        let stored = self
            .write_files()
            .entry(file.uri().clone())
            .or_insert(file)
            .clone();
        Ok(Some(stored))
    }

    fn read_files(&self) -> std::sync::RwLockReadGuard<'_, HashMap<Url, Arc<ScriptFile>>> {
        self.files.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_files(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<Url, Arc<ScriptFile>>> {
        self.files.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DocumentSource for WorkspaceService {
    fn resolve(&self, uri: &Url) -> Result<Option<Arc<ScriptFile>>, WorkspaceError> {
        match self.cached(uri) {
            Some(file) => Ok(Some(file)),
            None => self.load_from_disk(&canonical_uri(uri)),
        }
    }

    fn known_documents(&self) -> Vec<Arc<ScriptFile>> {
        self.documents()
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name.starts_with('.'))
}
