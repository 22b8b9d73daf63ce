//! Expansion of a script into the scripts it is connected to by dot-sourcing

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use indexmap::IndexMap;
use tower_lsp::lsp_types::Url;
use tracing::debug;

use crate::workspace::document::ScriptFile;
use crate::workspace::error::WorkspaceError;

/// Where the graph looks up scripts
pub trait DocumentSource {
    /// The script at `uri`. A script that does not exist is `Ok(None)`;
    /// one that exists but cannot be read or parsed is an error.
    fn resolve(&self, uri: &Url) -> Result<Option<Arc<ScriptFile>>, WorkspaceError>;

    /// Every script currently known, in a stable order
    fn known_documents(&self) -> Vec<Arc<ScriptFile>>;
}

/// Returns `start` followed by every script it transitively dot-sources,
/// breadth-first in directive order. Each script appears once, cycles
/// terminate, and directives that cannot be resolved are skipped.
///
/// With `include_referencing`, known scripts that transitively dot-source
/// `start` are appended too (with their expansions), since definitions flow
/// from a dot-sourced script into the one that includes it.
pub fn expand_script_references(
    start: &Arc<ScriptFile>,
    source: &dyn DocumentSource,
    include_referencing: bool,
) -> Result<Vec<Arc<ScriptFile>>, WorkspaceError> {
    let mut expanded = IndexMap::new();
    collect_reachable(start, source, &mut expanded)?;

    if include_referencing {
        for includer in referencing_documents(start, source) {
            debug!("{} dot-sources {}", includer.uri(), start.uri());
            collect_reachable(&includer, source, &mut expanded)?;
        }
    }

    debug!(
        "Expanded {} into {} scripts",
        start.uri(),
        expanded.len()
    );
    Ok(expanded.into_values().collect())
}

/// Breadth-first walk over dot-sourcing edges. `visited` keys are canonical
/// URIs, so each script is entered at most once.
fn collect_reachable(
    start: &Arc<ScriptFile>,
    source: &dyn DocumentSource,
    visited: &mut IndexMap<Url, Arc<ScriptFile>>,
) -> Result<(), WorkspaceError> {
    if visited.contains_key(start.uri()) {
        return Ok(());
    }
    visited.insert(start.uri().clone(), Arc::clone(start));

    let mut queue = VecDeque::from([Arc::clone(start)]);
    while let Some(document) = queue.pop_front() {
        for inclusion in &document.symbols().inclusions {
            let Some(uri) = document.resolve_inclusion(inclusion) else {
                debug!(
                    "Cannot resolve '{}' in {} statically",
                    inclusion.path,
                    document.uri()
                );
                continue;
            };
            if visited.contains_key(&uri) {
                continue;
            }
            let Some(included) = source.resolve(&uri)? else {
                debug!("Skipping missing script {}", uri);
                continue;
            };
            visited.insert(included.uri().clone(), Arc::clone(&included));
            queue.push_back(included);
        }
    }
    Ok(())
}

/// Known scripts that reach `start` through dot-sourcing, nearest first.
/// Builds the reverse edges once, then walks them breadth-first.
fn referencing_documents(
    start: &ScriptFile,
    source: &dyn DocumentSource,
) -> Vec<Arc<ScriptFile>> {
    let mut includers: HashMap<Url, Vec<Arc<ScriptFile>>> = HashMap::new();
    for document in source.known_documents() {
        for inclusion in &document.symbols().inclusions {
            if let Some(uri) = document.resolve_inclusion(inclusion) {
                includers.entry(uri).or_default().push(Arc::clone(&document));
            }
        }
    }

    let mut found: IndexMap<Url, Arc<ScriptFile>> = IndexMap::new();
    let mut queue = VecDeque::from([start.uri().clone()]);
    while let Some(uri) = queue.pop_front() {
        for includer in includers.get(&uri).into_iter().flatten() {
            if includer.uri() == start.uri() || found.contains_key(includer.uri()) {
                continue;
            }
            found.insert(includer.uri().clone(), Arc::clone(includer));
            queue.push_back(includer.uri().clone());
        }
    }
    found.into_values().collect()
}
