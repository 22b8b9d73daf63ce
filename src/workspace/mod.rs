//! Workspace layer
//! - document.rs: ScriptFile snapshots and text edits
//! - service.rs: open/on-disk script store
//! - graph.rs: dot-sourcing expansion
//! - paths.rs: path and URI normalization
//! - error.rs: WorkspaceError

pub mod document;
pub mod error;
pub mod graph;
pub mod paths;
pub mod service;

pub use document::{DocumentChange, ScriptFile};
pub use error::WorkspaceError;
pub use graph::{DocumentSource, expand_script_references};
pub use service::WorkspaceService;
