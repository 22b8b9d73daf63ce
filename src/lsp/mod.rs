// LSP protocol layer
// - server.rs: LSP server entry point
// - backend.rs: LanguageServer trait implementation
// - references.rs: textDocument/references handling
// - coordinates.rs: protocol <-> script position conversion
pub mod backend;
pub mod coordinates;
pub mod references;
pub mod server;
