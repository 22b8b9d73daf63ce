//! Shared helpers for driving the server through `LspService`

#![allow(dead_code)]

use std::time::Duration;

use futures::StreamExt;
use serde_json::{Value, json};
use tokio::sync::mpsc;
use tower_lsp::ClientSocket;
use tower_lsp::jsonrpc::{self, Request, Response};

const NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(5);

pub fn create_initialize_request(id: i64) -> Request {
    create_initialize_request_with(id, json!({ "capabilities": {} }))
}

pub fn create_initialize_request_with(id: i64, params: Value) -> Request {
    Request::build("initialize").params(params).id(id).finish()
}

pub fn create_initialized_notification() -> Request {
    Request::build("initialized").params(json!({})).finish()
}

pub fn create_did_open_notification(uri: &str, text: &str) -> Request {
    Request::build("textDocument/didOpen")
        .params(json!({
            "textDocument": {
                "uri": uri,
                "languageId": "powershell",
                "version": 1,
                "text": text,
            }
        }))
        .finish()
}

pub fn create_did_change_notification(uri: &str, version: i32, changes: Value) -> Request {
    Request::build("textDocument/didChange")
        .params(json!({
            "textDocument": { "uri": uri, "version": version },
            "contentChanges": changes,
        }))
        .finish()
}

pub fn create_references_request(id: i64, uri: &str, line: u32, character: u32) -> Request {
    Request::build("textDocument/references")
        .params(json!({
            "textDocument": { "uri": uri },
            "position": { "line": line, "character": character },
            "context": { "includeDeclaration": true },
        }))
        .id(id)
        .finish()
}

/// Unwraps the result of a request that must produce a response
pub fn into_result(response: Option<Response>) -> Result<Value, jsonrpc::Error> {
    let response = response.expect("Expected a response");
    let (_, result) = response.into_parts();
    result
}

/// Drains server-to-client messages so the server never blocks on the socket
pub fn spawn_notification_collector(mut socket: ClientSocket) -> mpsc::UnboundedReceiver<Request> {
    let (tx, rx) = mpsc::unbounded_channel();
    tokio::spawn(async move {
        while let Some(request) = socket.next().await {
            if tx.send(request).is_err() {
                break;
            }
        }
    });
    rx
}

pub async fn wait_for_notification(
    rx: &mut mpsc::UnboundedReceiver<Request>,
    method: &str,
) -> Option<Request> {
    tokio::time::timeout(NOTIFICATION_TIMEOUT, async {
        while let Some(request) = rx.recv().await {
            if request.method() == method {
                return Some(request);
            }
        }
        None
    })
    .await
    .ok()
    .flatten()
}
