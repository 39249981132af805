//! JSON-RPC 2.0 envelope.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const JSONRPC_VERSION: &str = "2.0";
pub const RPC_METHOD: &str = "call";

#[derive(Debug, Serialize)]
pub struct RpcRequest<'a, P: ?Sized> {
    pub jsonrpc: &'static str,
    pub method: &'static str,
    pub params: &'a P,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
}

impl<'a, P: ?Sized> RpcRequest<'a, P> {
    pub const fn call(params: &'a P, id: Option<u64>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            method: RPC_METHOD,
            params,
            id,
        }
    }
}

/// Empty `params` object.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct NoParams {}

#[derive(Debug, Deserialize)]
pub struct RpcResponse<R> {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default = "none")]
    pub result: Option<R>,
    #[serde(default)]
    pub error: Option<RpcError>,
}

fn none<R>() -> Option<R> {
    None
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RpcError {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<RpcErrorData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RpcErrorData {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub debug: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub arguments: Option<Vec<String>>,
}

impl RpcError {
    /// Most specific human readable message carried by the error.
    #[must_use]
    pub fn best_message(&self) -> Option<String> {
        self.message
            .clone()
            .or_else(|| self.data.as_ref().and_then(|data| data.message.clone()))
            .filter(|message| !message.trim().is_empty())
    }
}

/// Pull an error message out of an arbitrary response body.
///
/// Accepts `{"error": "..."}`, `{"error": {"message": ...}}` and the same
/// shapes nested under `result`.
#[must_use]
pub fn embedded_error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;

    let error = value
        .get("error")
        .filter(|e| !e.is_null())
        .or_else(|| value.get("result").and_then(|r| r.get("error")))?;

    let message = match error {
        Value::String(message) => Some(message.clone()),
        Value::Object(_) => error
            .get("message")
            .and_then(Value::as_str)
            .or_else(|| {
                error
                    .get("data")
                    .and_then(|data| data.get("message"))
                    .and_then(Value::as_str)
            })
            .map(str::to_string),
        _ => None,
    };

    message.filter(|message| !message.trim().is_empty())
}
