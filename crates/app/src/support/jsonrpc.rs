#![forbid(unsafe_code)]

use crate::AppError;
use serde::Deserialize;
use serde_json::{Value, json};

#[derive(Debug, Deserialize)]
pub(crate) struct JsonRpcRequest {
    #[serde(default)]
    #[serde(rename = "jsonrpc")]
    pub(crate) _jsonrpc: Option<String>,
    pub(crate) method: String,
    #[serde(default)]
    pub(crate) id: Option<Value>,
    #[serde(default)]
    pub(crate) params: Option<Value>,
}

pub(crate) fn json_rpc_response(id: Option<Value>, result: Value) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "result": result })
}

pub(crate) fn json_rpc_error(id: Option<Value>, code: i64, message: &str) -> Value {
    json!({ "jsonrpc": "2.0", "id": id, "error": { "code": code, "message": message } })
}

pub(crate) fn app_error_response(id: Option<Value>, err: &AppError) -> Value {
    let mut resp = json_rpc_error(id, err.rpc_code(), &err.to_string());
    if let (Some(code), Some(error)) = (err.data_code(), resp.get_mut("error")) {
        error["data"] = json!({ "code": code });
    }
    resp
}
