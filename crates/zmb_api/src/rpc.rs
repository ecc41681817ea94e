//! JSON-RPC 2.0 报文

use serde::{Deserialize, Serialize};
use zmb_core::{MapBuilderError, Result};

/// 请求报文
#[derive(Debug, Clone, Serialize)]
pub struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub method: &'a str,
    pub params: serde_json::Value,
    pub id: u64,
}

impl<'a> RpcRequest<'a> {
    pub fn new(method: &'a str, params: serde_json::Value, id: u64) -> Self {
        Self {
            jsonrpc: "2.0",
            method,
            params,
            id,
        }
    }
}

/// 错误对象
#[derive(Debug, Clone, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: String,
}

/// 响应报文
#[derive(Debug, Clone, Deserialize)]
pub struct RpcResponse {
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<RpcError>,
}

impl RpcResponse {
    /// 取出 `result`，`error` 转换为传输错误
    pub fn into_result(self, method: &str) -> Result<serde_json::Value> {
        if let Some(error) = self.error {
            return Err(MapBuilderError::Transport(format!(
                "{method}: API error {} ({}): {}",
                error.code,
                error.message,
                error.data.trim()
            )));
        }

        self.result.ok_or_else(|| {
            MapBuilderError::Transport(format!(
                "{method}: response carries neither result nor error"
            ))
        })
    }
}
