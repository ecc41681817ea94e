//! Zabbix API 传输层与会话

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde_json::json;
use zmb_core::{MapBuilderError, Result};

use crate::rpc::{RpcRequest, RpcResponse};

/// 客户端配置
#[derive(Debug, Clone)]
pub struct ZabbixConfig {
    /// API 地址，如 `http://zabbix.local/api_jsonrpc.php`
    pub url: String,
    /// 单次请求超时
    pub timeout: Duration,
}

impl ZabbixConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Zabbix API 客户端
pub struct ZabbixClient {
    config: ZabbixConfig,
    client: reqwest::Client,
    /// 登录后获得的会话令牌
    token: Option<String>,
    next_id: AtomicU64,
}

impl ZabbixClient {
    pub fn new(config: ZabbixConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| MapBuilderError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            config,
            client,
            token: None,
            next_id: AtomicU64::new(1),
        })
    }

    /// 创建客户端并执行连通性检查
    pub async fn connect(config: ZabbixConfig) -> Result<Self> {
        let client = Self::new(config)?;
        let version = client.api_version().await?;
        tracing::debug!(
            url = %client.config().url,
            version = %version,
            "connected to the Zabbix API"
        );
        Ok(client)
    }

    pub fn config(&self) -> &ZabbixConfig {
        &self.config
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// 服务器 API 版本 (无需认证)
    pub async fn api_version(&self) -> Result<String> {
        self.send("apiinfo.version", json!([]), false).await
    }

    /// 登录并保存会话令牌
    pub async fn login(&mut self, user: &str, password: &str) -> Result<()> {
        let token: String = self
            .send(
                "user.login",
                json!({ "username": user, "password": password }),
                false,
            )
            .await?;

        if token.is_empty() {
            return Err(MapBuilderError::Transport(
                "user.login: no token were returned during the authentication phase".to_string(),
            ));
        }

        tracing::debug!(user, "authenticated");
        self.token = Some(token);
        Ok(())
    }

    /// 注销会话；未登录时不做任何事
    pub async fn logout(&mut self) -> Result<()> {
        if self.token.is_none() {
            return Ok(());
        }

        let result = self.send::<serde_json::Value>("user.logout", json!([]), true).await;
        self.token = None;
        result?;

        tracing::debug!("session released");
        Ok(())
    }

    /// 以当前会话调用任意 API 方法
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T> {
        if self.token.is_none() {
            return Err(MapBuilderError::Transport(format!(
                "{method}: not authenticated"
            )));
        }
        self.send(method, params, true).await
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
        authenticated: bool,
    ) -> Result<T> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = RpcRequest::new(method, params, id);

        let mut request = self
            .client
            .post(&self.config.url)
            .header("Content-Type", "application/json-rpc")
            .json(&body);
        if authenticated {
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }
        }

        let started = Instant::now();
        let resp = request
            .send()
            .await
            .map_err(|e| MapBuilderError::Transport(format!("{method}: request failed: {e}")))?;

        let status = resp.status();
        let raw_text = resp.text().await.unwrap_or_default();
        tracing::debug!(
            method,
            status = %status,
            elapsed = ?started.elapsed(),
            "API call finished"
        );

        if !status.is_success() {
            return Err(MapBuilderError::Transport(format!(
                "{method}: failed ({status}): {}",
                raw_text.trim()
            )));
        }

        let response: RpcResponse = serde_json::from_str(&raw_text).map_err(|e| {
            MapBuilderError::Transport(format!("{method}: response decode failed: {e}"))
        })?;
        let result = response.into_result(method)?;

        serde_json::from_value(result).map_err(|e| {
            MapBuilderError::Transport(format!("{method}: unexpected result shape: {e}"))
        })
    }
}
