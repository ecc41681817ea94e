//! 全局错误处理机制

use thiserror::Error;

/// Zabbix Map Builder 统一错误类型
#[derive(Error, Debug)]
pub enum MapBuilderError {
    /// 配置缺失或非法 (名称为空、颜色格式错误、集合为空等)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// 主机或图标名称在服务器上没有对应 ID
    #[error("Lookup error: {0}")]
    Lookup(String),

    #[error(
        "Trigger resolution error: {count} trigger(s) matched pattern '{pattern}' on host '{host}', exactly one is required"
    )]
    TriggerResolution {
        host: String,
        pattern: String,
        count: usize,
    },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("SNMP error: {0}")]
    Snmp(String),

    #[error("Conflict error: {0}")]
    Conflict(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl MapBuilderError {
    /// 快捷构造配置错误
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// 是否为配置类错误
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }
}

/// 统一 Result 类型别名
pub type Result<T> = std::result::Result<T, MapBuilderError>;
