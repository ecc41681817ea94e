//! 触发器解析
//!
//! 通过主机 ID 与描述模式 (支持通配符) 查找触发器，必须恰好命中一个。

use async_trait::async_trait;
use zmb_core::{MapBuilderError, Result};

/// 触发器查询来源 (通常是 Zabbix API)
#[async_trait]
pub trait TriggerSource: Send + Sync {
    /// 返回描述匹配 `pattern` 的全部触发器 ID
    async fn trigger_ids(&self, host_id: &str, pattern: &str) -> Result<Vec<String>>;
}

/// 解析出唯一的触发器 ID，零个或多个匹配都视为错误
pub async fn resolve_trigger(
    source: &dyn TriggerSource,
    host_id: &str,
    pattern: &str,
) -> Result<String> {
    let mut ids = source.trigger_ids(host_id, pattern).await?;

    if ids.len() != 1 {
        return Err(MapBuilderError::TriggerResolution {
            host: host_id.to_string(),
            pattern: pattern.to_string(),
            count: ids.len(),
        });
    }

    tracing::debug!(host_id, pattern, trigger_id = %ids[0], "trigger resolved");
    Ok(ids.remove(0))
}
