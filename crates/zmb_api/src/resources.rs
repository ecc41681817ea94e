//! Zabbix 资源查询与拓扑图操作
//!
//! 同时为引擎提供 `TriggerSource` 与 `MapDirectory` 实现。

use std::collections::HashMap;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use zmb_core::{MapBuilderError, MapCreateRequest, Result};
use zmb_map::{MapDirectory, TriggerSource};

use crate::client::ZabbixClient;

#[derive(Debug, Deserialize)]
struct HostRecord {
    hostid: String,
    host: String,
}

#[derive(Debug, Deserialize)]
struct ImageRecord {
    imageid: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct TriggerRecord {
    triggerid: String,
}

#[derive(Debug, Deserialize)]
struct MapRecord {
    sysmapid: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct MapIds {
    sysmapids: Vec<String>,
}

/// 把服务器返回的 (名称, ID) 填入结果表，返回未请求过的名称视为错误
fn collect_ids(
    requested: &[String],
    found: impl IntoIterator<Item = (String, String)>,
    kind: &str,
) -> Result<HashMap<String, String>> {
    let mut out = HashMap::with_capacity(requested.len());
    for (name, id) in found {
        if !requested.contains(&name) {
            return Err(MapBuilderError::Lookup(format!(
                "server returned unknown {kind} '{name}'"
            )));
        }
        out.insert(name, id);
    }

    for name in requested {
        if !out.contains_key(name) {
            tracing::debug!(kind, name = %name, "no id found on the server");
        }
    }

    Ok(out)
}

impl ZabbixClient {
    /// 主机名 -> hostid；服务器上不存在的主机不会出现在结果中
    pub async fn host_ids(&self, names: &[String]) -> Result<HashMap<String, String>> {
        let hosts: Vec<HostRecord> = self
            .call(
                "host.get",
                json!({
                    "output": ["hostid", "host"],
                    "filter": { "host": names },
                }),
            )
            .await?;

        collect_ids(names, hosts.into_iter().map(|h| (h.host, h.hostid)), "host")
    }

    /// 图标名 -> imageid
    pub async fn image_ids(&self, names: &[String]) -> Result<HashMap<String, String>> {
        let images: Vec<ImageRecord> = self
            .call(
                "image.get",
                json!({
                    "output": ["imageid", "name"],
                    "filter": { "name": names },
                }),
            )
            .await?;

        collect_ids(names, images.into_iter().map(|i| (i.name, i.imageid)), "image")
    }

    /// 描述匹配 `pattern` (通配符) 的触发器 ID
    pub async fn search_triggers(&self, host_id: &str, pattern: &str) -> Result<Vec<String>> {
        let triggers: Vec<TriggerRecord> = self
            .call(
                "trigger.get",
                json!({
                    "output": ["triggerid"],
                    "hostids": [host_id],
                    "search": { "description": pattern },
                    "searchWildcardsEnabled": true,
                }),
            )
            .await?;

        Ok(triggers.into_iter().map(|t| t.triggerid).collect())
    }

    /// 按名称精确查找拓扑图
    pub async fn get_map(&self, name: &str) -> Result<Option<String>> {
        let maps: Vec<MapRecord> = self
            .call(
                "map.get",
                json!({
                    "output": ["sysmapid", "name"],
                    "filter": { "name": [name] },
                }),
            )
            .await?;

        Ok(maps.into_iter().find(|m| m.name == name).map(|m| m.sysmapid))
    }

    pub async fn create(&self, request: &MapCreateRequest) -> Result<String> {
        let ids: MapIds = self.call("map.create", serde_json::to_value(request)?).await?;

        ids.sysmapids.into_iter().next().ok_or_else(|| {
            MapBuilderError::Transport(
                "map.create: an empty response was returned when creating the map".to_string(),
            )
        })
    }

    pub async fn delete(&self, sysmapid: &str) -> Result<()> {
        let _: MapIds = self.call("map.delete", json!([sysmapid])).await?;
        Ok(())
    }
}

#[async_trait]
impl TriggerSource for ZabbixClient {
    async fn trigger_ids(&self, host_id: &str, pattern: &str) -> Result<Vec<String>> {
        self.search_triggers(host_id, pattern).await
    }
}

#[async_trait]
impl MapDirectory for ZabbixClient {
    async fn find_map(&self, name: &str) -> Result<Option<String>> {
        self.get_map(name).await
    }

    async fn delete_map(&self, sysmapid: &str) -> Result<()> {
        self.delete(sysmapid).await
    }

    async fn create_map(&self, request: &MapCreateRequest) -> Result<String> {
        self.create(request).await
    }
}
