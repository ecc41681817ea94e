//! 主机映射记录
//!
//! 一条映射描述一条本端主机到远端主机的连接，来源可以是 JSON 文件，
//! 也可以是 CDP 邻居发现的结果。

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{MapBuilderError, Result};

/// 主机映射 (一条连接)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mapping {
    pub local_host: String,
    #[serde(default)]
    pub local_interface: String,
    #[serde(default)]
    pub local_trigger_pattern: String,
    #[serde(default)]
    pub local_image: String,
    pub remote_host: String,
    #[serde(default)]
    pub remote_interface: String,
    #[serde(default)]
    pub remote_trigger_pattern: String,
    #[serde(default)]
    pub remote_image: String,
}

/// CDP 缓存中的一个邻居
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CdpNeighbor {
    /// cdpCacheAddress
    pub address: Vec<u8>,
    /// cdpCacheDeviceId (远端主机名)
    pub device_id: String,
    /// cdpCacheDevicePort (远端接口)
    pub port: String,
    /// cdpCacheCapabilities
    pub capabilities: Vec<u8>,
    /// 本端接口索引 (IF-MIB ifIndex)
    pub local_port_index: u32,
    /// 本端接口名称 (ifName)
    pub local_port: String,
}

/// 从 JSON 文本解析映射列表，空列表视为错误
pub fn parse_mappings(json: &str) -> Result<Vec<Mapping>> {
    let mappings: Vec<Mapping> = serde_json::from_str(json)?;
    if mappings.is_empty() {
        return Err(MapBuilderError::config("no mapping were found in the input"));
    }
    Ok(mappings)
}

/// 读取映射文件
pub fn load_mappings(path: impl AsRef<Path>) -> Result<Vec<Mapping>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    parse_mappings(&content).map_err(|e| match e {
        MapBuilderError::Configuration(_) => MapBuilderError::Configuration(format!(
            "no mapping were found in '{}'",
            path.display()
        )),
        other => other,
    })
}

/// 映射中出现的全部主机名 (本端 + 远端)，按首次出现顺序去重
pub fn unique_hosts(mappings: &[Mapping]) -> Vec<String> {
    collect_unique(
        mappings
            .iter()
            .flat_map(|m| [m.local_host.as_str(), m.remote_host.as_str()]),
    )
}

/// 映射中出现的全部图标名 (本端 + 远端)，按首次出现顺序去重
pub fn unique_images(mappings: &[Mapping]) -> Vec<String> {
    collect_unique(
        mappings
            .iter()
            .flat_map(|m| [m.local_image.as_str(), m.remote_image.as_str()]),
    )
}

fn collect_unique<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for name in names {
        if !out.iter().any(|n| n == name) {
            out.push(name.to_string());
        }
    }
    out
}
