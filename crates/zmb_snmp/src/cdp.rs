//! CDP 缓存解析与邻居发现
//!
//! cdpCacheTable 中每个单元格的 OID 形如
//! `1.3.6.1.4.1.9.9.23.1.2.1.1.<列>.<ifIndex>.<设备序号>`，
//! 按 (ifIndex, 设备序号) 汇总为一个邻居。

use std::collections::BTreeMap;

use zmb_core::{CdpNeighbor, MapBuilderError, Result};

use crate::session::{SnmpEntry, SnmpTransport};
use crate::{format_oid, CDP_CACHE_ENTRY, CDP_GLOBAL_DEVICE_ID, IF_NAME};

const COLUMN_ADDRESS: u32 = 4;
const COLUMN_DEVICE_ID: u32 = 6;
const COLUMN_DEVICE_PORT: u32 = 7;
const COLUMN_CAPABILITIES: u32 = 9;

/// 能力位最后一个字节为 0x28 / 0x29 时视为路由器或交换机
pub fn supported_capabilities(capabilities: &[u8]) -> bool {
    matches!(capabilities.last(), Some(0x28) | Some(0x29))
}

fn text(entry: &SnmpEntry) -> String {
    entry
        .value
        .as_bytes()
        .map(|b| String::from_utf8_lossy(b).trim_end_matches('\0').to_string())
        .unwrap_or_default()
}

/// 把 cdpCacheTable 的遍历结果汇总为邻居列表，只保留路由器/交换机
pub fn parse_cdp_cache(entries: &[SnmpEntry]) -> Vec<CdpNeighbor> {
    let mut rows: BTreeMap<(u32, u32), CdpNeighbor> = BTreeMap::new();

    for entry in entries {
        let suffix = match entry.oid.strip_prefix(CDP_CACHE_ENTRY) {
            Some(suffix) if suffix.len() == 3 => suffix,
            _ => {
                tracing::warn!(oid = %format_oid(&entry.oid), "error while parsing CDP cache oid");
                continue;
            }
        };
        let (column, if_index, device_index) = (suffix[0], suffix[1], suffix[2]);

        let row = rows
            .entry((if_index, device_index))
            .or_insert_with(|| CdpNeighbor {
                local_port_index: if_index,
                ..Default::default()
            });

        match column {
            COLUMN_ADDRESS => row.address = entry.value.as_bytes().unwrap_or_default().to_vec(),
            COLUMN_DEVICE_ID => row.device_id = text(entry),
            COLUMN_DEVICE_PORT => row.port = text(entry),
            COLUMN_CAPABILITIES => {
                row.capabilities = entry.value.as_bytes().unwrap_or_default().to_vec()
            }
            _ => {
                tracing::debug!(oid = %format_oid(&entry.oid), "unsupported CDP cache column");
            }
        }
    }

    rows.into_values()
        .filter(|row| {
            let keep = supported_capabilities(&row.capabilities);
            if !keep {
                tracing::debug!(
                    device_id = %row.device_id,
                    capabilities = ?row.capabilities,
                    "skipping neighbor that is neither a router nor a switch"
                );
            }
            keep
        })
        .collect()
}

/// 一次发现的结果
#[derive(Debug, Clone)]
pub struct Discovery {
    pub hostname: String,
    pub neighbors: Vec<CdpNeighbor>,
}

/// CDP 邻居发现
pub struct CdpDiscovery<T: SnmpTransport> {
    transport: T,
}

impl<T: SnmpTransport> CdpDiscovery<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// 读取 CDP 缓存中的路由器/交换机邻居
    pub fn neighbors(&mut self) -> Result<Vec<CdpNeighbor>> {
        let response = self.transport.walk_bulk(CDP_CACHE_ENTRY)?;
        tracing::debug!(
            duration = ?response.duration,
            entries = response.entries.len(),
            "CDP cache walked"
        );
        Ok(parse_cdp_cache(&response.entries))
    }

    /// 用 ifName 填充每个邻居的本端接口名
    pub fn fill_local_interfaces(&mut self, neighbors: &mut [CdpNeighbor]) -> Result<()> {
        if neighbors.is_empty() {
            return Ok(());
        }

        let oids: Vec<Vec<u32>> = neighbors
            .iter()
            .map(|n| [IF_NAME, &[n.local_port_index]].concat())
            .collect();

        let response = self.transport.get(&oids)?;
        tracing::debug!(duration = ?response.duration, "local interface names retrieved");

        for entry in &response.entries {
            let Some(&index) = entry.oid.last() else {
                continue;
            };
            let name = text(entry);
            for neighbor in neighbors.iter_mut().filter(|n| n.local_port_index == index) {
                neighbor.local_port = name.clone();
            }
        }

        Ok(())
    }

    /// 本机在 CDP 中通告的设备名
    pub fn hostname(&mut self) -> Result<String> {
        let response = self.transport.get_next(&[CDP_GLOBAL_DEVICE_ID.to_vec()])?;
        tracing::debug!(duration = ?response.duration, "local hostname retrieved");

        match response.entries.as_slice() {
            [entry] => Ok(text(entry)),
            entries => Err(MapBuilderError::Snmp(format!(
                "wrong number of variables returned while retrieving local hostname, expected 1, returned {}",
                entries.len()
            ))),
        }
    }

    /// 主机名 + 补全了本端接口名的邻居
    pub fn discover(&mut self) -> Result<Discovery> {
        let hostname = self.hostname()?;
        let mut neighbors = self.neighbors()?;
        self.fill_local_interfaces(&mut neighbors)?;

        tracing::debug!(
            hostname = %hostname,
            neighbors = neighbors.len(),
            "CDP discovery finished"
        );
        Ok(Discovery {
            hostname,
            neighbors,
        })
    }
}
