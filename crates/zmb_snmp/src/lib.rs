//! # zmb_snmp - CDP Neighbor Discovery
//!
//! 通过 SNMPv2c 读取路由器的 CDP 缓存表，得到直连的路由器/交换机邻居，
//! 并补全本端接口名称与本机主机名。

pub mod cdp;
pub mod session;

pub use cdp::{parse_cdp_cache, supported_capabilities, CdpDiscovery, Discovery};
pub use session::{SnmpEntry, SnmpResponse, SnmpSession, SnmpTransport, SnmpValue};

pub use zmb_core::{MapBuilderError, Result};

/// cdpCacheEntry
pub const CDP_CACHE_ENTRY: &[u32] = &[1, 3, 6, 1, 4, 1, 9, 9, 23, 1, 2, 1, 1];
/// cdpGlobalDeviceId
pub const CDP_GLOBAL_DEVICE_ID: &[u32] = &[1, 3, 6, 1, 4, 1, 9, 9, 23, 1, 3, 4];
/// IF-MIB ifName
pub const IF_NAME: &[u32] = &[1, 3, 6, 1, 2, 1, 31, 1, 1, 1, 1];

/// 点分格式输出 OID
pub fn format_oid(oid: &[u32]) -> String {
    oid.iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(".")
}
