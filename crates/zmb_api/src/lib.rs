//! # zmb_api - Zabbix JSON-RPC Client
//!
//! 基于 reqwest 的 Zabbix API 客户端：连通性检查、登录/登出、
//! 主机/图标/触发器查询以及拓扑图的查询、创建与删除。

pub mod client;
pub mod resources;
pub mod rpc;

pub use client::{ZabbixClient, ZabbixConfig};
pub use rpc::{RpcError, RpcRequest, RpcResponse};

pub use zmb_core::{MapBuilderError, Result};
