//! # zmb_core - Zabbix Map Builder Core Primitives
//!
//! 核心原语层，定义统一错误类型、主机映射记录以及拓扑图创建请求结构。
//! 此 crate 是整个项目的基础依赖，不依赖其他业务 crate。

pub mod entity;
pub mod error;
pub mod mapping;

pub use entity::{ElementKind, LinkTrigger, MapCreateRequest, MapLink, Selement};
pub use error::{MapBuilderError, Result};
pub use mapping::{load_mappings, parse_mappings, unique_hosts, unique_images, CdpNeighbor, Mapping};
