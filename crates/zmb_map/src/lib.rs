//! # zmb_map - Zabbix Map Builder Engine
//!
//! 拓扑图构建引擎：把扁平的主机映射列表转换为 `map.create` 请求。
//! 负责节点去重、网格布局、触发器解析、链接着色以及同名拓扑图的冲突处理。

pub mod builder;
pub mod conflict;
pub mod generate;
pub mod link;
pub mod options;
pub mod position;
pub mod registry;
pub mod trigger;

pub use builder::{build_map, BuildStage};
pub use conflict::{
    decide, publish_map, rename_with_suffix, resolve_conflict, ConflictPolicy, FixedPolicy,
    MapDirectory, Resolution,
};
pub use generate::{generate_mappings, GenerateOptions};
pub use link::build_link;
pub use options::{validate_hex, MapOptions, MissingHostPolicy};
pub use position::Position;
pub use registry::{InsertOutcome, NodeRegistry};
pub use trigger::{resolve_trigger, TriggerSource};

pub use zmb_core::{MapBuilderError, Result};
