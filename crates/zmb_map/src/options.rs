//! 拓扑图构建选项与校验

use std::collections::HashMap;

use zmb_core::{MapBuilderError, Mapping, Result};

/// 默认链接颜色
pub const DEFAULT_LINK_COLOR: &str = "000000";
/// 默认触发器告警颜色
pub const DEFAULT_TRIGGER_LINK_COLOR: &str = "DD0000";

/// 主机或图标在服务器上找不到 ID 时的处理方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingHostPolicy {
    /// 中止整个构建
    #[default]
    Abort,
    /// 记录警告并跳过该条映射
    Skip,
}

/// 单次构建的配置
#[derive(Debug, Clone)]
pub struct MapOptions {
    pub name: String,
    pub link_color: String,
    pub trigger_link_color: String,
    pub width: u32,
    pub height: u32,
    pub spacer: u32,
    pub stack_hosts: bool,
    pub mappings: Vec<Mapping>,
    /// 主机名 -> hostid
    pub hosts: HashMap<String, String>,
    /// 图标名 -> imageid
    pub images: HashMap<String, String>,
    pub missing_host_policy: MissingHostPolicy,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            name: String::new(),
            link_color: DEFAULT_LINK_COLOR.to_string(),
            trigger_link_color: DEFAULT_TRIGGER_LINK_COLOR.to_string(),
            width: 800,
            height: 800,
            spacer: 100,
            stack_hosts: true,
            mappings: Vec::new(),
            hosts: HashMap::new(),
            images: HashMap::new(),
            missing_host_policy: MissingHostPolicy::Abort,
        }
    }
}

impl MapOptions {
    /// 校验选项，空颜色填充默认值 (已给出但非法的颜色不会被覆盖)
    pub fn validate(&mut self) -> Result<()> {
        if self.name.is_empty() {
            return Err(MapBuilderError::config("map name cannot be empty"));
        }

        if self.link_color.is_empty() {
            self.link_color = DEFAULT_LINK_COLOR.to_string();
        }
        validate_hex(&self.link_color)
            .map_err(|e| MapBuilderError::config(format!("invalid link color: {e}")))?;

        if self.trigger_link_color.is_empty() {
            self.trigger_link_color = DEFAULT_TRIGGER_LINK_COLOR.to_string();
        }
        validate_hex(&self.trigger_link_color)
            .map_err(|e| MapBuilderError::config(format!("invalid trigger link color: {e}")))?;

        if self.mappings.is_empty() {
            return Err(MapBuilderError::config("at least one mapping is required"));
        }

        if self.hosts.is_empty() {
            return Err(MapBuilderError::config("at least one host is required"));
        }

        if self.images.is_empty() {
            return Err(MapBuilderError::config("at least one image is required"));
        }

        if self.spacer == 0 || self.width == 0 || self.height == 0 {
            return Err(MapBuilderError::config(
                "width, height and spacer must be greater than 0",
            ));
        }

        if self.spacer >= self.width || self.spacer >= self.height {
            return Err(MapBuilderError::config(format!(
                "spacer ({}) must be smaller than the map width ({}) and height ({})",
                self.spacer, self.width, self.height
            )));
        }

        Ok(())
    }
}

/// 校验 6 位十六进制颜色 (不带 `#`)
pub fn validate_hex(color: &str) -> std::result::Result<(), String> {
    if color.starts_with('#') {
        return Err(format!(
            "hexadecimal color should not start with a '#', value parsed '{color}'"
        ));
    }

    if color.len() != 6 {
        return Err(format!(
            "hexadecimal color are coded using 6 hexadecimal characters, the given value length is {}",
            color.len()
        ));
    }

    hex::decode(color)
        .map(|_| ())
        .map_err(|e| format!("'{color}' is not a valid hexadecimal value: {e}"))
}
