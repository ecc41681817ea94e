//! 拓扑图实体定义
//!
//! 字段名与 Zabbix `map.create` 请求保持一致，序列化结果可直接作为 RPC 参数。

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// 拓扑图元素引用的对象 (封闭集合)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementKind {
    /// 主机
    Host { hostid: String },
    /// 子拓扑图
    Map { sysmapid: String },
    /// 触发器
    Trigger { triggerid: String },
    /// 主机组
    HostGroup { groupid: String },
    /// 纯图片
    Image,
}

impl ElementKind {
    /// Zabbix `elementtype` 取值
    pub fn element_type(&self) -> u8 {
        match self {
            Self::Host { .. } => 0,
            Self::Map { .. } => 1,
            Self::Trigger { .. } => 2,
            Self::HostGroup { .. } => 3,
            Self::Image => 4,
        }
    }

    fn serialize_elements<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        struct Host<'a> {
            hostid: &'a str,
        }
        #[derive(Serialize)]
        struct Map<'a> {
            sysmapid: &'a str,
        }
        #[derive(Serialize)]
        struct Trigger<'a> {
            triggerid: &'a str,
        }
        #[derive(Serialize)]
        struct HostGroup<'a> {
            groupid: &'a str,
        }

        match self {
            Self::Host { hostid } => [Host { hostid }].serialize(serializer),
            Self::Map { sysmapid } => [Map { sysmapid }].serialize(serializer),
            Self::Trigger { triggerid } => [Trigger { triggerid }].serialize(serializer),
            Self::HostGroup { groupid } => [HostGroup { groupid }].serialize(serializer),
            Self::Image => serializer.collect_seq(std::iter::empty::<()>()),
        }
    }
}

/// 拓扑图元素 (selement)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selement {
    /// 元素 ID，在同一张图内唯一
    pub selementid: String,
    pub kind: ElementKind,
    /// 默认状态图标
    pub iconid_off: String,
    pub x: String,
    pub y: String,
}

impl Selement {
    /// 创建主机元素
    pub fn host(
        selementid: impl Into<String>,
        hostid: impl Into<String>,
        iconid_off: impl Into<String>,
        x: u32,
        y: u32,
    ) -> Self {
        Self {
            selementid: selementid.into(),
            kind: ElementKind::Host {
                hostid: hostid.into(),
            },
            iconid_off: iconid_off.into(),
            x: x.to_string(),
            y: y.to_string(),
        }
    }
}

impl Serialize for Selement {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Elements<'a>(&'a ElementKind);

        impl Serialize for Elements<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                self.0.serialize_elements(serializer)
            }
        }

        let mut state = serializer.serialize_struct("Selement", 6)?;
        state.serialize_field("selementid", &self.selementid)?;
        state.serialize_field("elements", &Elements(&self.kind))?;
        state.serialize_field("elementtype", &self.kind.element_type())?;
        state.serialize_field("iconid_off", &self.iconid_off)?;
        state.serialize_field("x", &self.x)?;
        state.serialize_field("y", &self.y)?;
        state.end()
    }
}

/// 链接上的触发器着色
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkTrigger {
    pub triggerid: String,
    pub color: String,
}

/// 两个元素之间的链接
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapLink {
    pub selementid1: String,
    pub selementid2: String,
    pub color: String,
    pub linktriggers: Vec<LinkTrigger>,
}

/// `map.create` 请求
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MapCreateRequest {
    pub name: String,
    pub width: String,
    pub height: String,
    pub selements: Vec<Selement>,
    pub links: Vec<MapLink>,
}

impl MapCreateRequest {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width: width.to_string(),
            height: height.to_string(),
            selements: Vec::new(),
            links: Vec::new(),
        }
    }

    /// 是否已存在给定 ID 的元素
    pub fn contains_element(&self, selementid: &str) -> bool {
        self.selements.iter().any(|e| e.selementid == selementid)
    }

    /// 序列化为 JSON
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
