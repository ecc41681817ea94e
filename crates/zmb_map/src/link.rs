//! 链接构建

use zmb_core::{LinkTrigger, MapLink};

/// 构建本端到远端的链接，两个触发器 (先本端后远端) 均使用 `trigger_color`
pub fn build_link(
    local_element: &str,
    local_trigger: &str,
    remote_element: &str,
    remote_trigger: &str,
    link_color: &str,
    trigger_color: &str,
) -> MapLink {
    MapLink {
        selementid1: local_element.to_string(),
        selementid2: remote_element.to_string(),
        color: link_color.to_string(),
        linktriggers: vec![
            LinkTrigger {
                triggerid: local_trigger.to_string(),
                color: trigger_color.to_string(),
            },
            LinkTrigger {
                triggerid: remote_trigger.to_string(),
                color: trigger_color.to_string(),
            },
        ],
    }
}
