//! 节点注册表
//!
//! 堆叠模式 (默认) 下同一主机只对应一个元素；关闭堆叠后，每条映射记录
//! (无论主机作为本端还是远端) 都为其生成一个新元素 `<hostid>-<n>`，n 从 1 开始，
//! 计数器按主机名共享。本端与远端为同一主机的记录只分配一个元素。

use std::collections::HashMap;

use zmb_core::{MapCreateRequest, Selement};

use crate::position::Position;

/// 单次构建内的元素注册表
#[derive(Debug, Clone)]
pub struct NodeRegistry {
    stack_hosts: bool,
    /// 主机名 -> 已出现次数
    occurrences: HashMap<String, u32>,
}

impl NodeRegistry {
    pub fn new(stack_hosts: bool) -> Self {
        Self {
            stack_hosts,
            occurrences: HashMap::new(),
        }
    }

    /// 为主机的一次出现分配元素 ID
    pub fn element_id(&mut self, host_name: &str, host_id: &str) -> String {
        if self.stack_hosts {
            return host_id.to_string();
        }

        let count = self.occurrences.entry(host_name.to_string()).or_insert(0);
        *count += 1;
        format!("{}-{}", host_id, count)
    }

    /// 为一条映射记录的两端分配元素 ID
    pub fn record_ids(
        &mut self,
        local_host: &str,
        local_host_id: &str,
        remote_host: &str,
        remote_host_id: &str,
    ) -> (String, String) {
        let local = self.element_id(local_host, local_host_id);
        let remote = if remote_host == local_host {
            local.clone()
        } else {
            self.element_id(remote_host, remote_host_id)
        };
        (local, remote)
    }

    /// 添加主机元素，已存在时不做任何事；返回是否真正插入
    ///
    /// 每次插入后布局游标前进一格，重复元素不占用格子。
    pub fn insert(
        &self,
        request: &mut MapCreateRequest,
        position: &mut Position,
        selementid: &str,
        host_id: &str,
        icon_id: &str,
    ) -> InsertOutcome {
        if request.contains_element(selementid) {
            return InsertOutcome::Existing;
        }

        request.selements.push(Selement::host(
            selementid,
            host_id,
            icon_id,
            position.x(),
            position.y(),
        ));

        if position.advance() {
            InsertOutcome::InsertedAndWrapped
        } else {
            InsertOutcome::Inserted
        }
    }
}

/// 插入结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    /// 已插入，且网格已用尽并回到起点
    InsertedAndWrapped,
    Existing,
}
