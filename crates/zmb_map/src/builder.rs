//! 拓扑图组装
//!
//! 按输入顺序遍历映射：分配元素 ID、放置节点、解析两端触发器、追加链接。
//! 任何一步失败都会中止整个构建，不会返回半成品。

use std::fmt;

use zmb_core::{MapBuilderError, MapCreateRequest, Mapping, Result};

use crate::link::build_link;
use crate::options::{MapOptions, MissingHostPolicy};
use crate::position::Position;
use crate::registry::{InsertOutcome, NodeRegistry};
use crate::trigger::{resolve_trigger, TriggerSource};

/// 一次运行所处的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStage {
    Validating,
    Building,
    ExistenceCheck,
    Creating,
    Done,
    Failed,
}

impl fmt::Display for BuildStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validating => "validating",
            Self::Building => "building",
            Self::ExistenceCheck => "existence-check",
            Self::Creating => "creating",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// 一条映射两端解析出的服务器 ID
struct EndpointIds<'a> {
    local_host: &'a str,
    local_image: &'a str,
    remote_host: &'a str,
    remote_image: &'a str,
}

fn lookup<'a>(
    table: &'a std::collections::HashMap<String, String>,
    kind: &str,
    name: &str,
) -> Result<&'a str> {
    match table.get(name) {
        Some(id) if !id.is_empty() => Ok(id.as_str()),
        _ => Err(MapBuilderError::Lookup(format!(
            "no {kind} id was found for '{name}'"
        ))),
    }
}

fn endpoint_ids<'a>(options: &'a MapOptions, mapping: &Mapping) -> Result<EndpointIds<'a>> {
    Ok(EndpointIds {
        local_host: lookup(&options.hosts, "host", &mapping.local_host)?,
        local_image: lookup(&options.images, "image", &mapping.local_image)?,
        remote_host: lookup(&options.hosts, "host", &mapping.remote_host)?,
        remote_image: lookup(&options.images, "image", &mapping.remote_image)?,
    })
}

/// 校验选项并构建 `map.create` 请求
///
/// 校验失败时不会访问 `source`。空颜色会被写回默认值。
pub async fn build_map(
    source: &dyn TriggerSource,
    options: &mut MapOptions,
) -> Result<MapCreateRequest> {
    tracing::debug!(stage = %BuildStage::Validating, "validating the map options");
    options.validate()?;

    tracing::debug!(
        stage = %BuildStage::Building,
        name = %options.name,
        mappings = options.mappings.len(),
        stack_hosts = options.stack_hosts,
        "building the map"
    );

    let options: &MapOptions = options;
    let mut request = MapCreateRequest::new(&options.name, options.width, options.height);
    let mut position = Position::new(options.width, options.height, options.spacer);
    let mut registry = NodeRegistry::new(options.stack_hosts);
    let mut wrap_reported = false;

    for mapping in &options.mappings {
        let ids = match endpoint_ids(options, mapping) {
            Ok(ids) => ids,
            Err(e) => match options.missing_host_policy {
                MissingHostPolicy::Abort => return Err(e),
                MissingHostPolicy::Skip => {
                    tracing::warn!(
                        local_host = %mapping.local_host,
                        remote_host = %mapping.remote_host,
                        "skipping mapping: {e}"
                    );
                    continue;
                }
            },
        };

        let (local_element, remote_element) = registry.record_ids(
            &mapping.local_host,
            ids.local_host,
            &mapping.remote_host,
            ids.remote_host,
        );

        for (element, host_id, image_id) in [
            (&local_element, ids.local_host, ids.local_image),
            (&remote_element, ids.remote_host, ids.remote_image),
        ] {
            let outcome = registry.insert(&mut request, &mut position, element, host_id, image_id);
            if outcome == InsertOutcome::InsertedAndWrapped && !wrap_reported {
                tracing::warn!(
                    capacity = position.capacity(),
                    "map grid is full, next hosts will overlap existing ones"
                );
                wrap_reported = true;
            }
        }

        let local_trigger =
            resolve_trigger(source, ids.local_host, &mapping.local_trigger_pattern).await?;
        let remote_trigger =
            resolve_trigger(source, ids.remote_host, &mapping.remote_trigger_pattern).await?;

        request.links.push(build_link(
            &local_element,
            &local_trigger,
            &remote_element,
            &remote_trigger,
            &options.link_color,
            &options.trigger_link_color,
        ));
    }

    tracing::debug!(
        selements = request.selements.len(),
        links = request.links.len(),
        "map request built"
    );

    Ok(request)
}
