//! 同名拓扑图冲突处理
//!
//! 服务器上已存在同名拓扑图时，由注入的策略决定删除旧图 (`Replace`)
//! 还是给新图名追加随机数字后缀 (`Rename`)。

use async_trait::async_trait;
use rand::Rng;
use zmb_core::{MapBuilderError, MapCreateRequest, Result};

use crate::builder::BuildStage;

/// 重命名后仍然冲突时的最大重试次数
const MAX_RENAME_ATTEMPTS: usize = 5;

/// 冲突处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// 删除已有拓扑图，保留原名
    Replace,
    /// 在名称后追加 `-<随机数>`
    Rename,
}

/// 冲突策略 (命令行参数或交互式询问)
pub trait ConflictPolicy: Send + Sync {
    fn choose(&self, name: &str) -> Resolution;
}

/// 固定策略
#[derive(Debug, Clone, Copy)]
pub struct FixedPolicy(pub Resolution);

impl ConflictPolicy for FixedPolicy {
    fn choose(&self, _name: &str) -> Resolution {
        self.0
    }
}

/// 服务器上的拓扑图目录
#[async_trait]
pub trait MapDirectory: Send + Sync {
    /// 按名称精确查找，返回 sysmapid
    async fn find_map(&self, name: &str) -> Result<Option<String>>;

    async fn delete_map(&self, sysmapid: &str) -> Result<()>;

    /// 创建拓扑图，返回 sysmapid
    async fn create_map(&self, request: &MapCreateRequest) -> Result<String>;
}

/// 是否存在冲突以及如何处理；不存在时返回 `None`
pub fn decide(exists: bool, name: &str, policy: &dyn ConflictPolicy) -> Option<Resolution> {
    exists.then(|| policy.choose(name))
}

/// 生成 `<name>-<n>`
pub fn rename_with_suffix<R: Rng + ?Sized>(name: &str, rng: &mut R) -> String {
    format!("{}-{}", name, rng.gen_range(1..10_000))
}

/// 解决名称冲突，可能修改 `request.name` 或删除服务器上的旧图
pub async fn resolve_conflict(
    directory: &dyn MapDirectory,
    policy: &dyn ConflictPolicy,
    request: &mut MapCreateRequest,
) -> Result<Option<Resolution>> {
    tracing::debug!(
        stage = %BuildStage::ExistenceCheck,
        name = %request.name,
        "checking for an existing map"
    );

    let Some(existing) = directory.find_map(&request.name).await? else {
        return Ok(None);
    };

    let resolution = decide(true, &request.name, policy);
    match resolution {
        Some(Resolution::Replace) => {
            tracing::info!(sysmapid = %existing, name = %request.name, "removing the existing map");
            directory.delete_map(&existing).await?;
        }
        Some(Resolution::Rename) => {
            let original = request.name.clone();
            let mut attempts = 0;
            loop {
                if attempts == MAX_RENAME_ATTEMPTS {
                    return Err(MapBuilderError::Conflict(format!(
                        "could not find a free name for map '{original}' after {MAX_RENAME_ATTEMPTS} attempts"
                    )));
                }
                attempts += 1;

                let candidate = rename_with_suffix(&original, &mut rand::thread_rng());
                if directory.find_map(&candidate).await?.is_none() {
                    tracing::info!(from = %original, to = %candidate, "renaming the new map");
                    request.name = candidate;
                    break;
                }
            }
        }
        None => {}
    }

    Ok(resolution)
}

/// 处理冲突后在服务器上创建拓扑图，返回 sysmapid
pub async fn publish_map(
    directory: &dyn MapDirectory,
    policy: &dyn ConflictPolicy,
    request: &mut MapCreateRequest,
) -> Result<String> {
    resolve_conflict(directory, policy, request).await?;

    tracing::debug!(
        stage = %BuildStage::Creating,
        name = %request.name,
        "creating the map on the server"
    );
    let sysmapid = directory.create_map(request).await?;
    tracing::info!(
        stage = %BuildStage::Done,
        sysmapid = %sysmapid,
        name = %request.name,
        "map created"
    );
    Ok(sysmapid)
}
