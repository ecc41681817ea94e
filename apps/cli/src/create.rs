//! `create` 子命令

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Args, ValueEnum};
use zmb_api::{ZabbixClient, ZabbixConfig};
use zmb_core::{load_mappings, unique_hosts, unique_images, MapCreateRequest};
use zmb_map::{
    build_map, publish_map, BuildStage, ConflictPolicy, FixedPolicy, MapOptions,
    MissingHostPolicy, Resolution,
};

use crate::config::ServerConfig;
use crate::output::write_json;
use crate::prompt::PromptPolicy;

/// 同名拓扑图已存在时的处理方式
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OnConflict {
    /// Ask on the terminal
    Ask,
    /// Delete the existing map
    Replace,
    /// Append a random suffix to the new map name
    Rename,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Name of the map
    #[arg(long)]
    pub name: String,

    /// File containing the hosts mapping
    #[arg(short, long)]
    pub file: PathBuf,

    /// Hexadecimal color of the links between hosts
    #[arg(short, long, default_value = "000000")]
    pub color: String,

    /// Hexadecimal color of a link while one of its triggers is in problem state
    #[arg(long, default_value = "DD0000")]
    pub trigger_color: String,

    /// Height of the map in pixels
    #[arg(long, default_value_t = 800)]
    pub height: u32,

    /// Width of the map in pixels
    #[arg(long, default_value_t = 800)]
    pub width: u32,

    /// Space in pixels between two hosts
    #[arg(long, default_value_t = 100)]
    pub spacer: u32,

    /// Share a single element per host between links. With false, every mapping gets its own pair of hosts
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub stack_hosts: bool,

    /// Print the map definition without creating it on the server
    #[arg(long)]
    pub dry_run: bool,

    /// What to do when a map with the same name already exists
    #[arg(long, value_enum, default_value_t = OnConflict::Ask)]
    pub on_conflict: OnConflict,

    /// Skip mappings whose hosts are unknown to the server instead of aborting
    #[arg(long)]
    pub skip_missing: bool,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,
}

impl CreateArgs {
    fn map_options(&self) -> MapOptions {
        MapOptions {
            name: self.name.clone(),
            link_color: self.color.clone(),
            trigger_link_color: self.trigger_color.clone(),
            width: self.width,
            height: self.height,
            spacer: self.spacer,
            stack_hosts: self.stack_hosts,
            missing_host_policy: if self.skip_missing {
                MissingHostPolicy::Skip
            } else {
                MissingHostPolicy::Abort
            },
            ..Default::default()
        }
    }

    fn conflict_policy(&self) -> Box<dyn ConflictPolicy> {
        match self.on_conflict {
            OnConflict::Ask => Box::new(PromptPolicy::stdin()),
            OnConflict::Replace => Box::new(FixedPolicy(Resolution::Replace)),
            OnConflict::Rename => Box::new(FixedPolicy(Resolution::Rename)),
        }
    }
}

pub async fn run(args: CreateArgs, output: Option<PathBuf>) -> anyhow::Result<()> {
    let mappings = load_mappings(&args.file)
        .with_context(|| format!("error while reading file '{}'", args.file.display()))?;
    tracing::debug!(file = %args.file.display(), count = mappings.len(), "mappings loaded");

    let server = ServerConfig::from_env()?;
    tracing::debug!(url = %server.url, user = %server.user, "using server configuration");

    let mut options = args.map_options();
    options.mappings = mappings;

    let config = ZabbixConfig {
        timeout: Duration::from_secs(args.timeout),
        ..ZabbixConfig::new(server.url.clone())
    };
    let mut client = ZabbixClient::connect(config)
        .await
        .context("error while checking the Zabbix API")?;
    client
        .login(&server.user, &server.password)
        .await
        .context("error while logging in to the Zabbix API")?;

    let result = create_map(&client, &args, options, output).await;
    if let Err(e) = &result {
        tracing::debug!(stage = %BuildStage::Failed, error = %e, "map creation failed");
    }

    match (result, client.logout().await) {
        (Ok(()), Err(e)) => Err(e).context("error while logging out of the Zabbix API"),
        (result, logout) => {
            if let Err(e) = logout {
                tracing::warn!(error = %e, "logout failed");
            }
            result
        }
    }
}

async fn create_map(
    client: &ZabbixClient,
    args: &CreateArgs,
    mut options: MapOptions,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    options.hosts = client
        .host_ids(&unique_hosts(&options.mappings))
        .await
        .context("error while retrieving host ids")?;
    options.images = client
        .image_ids(&unique_images(&options.mappings))
        .await
        .context("error while retrieving image ids")?;

    let mut request = build_map(client, &mut options)
        .await
        .context("error while building the map")?;

    if emit(&request, output.as_deref(), args.dry_run)? {
        return Ok(());
    }

    let policy = args.conflict_policy();
    let sysmapid = publish_map(client, policy.as_ref(), &mut request)
        .await
        .context("error while creating the map")?;

    println!("map '{}' created with id {}", request.name, sysmapid);
    Ok(())
}

/// 写出 `--output` 文件；dry-run 时打印请求并返回 `true`
fn emit(
    request: &MapCreateRequest,
    output: Option<&std::path::Path>,
    dry_run: bool,
) -> anyhow::Result<bool> {
    if let Some(path) = output {
        write_json(path, request)
            .with_context(|| format!("error while writing '{}'", path.display()))?;
    }

    if dry_run {
        println!("{}", request.to_json()?);
    }

    Ok(dry_run)
}
