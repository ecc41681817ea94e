//! `generate` 子命令

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Args;
use zmb_core::Mapping;
use zmb_map::{generate_mappings, GenerateOptions};
use zmb_snmp::{CdpDiscovery, Discovery, SnmpSession};

use crate::output::write_json;

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Router to query
    #[arg(long)]
    pub host: String,

    /// SNMPv2c community
    #[arg(short, long)]
    pub community: String,

    /// SNMP port
    #[arg(short, long, default_value_t = 161)]
    pub port: u16,

    /// Trigger pattern used for both ends, '#INTERFACE' is replaced by the interface name
    #[arg(long, default_value = "")]
    pub trigger_pattern: String,

    /// Image of the local host
    #[arg(long, default_value = "Switch_(64)")]
    pub local_host_image: String,

    /// Image of the remote hosts
    #[arg(long, default_value = "Switch_(64)")]
    pub remote_host_image: String,

    /// SNMP timeout in seconds
    #[arg(long, default_value_t = 2)]
    pub timeout: u64,
}

impl GenerateArgs {
    fn options(&self) -> GenerateOptions {
        GenerateOptions {
            trigger_pattern: self.trigger_pattern.clone(),
            local_image: self.local_host_image.clone(),
            remote_image: self.remote_host_image.clone(),
        }
    }
}

pub async fn run(args: GenerateArgs, output: Option<PathBuf>) -> anyhow::Result<()> {
    let host = args.host.clone();
    let community = args.community.clone();
    let port = args.port;
    let timeout = Duration::from_secs(args.timeout);

    // snmp::SyncSession 是阻塞的
    let discovery: Discovery = tokio::task::spawn_blocking(move || {
        let session = SnmpSession::connect(&host, port, &community, timeout)?;
        CdpDiscovery::new(session).discover()
    })
    .await
    .context("SNMP discovery task failed")?
    .with_context(|| format!("error while discovering the CDP neighbors of '{}'", args.host))?;

    let mappings = generate_mappings(&discovery.neighbors, &discovery.hostname, &args.options());
    tracing::debug!(hostname = %discovery.hostname, count = mappings.len(), "mappings generated");

    emit(&mappings, output)
}

fn emit(mappings: &[Mapping], output: Option<PathBuf>) -> anyhow::Result<()> {
    match output {
        Some(path) => write_json(&path, mappings)
            .with_context(|| format!("error while writing '{}'", path.display())),
        None => {
            println!("{}", serde_json::to_string_pretty(mappings)?);
            Ok(())
        }
    }
}
