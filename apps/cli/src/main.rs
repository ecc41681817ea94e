//! Zabbix Map Builder CLI
//!
//! `create` 根据主机映射文件在 Zabbix 上创建拓扑图，
//! `generate` 通过 SNMP 读取路由器的 CDP 邻居生成映射文件。

mod config;
mod create;
mod generate;
mod output;
mod prompt;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::create::CreateArgs;
use crate::generate::GenerateArgs;

const DEFAULT_FILTER: &str = "zabbix_map_builder=warn,zmb_map=warn,zmb_api=warn,zmb_snmp=warn";
const DEBUG_FILTER: &str = "zabbix_map_builder=debug,zmb_map=debug,zmb_api=debug,zmb_snmp=debug";

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Build a Zabbix map using the given host mapping",
    long_about = None
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Write the map definition (or the generated mappings) to this file
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a Zabbix map on the server using the given host mapping
    Create(CreateArgs),
    /// Generate a host mapping from the CDP neighbors of a router
    Generate(GenerateArgs),
}

fn init_tracing(debug: bool) {
    let default = if debug { DEBUG_FILTER } else { DEFAULT_FILTER };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match cli.command {
        Command::Create(args) => create::run(args, cli.output).await,
        Command::Generate(args) => generate::run(args, cli.output).await,
    }
}
