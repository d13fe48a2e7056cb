mod client;
mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use netplan_core::RoutingProtocol;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "netplan")]
#[command(about = "Subnet partitioning and router addressing", long_about = None)]
struct Cli {
    /// Planner API URL (http://...) or Unix socket path. Plans are computed locally when omitted.
    #[arg(long, short = 'u', global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a plan file skeleton with N unconnected routers
    Init {
        /// Number of routers
        #[arg(long)]
        routers: usize,
        /// Base network address
        #[arg(long, default_value = "10.0.0.0")]
        network: String,
        /// Prefix length of the base network
        #[arg(long, default_value_t = 8)]
        prefix: u8,
        /// Prefix length of the subnets handed out
        #[arg(long, default_value_t = 24)]
        new_prefix: u8,
        /// Routing protocol (rip, ospf, eigrp)
        #[arg(long)]
        protocol: Option<RoutingProtocol>,
        /// AS number or OSPF process id
        #[arg(long)]
        as_number: Option<u32>,
        /// Serve two LAN subnets over DHCP on every router
        #[arg(long)]
        dhcp: bool,
        /// Output file (stdout when omitted)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
    /// Split a network into subnets
    Partition {
        /// Network address (e.g., 10.0.0.0)
        #[arg(long)]
        network: String,
        /// Original prefix length (e.g., 16)
        #[arg(long)]
        prefix: u8,
        /// New prefix length (e.g., 24)
        #[arg(long)]
        new_prefix: u8,
    },
    /// Compute addressing for a plan file and print the addressing table
    Plan {
        /// Plan file (YAML)
        file: PathBuf,
    },
    /// Compute addressing for a plan file and print device configuration
    Render {
        /// Plan file (YAML)
        file: PathBuf,
        /// Only print this router
        #[arg(long)]
        router: Option<String>,
    },
    /// Check that the planner API is reachable
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = cli.api_url.as_deref().map(client::ApiClient::from_target);

    match cli.command {
        Commands::Init {
            routers,
            network,
            prefix,
            new_prefix,
            protocol,
            as_number,
            dhcp,
            output,
        } => {
            let request = commands::init::scaffold(
                routers, network, prefix, new_prefix, protocol, as_number, dhcp,
            );
            commands::init::write(&request, output.as_deref())?;
        }
        Commands::Partition {
            network,
            prefix,
            new_prefix,
        } => {
            commands::partition::run(client.as_ref(), network, prefix, new_prefix).await?;
        }
        Commands::Plan { file } => {
            commands::plan::run(client.as_ref(), &file).await?;
        }
        Commands::Render { file, router } => {
            commands::render::run(client.as_ref(), &file, router.as_deref()).await?;
        }
        Commands::Status => {
            let client = client
                .unwrap_or_else(|| client::ApiClient::new_unix(client::DEFAULT_SOCKET));
            commands::status::run(&client).await?;
        }
    }

    Ok(())
}
