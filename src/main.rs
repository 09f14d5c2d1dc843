//! signer-gateway command line.
//!
//! Inspects the configured networks and follows transactions on a node.
//! Signing itself needs a wallet provider and is driven through the library.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use signer_gateway::account::AccountStore;
use signer_gateway::blockchain::{ExplorerLinks, LinkKind, Network, NetworkRegistry, NodeClient};
use signer_gateway::config::{load_config, GatewayConfig};
use signer_gateway::observability::init_logging;

#[derive(Parser)]
#[command(name = "signer-gateway")]
#[command(about = "Network registry and transaction status tool", long_about = None)]
struct Cli {
    /// TOML configuration file; built-in networks are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List configured networks
    Networks,
    /// Resolve a chain byte to a network
    Resolve { byte: i64 },
    /// Show the network of the first address in a path
    NetworkOf { path: String },
    /// Print the explorer link for a transaction
    Link { network: String, id: String },
    /// Fetch the current status of a transaction
    Status { network: String, id: String },
    /// Wait until a transaction is on chain
    Wait { network: String, id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => GatewayConfig::default(),
    };
    init_logging(&config.observability)?;

    let registry = Arc::new(NetworkRegistry::from_config(&config)?);
    tracing::debug!(networks = registry.len(), "Network registry built");

    match cli.command {
        Commands::Networks => {
            for network in registry.iter() {
                let marker = if network.id == registry.default_network().id { "*" } else { " " };
                println!(
                    "{} {:<10} {} {:<40} {}",
                    marker,
                    network.id,
                    network.chain_byte.as_char(),
                    network.node_url,
                    network
                        .provider_origin
                        .as_ref()
                        .map(|u| u.as_str())
                        .unwrap_or("(keeper only)")
                );
            }
        }
        Commands::Resolve { byte } => match registry.resolve_byte(byte)? {
            Some(network) => println!("{}", network.id),
            None => println!("unknown"),
        },
        Commands::NetworkOf { path } => {
            let accounts = AccountStore::new(Arc::clone(&registry), &config.account);
            match accounts.network_for_address(&path) {
                Some(network) => println!("{}", network.id),
                None => println!("{} (default)", registry.default_network().id),
            }
        }
        Commands::Link { network, id } => {
            let network = lookup(&registry, &network)?;
            let links = ExplorerLinks::new(&config.explorer);
            println!("{}", links.link(&network.explorer_code, &id, LinkKind::Tx));
        }
        Commands::Status { network, id } => {
            let network = lookup(&registry, &network)?;
            let client = NodeClient::new(config.confirmation.clone())?;
            match client.transaction_info(&network.node_url, &id).await? {
                Some(status) => println!("{}", serde_json::to_string_pretty(&status)?),
                None => println!("pending"),
            }
        }
        Commands::Wait { network, id } => {
            let network = lookup(&registry, &network)?;
            let client = NodeClient::new(config.confirmation.clone())?;
            let status = client.wait_for(&network.node_url, &id).await?;
            if status.is_script_failure() {
                eprintln!("Script execution failed");
            }
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
    }

    Ok(())
}

fn lookup<'a>(registry: &'a NetworkRegistry, id: &str) -> Result<&'a Network, Box<dyn std::error::Error>> {
    registry
        .get(id)
        .ok_or_else(|| format!("Unknown network: {}", id).into())
}
