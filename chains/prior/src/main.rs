use anyhow::Result;
use clap::Parser;
use core_logic::{setup_logger, KeyStore};
use dotenv::dotenv;
use prior_project::client::{ChainBackend, RpcClient};
use prior_project::config::{self, PriorConfig};
use prior_project::menu::Console;
use prior_project::wallets::WalletRegistry;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the newline-delimited private keys file (overrides KEYS_FILE)
    #[arg(short, long)]
    keys_file: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _log_guard = setup_logger();
    // Keep guard alive for file logging
    std::mem::forget(_log_guard);
    dotenv().ok();

    let args = Args::parse();

    println!("\n=== {} MULTI-WALLET BOT ===", config::NETWORK_NAME);
    println!("Network: {}", config::NETWORK_NAME);

    let cfg = match PriorConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Configuration error: {:#}", e);
            std::process::exit(1);
        }
    };

    let store = match args.keys_file {
        Some(path) => KeyStore::new(path),
        None => KeyStore::from_env(),
    };

    let backend: Arc<dyn ChainBackend> = match RpcClient::connect(&cfg.rpc_url, cfg.contracts) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            error!("Failed to set up RPC client: {:#}", e);
            std::process::exit(1);
        }
    };

    let mut registry = match WalletRegistry::load(&store, cfg.contracts) {
        Ok(registry) => registry,
        Err(e) => {
            error!("Error loading private keys: {:#}", e);
            std::process::exit(1);
        }
    };
    if registry.is_empty() {
        error!(
            "No private keys found. Please add keys to {} and restart",
            store.path().display()
        );
        std::process::exit(1);
    }

    info!("Loading {} wallets...", registry.len());
    registry.refresh_all(backend.as_ref()).await;

    let mut console = Console::new(backend, registry, store);
    console.run().await?;

    Ok(())
}
