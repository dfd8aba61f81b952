//! The interactive console: a numbered menu over the registry, claimer,
//! and swap runner. Invalid input is reported and the menu re-presented;
//! the operation is never attempted.

use crate::client::ChainBackend;
use crate::config;
use crate::faucet::FaucetClaimer;
use crate::swap::SwapRunner;
use crate::wallets::WalletRegistry;
use anyhow::{Context, Result};
use core_logic::KeyStore;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use std::future::Future;
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

const MENU_ITEMS: &[&str] = &[
    "Show All Wallet Balances",
    "Claim Faucet (All Wallets)",
    "Auto Swap (All Wallets)",
    "Auto Swap (Single Wallet)",
    "Reload Private Keys",
    "Stop Running Operations",
    "Exit",
];

pub struct Console {
    backend: Arc<dyn ChainBackend>,
    registry: WalletRegistry,
    swapper: SwapRunner,
    claimer: FaucetClaimer,
    keys: KeyStore,
    cancel: CancellationToken,
}

impl Console {
    pub fn new(backend: Arc<dyn ChainBackend>, registry: WalletRegistry, keys: KeyStore) -> Self {
        Self {
            swapper: SwapRunner::new(backend.clone()),
            claimer: FaucetClaimer::new(backend.clone()),
            backend,
            registry,
            keys,
            cancel: CancellationToken::new(),
        }
    }

    /// Menu loop; returns on the exit choice.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            let choice = Select::with_theme(&ColorfulTheme::default())
                .with_prompt(format!("==== {} MULTI-WALLET BOT ====", config::NETWORK_NAME))
                .items(MENU_ITEMS)
                .default(0)
                .interact()
                .context("Console input unavailable")?;

            match choice {
                0 => self.registry.refresh_all(self.backend.as_ref()).await,
                1 => {
                    self.claimer.claim_all(&mut self.registry).await;
                }
                2 => self.swap_all().await,
                3 => self.swap_single().await,
                4 => self.reload_keys().await,
                5 => {
                    warn!("Stopping all running operations...");
                    self.cancel.cancel();
                }
                _ => {
                    info!("Exiting program");
                    return Ok(());
                }
            }
        }
    }

    async fn swap_all(&mut self) {
        let Some(cycles) = prompt_cycles("Enter number of swaps per wallet") else {
            return;
        };
        // Fresh token per fleet run: a stop requested during an earlier
        // operation must not bleed into this one.
        self.cancel = CancellationToken::new();
        let token = self.cancel.clone();
        with_ctrlc(
            token.clone(),
            self.swapper.run_all(&mut self.registry, cycles, &token),
        )
        .await;
    }

    async fn swap_single(&mut self) {
        if self.registry.is_empty() {
            error!("No wallets available");
            return;
        }

        let labels: Vec<String> = self
            .registry
            .iter()
            .enumerate()
            .map(|(i, wallet)| {
                format!(
                    "{}. {} (PRIOR: {})",
                    i + 1,
                    wallet.short_address(),
                    wallet.prior_display()
                )
            })
            .collect();

        let selection = Select::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Select wallet (1-{})", self.registry.len()))
            .items(&labels)
            .default(0)
            .interact();
        let Ok(index) = selection else {
            error!("Invalid wallet selection");
            return;
        };

        let Some(cycles) = prompt_cycles("Enter number of swaps") else {
            return;
        };

        // Single-wallet runs reuse the console's current token; only the
        // fleet driver resets it.
        let token = self.cancel.clone();
        with_ctrlc(
            token.clone(),
            self.swapper.run_wallet(&mut self.registry, index, cycles, &token),
        )
        .await;
    }

    async fn reload_keys(&mut self) {
        match WalletRegistry::load(&self.keys, self.registry.contracts()) {
            Ok(fresh) if fresh.is_empty() => {
                error!("No private keys found. Please add keys to your keys file.");
            }
            Ok(fresh) => {
                info!("Loading {} wallets...", fresh.len());
                self.registry = fresh;
                self.registry.refresh_all(self.backend.as_ref()).await;
            }
            Err(e) => error!("Error loading private keys: {:#}", e),
        }
    }
}

/// Runs `op` while a Ctrl+C listener cancels `token`; the listener dies
/// with the operation.
async fn with_ctrlc<F: Future>(token: CancellationToken, op: F) -> F::Output {
    let watcher = tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            warn!("Ctrl+C received. Stopping running operations...");
            token.cancel();
        }
    });
    let out = op.await;
    watcher.abort();
    out
}

fn prompt_cycles(prompt: &str) -> Option<u32> {
    let input = Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .interact_text();
    match input {
        Ok(raw) => match parse_cycles(&raw) {
            Ok(count) => Some(count),
            Err(reason) => {
                error!("Invalid number of swaps: {}", reason);
                None
            }
        },
        Err(e) => {
            error!("Console input unavailable: {}", e);
            None
        }
    }
}

/// Cycle counts must be whole numbers greater than zero.
pub fn parse_cycles(raw: &str) -> Result<u32, String> {
    let trimmed = raw.trim();
    match trimmed.parse::<u32>() {
        Ok(0) => Err("must be greater than zero".to_string()),
        Ok(count) => Ok(count),
        Err(_) => Err(format!("'{}' is not a valid count", trimmed)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_cycles_accepts_positive_integers() {
        assert_eq!(parse_cycles("5"), Ok(5));
        assert_eq!(parse_cycles("  12  "), Ok(12));
    }

    #[test]
    fn parse_cycles_rejects_zero_negative_and_junk() {
        assert!(parse_cycles("0").is_err());
        assert!(parse_cycles("-3").is_err());
        assert!(parse_cycles("abc").is_err());
        assert!(parse_cycles("2.5").is_err());
        assert!(parse_cycles("").is_err());
    }
}
