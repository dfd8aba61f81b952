//! Faucet claims: per-wallet cooldown check, claim transaction, and a
//! paced fleet-wide sweep.

use crate::client::ChainBackend;
use crate::wallets::WalletRegistry;
use colored::Colorize;
use ethers::prelude::*;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{error, info, warn};

/// Fixed pause between wallets in a fleet claim; keeps the node from rate
/// limiting the sweep.
pub const CLAIM_PACING: Duration = Duration::from_secs(3);

/// Remaining wait before `owner` may claim again, or `None` when a claim is
/// allowed right now. The cooldown is enforced by the remote contract; this
/// is recomputed on every attempt, never cached.
pub fn next_claim_wait(last_claim: U256, cooldown: U256, now: u64) -> Option<Duration> {
    let next_allowed = last_claim.saturating_add(cooldown);
    if U256::from(now) < next_allowed {
        let wait = next_allowed - U256::from(now);
        Some(Duration::from_secs(wait.min(U256::from(u64::MAX)).as_u64()))
    } else {
        None
    }
}

pub fn format_wait(wait: Duration) -> String {
    let secs = wait.as_secs();
    format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

pub struct FaucetClaimer {
    backend: Arc<dyn ChainBackend>,
    pacing: Duration,
}

impl FaucetClaimer {
    pub fn new(backend: Arc<dyn ChainBackend>) -> Self {
        Self {
            backend,
            pacing: CLAIM_PACING,
        }
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// One claim attempt. Returns true only when the claim transaction
    /// confirmed successfully; a still-running cooldown submits nothing.
    pub async fn claim(&self, registry: &mut WalletRegistry, index: usize) -> bool {
        let Some(wallet) = registry.get(index) else {
            error!("Wallet {}: no such wallet", index + 1);
            return false;
        };
        let address = wallet.address;
        let signer = wallet.signer().clone();

        let (last_claim, cooldown) = match self.read_cooldown(address).await {
            Ok(values) => values,
            Err(e) => {
                error!("Wallet {}: Claim error: {:#}", index + 1, e);
                return false;
            }
        };

        if let Some(wait) = next_claim_wait(last_claim, cooldown, unix_now()) {
            warn!(
                "Wallet {}: Must wait {} before claiming",
                index + 1,
                format_wait(wait)
            );
            return false;
        }

        info!("Wallet {}: Claiming PRIOR tokens...", index + 1);
        let handle = match self.backend.submit_claim(&signer).await {
            Ok(handle) => handle,
            Err(e) => {
                error!("Wallet {}: Claim error: {:#}", index + 1, e);
                return false;
            }
        };
        warn!("Wallet {}: Transaction sent: {}", index + 1, handle.short());

        // Claims wait for confirmation without a timeout bound, unlike swaps.
        match self.backend.await_confirmation(&handle, None).await {
            Ok(outcome) if outcome.success => {
                info!("Wallet {}: {}", index + 1, "Claim successful".green().bold());
                if let Err(e) = registry.refresh(self.backend.as_ref(), index).await {
                    warn!("Wallet {}: Balance refresh failed: {:#}", index + 1, e);
                }
                true
            }
            Ok(_) => {
                error!("Wallet {}: {}", index + 1, "Claim failed".red().bold());
                false
            }
            Err(e) => {
                error!("Wallet {}: Claim error: {}", index + 1, e);
                false
            }
        }
    }

    async fn read_cooldown(&self, address: Address) -> anyhow::Result<(U256, U256)> {
        let last_claim = self.backend.last_claim_time(address).await?;
        let cooldown = self.backend.claim_cooldown().await?;
        Ok((last_claim, cooldown))
    }

    /// Claims for every wallet in registry order, pausing between wallets
    /// (not after the last). Returns the success count.
    pub async fn claim_all(&self, registry: &mut WalletRegistry) -> usize {
        info!(
            "Attempting to claim faucet for all {} wallets",
            registry.len()
        );

        let mut successes = 0;
        for i in 0..registry.len() {
            if self.claim(registry, i).await {
                successes += 1;
            }
            if i + 1 < registry.len() {
                tokio::time::sleep(self.pacing).await;
            }
        }

        info!(
            "Completed claims for {}/{} wallets",
            successes,
            registry.len()
        );
        successes
    }
}
