//! The swap orchestrator: per-wallet approve+swap cycle driver and the
//! sequential fleet driver. No retries anywhere; a timed-out or failed
//! cycle is abandoned and the run moves on.

use crate::client::{ChainBackend, RouterCall};
use crate::config::{self, Contracts};
use crate::wallets::WalletRegistry;
use anyhow::{Context, Result};
use colored::Colorize;
use core_logic::{jitter_range, sleep_cancellable, TxError};
use ethers::prelude::*;
use ethers::utils::format_units;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Per-cycle input cap: 0.005 PRIOR in wei.
pub const SWAP_CEILING_WEI: U256 = U256([5_000_000_000_000_000, 0, 0, 0]);

// Never spend more than 4/5 of the cached balance in one cycle; protects
// against overdraft from a stale balance read.
const SAFETY_NUM: u64 = 4;
const SAFETY_DEN: u64 = 5;

/// Exact integer policy: `min(ceiling, balance * 4/5)`. No floats touch
/// amounts that go on the wire.
pub fn swap_amount(cached_balance: U256) -> U256 {
    let capped = cached_balance.saturating_mul(U256::from(SAFETY_NUM)) / U256::from(SAFETY_DEN);
    SWAP_CEILING_WEI.min(capped)
}

/// Output token for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapTarget {
    Usdc,
    Usdt,
}

impl SwapTarget {
    /// Odd cycles swap to USDC, even cycles to USDT (1-indexed).
    pub fn for_cycle(cycle: u32) -> Self {
        if cycle % 2 == 1 {
            SwapTarget::Usdc
        } else {
            SwapTarget::Usdt
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            SwapTarget::Usdc => "USDC",
            SwapTarget::Usdt => "USDT",
        }
    }

    pub fn call(&self, amount: U256) -> RouterCall {
        match self {
            SwapTarget::Usdc => RouterCall::swap_prior_to_usdc(amount),
            SwapTarget::Usdt => RouterCall::swap_prior_to_usdt(amount),
        }
    }
}

/// Timing knobs for the orchestrator. Defaults match production pacing;
/// tests zero the delays.
#[derive(Debug, Clone)]
pub struct SwapSettings {
    pub confirm_timeout: Duration,
    pub cycle_delay_min: Duration,
    pub cycle_delay_max: Duration,
    pub wallet_delay_min: Duration,
    pub wallet_delay_max: Duration,
    /// Balances are refreshed every Nth cycle and on the final one.
    pub refresh_every: u32,
}

impl Default for SwapSettings {
    fn default() -> Self {
        Self {
            confirm_timeout: Duration::from_secs(10),
            cycle_delay_min: Duration::from_secs(5),
            cycle_delay_max: Duration::from_secs(15),
            wallet_delay_min: Duration::from_secs(2),
            wallet_delay_max: Duration::from_secs(4),
            refresh_every: 3,
        }
    }
}

pub struct SwapRunner {
    backend: Arc<dyn ChainBackend>,
    settings: SwapSettings,
}

impl SwapRunner {
    pub fn new(backend: Arc<dyn ChainBackend>) -> Self {
        Self {
            backend,
            settings: SwapSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: SwapSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Runs up to `cycles` approve+swap cycles for one wallet. Returns true
    /// when the run finished without a top-level error; abandoned cycles
    /// are not failures.
    pub async fn run_wallet(
        &self,
        registry: &mut WalletRegistry,
        index: usize,
        cycles: u32,
        cancel: &CancellationToken,
    ) -> bool {
        match self.drive_wallet(registry, index, cycles, cancel).await {
            Ok(()) => {
                info!("Wallet {}: Swap operations completed", index + 1);
                true
            }
            Err(e) => {
                error!("Wallet {}: {:#}", index + 1, e);
                false
            }
        }
    }

    async fn drive_wallet(
        &self,
        registry: &mut WalletRegistry,
        index: usize,
        cycles: u32,
        cancel: &CancellationToken,
    ) -> Result<()> {
        let contracts = registry.contracts();
        let (address, signer) = {
            let wallet = registry
                .get(index)
                .with_context(|| format!("Wallet index {} out of bounds", index))?;
            (wallet.address, wallet.signer().clone())
        };

        info!("Wallet {}: Starting {} swap cycles", index + 1, cycles);

        // One balance read at the start of the run; cycles reuse this cached
        // value until a periodic refresh updates it.
        let mut prior_balance = self
            .backend
            .token_balance(contracts.prior, address)
            .await
            .context("Failed to read PRIOR balance")?;
        info!(
            "Wallet {}: Current PRIOR balance: {}",
            index + 1,
            format_units(prior_balance, config::PRIOR_DECIMALS)
                .unwrap_or_else(|_| prior_balance.to_string())
        );

        if prior_balance.is_zero() {
            warn!("Wallet {}: No PRIOR balance to swap", index + 1);
            return Ok(());
        }

        for cycle in 1..=cycles {
            if cancel.is_cancelled() {
                info!("Wallet {}: Cancelled, stopping swap cycles", index + 1);
                break;
            }

            let target = SwapTarget::for_cycle(cycle);
            let amount = swap_amount(prior_balance);

            match self
                .attempt_cycle(&signer, contracts, index, cycle, cycles, target, amount)
                .await
            {
                Ok(true) => {
                    if cycle % self.settings.refresh_every == 0 || cycle == cycles {
                        match registry.refresh(self.backend.as_ref(), index).await {
                            Ok(()) => {
                                if let Some(wallet) = registry.get(index) {
                                    prior_balance = wallet.balance_prior;
                                }
                            }
                            Err(e) => {
                                warn!("Wallet {}: Balance refresh failed: {:#}", index + 1, e)
                            }
                        }
                    }
                }
                // Abandoned cycle, already logged; no retry.
                Ok(false) => {}
                Err(e) => warn!("Wallet {}: Swap error: {:#}", index + 1, e),
            }

            if cycle < cycles && !cancel.is_cancelled() {
                let delay = jitter_range(self.settings.cycle_delay_min, self.settings.cycle_delay_max);
                info!(
                    "Wallet {}: Waiting {}s before next swap",
                    index + 1,
                    delay.as_secs()
                );
                sleep_cancellable(delay, cancel).await;
            }
        }

        Ok(())
    }

    /// One approve+swap attempt. `Ok(true)` = swap confirmed, `Ok(false)` =
    /// cycle abandoned (timeout or on-chain failure), `Err` = submission
    /// error (also treated as abandonment by the caller).
    #[allow(clippy::too_many_arguments)]
    async fn attempt_cycle(
        &self,
        signer: &LocalWallet,
        contracts: Contracts,
        index: usize,
        cycle: u32,
        cycles: u32,
        target: SwapTarget,
        amount: U256,
    ) -> Result<bool> {
        let amount_display = format_units(amount, config::PRIOR_DECIMALS)
            .unwrap_or_else(|_| amount.to_string());

        info!(
            "Wallet {}: Approving {} PRIOR for swap",
            index + 1,
            amount_display
        );
        let approve = self
            .backend
            .submit_approve(signer, contracts.prior, contracts.router, amount)
            .await
            .context("Approval submission failed")?;
        info!("Wallet {}: Approval sent: {}", index + 1, approve.short());

        match self
            .backend
            .await_confirmation(&approve, Some(self.settings.confirm_timeout))
            .await
        {
            Ok(outcome) if outcome.success => {}
            Ok(_) => {
                error!("Wallet {}: Approval failed, skipping cycle", index + 1);
                return Ok(false);
            }
            Err(TxError::ConfirmationTimeout { .. }) => {
                warn!(
                    "Wallet {}: Approval timeout, moving to next cycle",
                    index + 1
                );
                return Ok(false);
            }
            Err(e) => {
                error!("Wallet {}: Approval error: {}", index + 1, e);
                return Ok(false);
            }
        }

        info!(
            "Wallet {}: Swapping {} PRIOR to {}",
            index + 1,
            amount_display,
            target.symbol()
        );
        let swap = self
            .backend
            .submit_swap(signer, target.call(amount))
            .await
            .context("Swap submission failed")?;
        info!(
            "Wallet {}: Swap transaction sent: {}",
            index + 1,
            swap.short()
        );

        match self
            .backend
            .await_confirmation(&swap, Some(self.settings.confirm_timeout))
            .await
        {
            Ok(outcome) if outcome.success => {
                info!(
                    "Wallet {}: {} ({}/{})",
                    index + 1,
                    format!("Swap to {} successful", target.symbol()).green().bold(),
                    cycle,
                    cycles
                );
                Ok(true)
            }
            Ok(_) => {
                error!(
                    "Wallet {}: Swap to {} failed",
                    index + 1,
                    target.symbol()
                );
                Ok(false)
            }
            Err(TxError::ConfirmationTimeout { .. }) => {
                warn!("Wallet {}: Swap timeout, moving to next cycle", index + 1);
                Ok(false)
            }
            Err(e) => {
                error!("Wallet {}: Swap error: {}", index + 1, e);
                Ok(false)
            }
        }
    }

    /// Fleet driver: every wallet in registry order, strictly sequential.
    /// The caller hands in a fresh token per run.
    pub async fn run_all(
        &self,
        registry: &mut WalletRegistry,
        cycles: u32,
        cancel: &CancellationToken,
    ) {
        if registry.is_empty() {
            error!("No wallets available");
            return;
        }

        info!(
            "Starting auto swap for all {} wallets, {} swaps each",
            registry.len(),
            cycles
        );

        for i in 0..registry.len() {
            if cancel.is_cancelled() {
                info!("Auto swap cancelled");
                break;
            }
            info!("Processing wallet {}/{}", i + 1, registry.len());
            self.run_wallet(registry, i, cycles, cancel).await;

            if i + 1 < registry.len() && !cancel.is_cancelled() {
                let delay =
                    jitter_range(self.settings.wallet_delay_min, self.settings.wallet_delay_max);
                info!("Waiting {}s before next wallet", delay.as_secs());
                sleep_cancellable(delay, cancel).await;
            }
        }

        info!("{}", "All wallet swap operations completed".green().bold());
    }
}
