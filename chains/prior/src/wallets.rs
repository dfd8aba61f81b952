//! The managed account set: signing keys, derived addresses, and cached
//! balances. Balances change only through explicit refresh calls.

use crate::client::{short_hex, ChainBackend};
use crate::config::{self, Contracts};
use anyhow::{Context, Result};
use core_logic::{KeyStore, PrivateKey, WalletError};
use ethers::prelude::*;
use ethers::utils::format_units;
use tracing::{error, info, warn};

pub struct ManagedWallet {
    signer: LocalWallet,
    pub address: Address,
    pub balance_native: U256,
    pub balance_prior: U256,
    pub balance_usdc: U256,
    pub balance_usdt: U256,
}

impl ManagedWallet {
    fn from_key(key: &PrivateKey) -> Result<Self> {
        let raw = key.as_str();
        let raw = raw.strip_prefix("0x").unwrap_or(raw);
        let signer: LocalWallet = raw.parse().context("Invalid private key")?;
        // Address is a pure function of the key, derived exactly once.
        let address = signer.address();
        Ok(Self {
            signer,
            address,
            balance_native: U256::zero(),
            balance_prior: U256::zero(),
            balance_usdc: U256::zero(),
            balance_usdt: U256::zero(),
        })
    }

    pub fn signer(&self) -> &LocalWallet {
        &self.signer
    }

    pub fn short_address(&self) -> String {
        short_hex(&format!("{:?}", self.address))
    }

    pub fn prior_display(&self) -> String {
        display_units(self.balance_prior, config::PRIOR_DECIMALS, 2)
    }

    fn balance_line(&self) -> String {
        format!(
            "{} | ETH: {} | PRIOR: {} | USDC: {} | USDT: {}",
            self.short_address(),
            display_units(self.balance_native, config::NATIVE_DECIMALS, 4),
            display_units(self.balance_prior, config::PRIOR_DECIMALS, 2),
            display_units(self.balance_usdc, config::STABLE_DECIMALS, 2),
            display_units(self.balance_usdt, config::STABLE_DECIMALS, 2),
        )
    }
}

/// Display-only formatting; amounts stay exact integers everywhere else.
fn display_units(value: U256, decimals: u32, places: usize) -> String {
    let raw = format_units(value, decimals).unwrap_or_else(|_| "0".to_string());
    let parsed: f64 = raw.parse().unwrap_or(0.0);
    format!("{:.*}", places, parsed)
}

/// Ordered wallet set; insertion order comes from the keys file and stays
/// stable for the process lifetime.
pub struct WalletRegistry {
    wallets: Vec<ManagedWallet>,
    contracts: Contracts,
}

impl WalletRegistry {
    pub fn load(store: &KeyStore, contracts: Contracts) -> Result<Self> {
        let keys = store.load()?;
        Ok(Self::from_keys(&keys, contracts))
    }

    pub fn from_keys(keys: &[PrivateKey], contracts: Contracts) -> Self {
        let mut wallets = Vec::new();
        for (i, key) in keys.iter().enumerate() {
            match ManagedWallet::from_key(key) {
                Ok(wallet) => wallets.push(wallet),
                Err(e) => warn!("Skipping wallet {}: {:#}", i + 1, e),
            }
        }
        Self { wallets, contracts }
    }

    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    pub fn contracts(&self) -> Contracts {
        self.contracts
    }

    pub fn get(&self, index: usize) -> Option<&ManagedWallet> {
        self.wallets.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ManagedWallet> {
        self.wallets.iter()
    }

    /// Re-queries all four balances for one wallet. The cache is only
    /// written once every read succeeded; any transport error leaves the
    /// wallet unchanged.
    pub async fn refresh(&mut self, backend: &dyn ChainBackend, index: usize) -> Result<()> {
        let total = self.wallets.len();
        let address = self
            .wallets
            .get(index)
            .ok_or(WalletError::NotFound { index, total })?
            .address;
        let contracts = self.contracts;

        let native = backend.native_balance(address).await?;
        let prior = backend.token_balance(contracts.prior, address).await?;
        let usdc = backend.token_balance(contracts.usdc, address).await?;
        let usdt = backend.token_balance(contracts.usdt, address).await?;

        if let Some(wallet) = self.wallets.get_mut(index) {
            wallet.balance_native = native;
            wallet.balance_prior = prior;
            wallet.balance_usdc = usdc;
            wallet.balance_usdt = usdt;
        }
        Ok(())
    }

    /// Refreshes every wallet in registry order, logging one balance line
    /// per wallet. Read failures are logged and never fail the caller.
    pub async fn refresh_all(&mut self, backend: &dyn ChainBackend) {
        info!("Updating data for {} wallets...", self.len());
        for i in 0..self.len() {
            match self.refresh(backend, i).await {
                Ok(()) => info!("Wallet {}: {}", i + 1, self.wallets[i].balance_line()),
                Err(e) => error!("Failed to update wallet {}: {:#}", i + 1, e),
            }
        }
        info!("All wallet data updated");
    }
}
