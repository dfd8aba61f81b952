#![allow(dead_code)]

use async_trait::async_trait;
use core_logic::{PrivateKey, TxError};
use ethers::prelude::*;
use prior_project::client::{ChainBackend, RouterCall, TxHandle, TxOutcome};
use prior_project::config::Contracts;
use prior_project::swap::SwapSettings;
use prior_project::wallets::WalletRegistry;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

pub const KEY_ONE: &str = "0x0000000000000000000000000000000000000000000000000000000000000001";
pub const KEY_TWO: &str = "0x0000000000000000000000000000000000000000000000000000000000000002";

/// Every state-changing submission the mock saw, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submitted {
    Approve {
        owner: Address,
        spender: Address,
        amount: U256,
    },
    Swap {
        owner: Address,
        selector: [u8; 4],
        amount: U256,
    },
    Claim {
        owner: Address,
    },
}

pub fn owner_of(submitted: &Submitted) -> Address {
    match submitted {
        Submitted::Approve { owner, .. }
        | Submitted::Swap { owner, .. }
        | Submitted::Claim { owner } => *owner,
    }
}

/// Scripted in-memory chain. Confirmations pop from a queue and default to
/// success; an optional token is cancelled on the first confirmation wait
/// to simulate a stop request arriving while a transaction is in flight.
pub struct MockChain {
    pub prior_balance: U256,
    pub last_claim: U256,
    pub cooldown: U256,
    submitted: Mutex<Vec<Submitted>>,
    confirmations: Mutex<VecDeque<Result<TxOutcome, TxError>>>,
    cancel_on_confirm: Mutex<Option<CancellationToken>>,
}

impl MockChain {
    pub fn new() -> Self {
        Self {
            prior_balance: U256::exp10(18),
            last_claim: U256::zero(),
            cooldown: U256::zero(),
            submitted: Mutex::new(Vec::new()),
            confirmations: Mutex::new(VecDeque::new()),
            cancel_on_confirm: Mutex::new(None),
        }
    }

    pub fn with_prior_balance(mut self, balance: U256) -> Self {
        self.prior_balance = balance;
        self
    }

    pub fn with_claim_state(mut self, last_claim: U256, cooldown: U256) -> Self {
        self.last_claim = last_claim;
        self.cooldown = cooldown;
        self
    }

    pub fn script_confirmation(&self, outcome: Result<TxOutcome, TxError>) {
        self.confirmations.lock().unwrap().push_back(outcome);
    }

    pub fn cancel_on_next_confirm(&self, token: CancellationToken) {
        *self.cancel_on_confirm.lock().unwrap() = Some(token);
    }

    pub fn submitted(&self) -> Vec<Submitted> {
        self.submitted.lock().unwrap().clone()
    }

    fn handle() -> TxHandle {
        TxHandle {
            hash: TxHash::zero(),
        }
    }
}

pub fn confirmed() -> Result<TxOutcome, TxError> {
    Ok(TxOutcome {
        success: true,
        block: Some(U64::from(1)),
    })
}

pub fn reverted() -> Result<TxOutcome, TxError> {
    Ok(TxOutcome {
        success: false,
        block: Some(U64::from(1)),
    })
}

pub fn timed_out() -> Result<TxOutcome, TxError> {
    Err(TxError::ConfirmationTimeout {
        tx_hash: "0x0000...0000".to_string(),
        timeout_ms: 10_000,
    })
}

#[async_trait]
impl ChainBackend for MockChain {
    async fn native_balance(&self, _owner: Address) -> anyhow::Result<U256> {
        Ok(U256::exp10(18))
    }

    async fn token_balance(&self, _token: Address, _owner: Address) -> anyhow::Result<U256> {
        Ok(self.prior_balance)
    }

    async fn last_claim_time(&self, _owner: Address) -> anyhow::Result<U256> {
        Ok(self.last_claim)
    }

    async fn claim_cooldown(&self) -> anyhow::Result<U256> {
        Ok(self.cooldown)
    }

    async fn submit_approve(
        &self,
        signer: &LocalWallet,
        _token: Address,
        spender: Address,
        amount: U256,
    ) -> anyhow::Result<TxHandle> {
        self.submitted.lock().unwrap().push(Submitted::Approve {
            owner: signer.address(),
            spender,
            amount,
        });
        Ok(Self::handle())
    }

    async fn submit_swap(&self, signer: &LocalWallet, call: RouterCall) -> anyhow::Result<TxHandle> {
        self.submitted.lock().unwrap().push(Submitted::Swap {
            owner: signer.address(),
            selector: call.selector(),
            amount: call.amount(),
        });
        Ok(Self::handle())
    }

    async fn submit_claim(&self, signer: &LocalWallet) -> anyhow::Result<TxHandle> {
        self.submitted.lock().unwrap().push(Submitted::Claim {
            owner: signer.address(),
        });
        Ok(Self::handle())
    }

    async fn await_confirmation(
        &self,
        _tx: &TxHandle,
        _timeout: Option<Duration>,
    ) -> Result<TxOutcome, TxError> {
        if let Some(token) = self.cancel_on_confirm.lock().unwrap().take() {
            token.cancel();
        }
        match self.confirmations.lock().unwrap().pop_front() {
            Some(outcome) => outcome,
            None => confirmed(),
        }
    }
}

pub fn registry_of(keys: &[&str]) -> WalletRegistry {
    let keys: Vec<PrivateKey> = keys.iter().map(|k| PrivateKey::new(*k)).collect();
    WalletRegistry::from_keys(&keys, Contracts::prior_testnet().unwrap())
}

/// Production policy with all pacing zeroed so tests run instantly.
pub fn fast_settings() -> SwapSettings {
    SwapSettings {
        confirm_timeout: Duration::from_secs(10),
        cycle_delay_min: Duration::ZERO,
        cycle_delay_max: Duration::ZERO,
        wallet_delay_min: Duration::ZERO,
        wallet_delay_max: Duration::ZERO,
        refresh_every: 3,
    }
}
