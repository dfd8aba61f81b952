//! Chain access: read queries and signed transaction submission against the
//! remote node, behind the [`ChainBackend`] seam so the orchestration loops
//! can run against a mock.

use crate::config::Contracts;
use anyhow::{Context, Result};
use async_trait::async_trait;
use core_logic::{NetworkError, TxError};
use ethers::abi::{self, Token};
use ethers::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

/// Gas-limit override for router swaps; the router trips gas estimation, so
/// the limit is pinned instead.
pub const SWAP_GAS_LIMIT: u64 = 500_000;

/// Selector of the router function swapping PRIOR into USDC.
pub const SELECTOR_SWAP_TO_USDC: [u8; 4] = [0xf3, 0xb6, 0x80, 0x02];
/// Selector of the router function swapping PRIOR into USDT.
pub const SELECTOR_SWAP_TO_USDT: [u8; 4] = [0x03, 0xb5, 0x30, 0xa3];

const ERC20_ABI: &str = r#"[
    {"constant":true,"inputs":[{"name":"_owner","type":"address"}],"name":"balanceOf","outputs":[{"name":"balance","type":"uint256"}],"type":"function"},
    {"constant":false,"inputs":[{"name":"_spender","type":"address"},{"name":"_value","type":"uint256"}],"name":"approve","outputs":[{"name":"","type":"bool"}],"type":"function"}
]"#;

const FAUCET_ABI: &str = r#"[
    {"constant":false,"inputs":[],"name":"claimTokens","outputs":[],"type":"function"},
    {"constant":true,"inputs":[{"name":"","type":"address"}],"name":"lastClaimTime","outputs":[{"name":"","type":"uint256"}],"type":"function"},
    {"constant":true,"inputs":[],"name":"claimCooldown","outputs":[{"name":"","type":"uint256"}],"type":"function"}
]"#;

/// Shortens `0x`-prefixed hex for log lines: `0x1234...abcd`.
pub fn short_hex(full: &str) -> String {
    if full.len() <= 12 {
        return full.to_string();
    }
    format!("{}...{}", &full[..6], &full[full.len() - 4..])
}

/// A submitted transaction, identified by hash. Submission acknowledgement
/// only; confirmation is a separate wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxHandle {
    pub hash: TxHash,
}

impl TxHandle {
    pub fn short(&self) -> String {
        short_hex(&format!("{:?}", self.hash))
    }
}

/// Terminal state of a mined transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxOutcome {
    pub success: bool,
    pub block: Option<U64>,
}

/// One invocation of the swap router.
///
/// The router exposes one function per output token, each taking the input
/// amount as its only argument. The selectors are the ones the deployed
/// bytecode dispatches on; they do not match the keccak of any published
/// function name, so they are carried verbatim and only the argument is
/// ABI-encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterCall {
    selector: [u8; 4],
    amount: U256,
}

impl RouterCall {
    pub fn swap_prior_to_usdc(amount: U256) -> Self {
        Self {
            selector: SELECTOR_SWAP_TO_USDC,
            amount,
        }
    }

    pub fn swap_prior_to_usdt(amount: U256) -> Self {
        Self {
            selector: SELECTOR_SWAP_TO_USDT,
            amount,
        }
    }

    pub fn selector(&self) -> [u8; 4] {
        self.selector
    }

    pub fn amount(&self) -> U256 {
        self.amount
    }

    /// Wire encoding: 4-byte selector followed by the amount as a 32-byte
    /// big-endian word.
    pub fn calldata(&self) -> Bytes {
        let mut data = self.selector.to_vec();
        data.extend(abi::encode(&[Token::Uint(self.amount)]));
        data.into()
    }
}

/// Everything the orchestration layer needs from the chain.
#[async_trait]
pub trait ChainBackend: Send + Sync {
    async fn native_balance(&self, owner: Address) -> Result<U256>;

    async fn token_balance(&self, token: Address, owner: Address) -> Result<U256>;

    async fn last_claim_time(&self, owner: Address) -> Result<U256>;

    async fn claim_cooldown(&self) -> Result<U256>;

    async fn submit_approve(
        &self,
        signer: &LocalWallet,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TxHandle>;

    async fn submit_swap(&self, signer: &LocalWallet, call: RouterCall) -> Result<TxHandle>;

    async fn submit_claim(&self, signer: &LocalWallet) -> Result<TxHandle>;

    /// Waits until the transaction is mined or the timeout elapses. `None`
    /// waits indefinitely. A firing timeout does not cancel the underlying
    /// submission; it may still land on-chain later.
    async fn await_confirmation(
        &self,
        tx: &TxHandle,
        timeout: Option<Duration>,
    ) -> Result<TxOutcome, TxError>;
}

/// [`ChainBackend`] over a JSON-RPC node.
#[derive(Debug, Clone)]
pub struct RpcClient {
    provider: Provider<Http>,
    contracts: Contracts,
    chain_id: u64,
    erc20: abi::Abi,
    faucet: abi::Abi,
    confirm_poll: Duration,
}

impl RpcClient {
    pub fn connect(rpc_url: &str, contracts: Contracts) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url).context("Invalid RPC URL")?;
        let erc20: abi::Abi = serde_json::from_str(ERC20_ABI).context("Bad ERC-20 ABI")?;
        let faucet: abi::Abi = serde_json::from_str(FAUCET_ABI).context("Bad faucet ABI")?;

        Ok(Self {
            provider,
            contracts,
            chain_id: crate::config::CHAIN_ID,
            erc20,
            faucet,
            confirm_poll: Duration::from_secs(1),
        })
    }

    fn erc20_at(&self, token: Address) -> Contract<Provider<Http>> {
        Contract::new(token, self.erc20.clone(), Arc::new(self.provider.clone()))
    }

    fn faucet_contract(&self) -> Contract<Provider<Http>> {
        Contract::new(
            self.contracts.faucet,
            self.faucet.clone(),
            Arc::new(self.provider.clone()),
        )
    }

    async fn submit(&self, signer: &LocalWallet, tx: Eip1559TransactionRequest) -> Result<TxHandle> {
        let client = SignerMiddleware::new(
            self.provider.clone(),
            signer.clone().with_chain_id(self.chain_id),
        );
        let pending = client
            .send_transaction(tx, None)
            .await
            .context("Transaction submission failed")?;
        Ok(TxHandle { hash: *pending })
    }

    async fn poll_receipt(&self, hash: TxHash) -> Result<TxOutcome, TxError> {
        loop {
            match self.provider.get_transaction_receipt(hash).await {
                Ok(Some(receipt)) => {
                    return Ok(TxOutcome {
                        success: receipt.status == Some(U64::from(1)),
                        block: receipt.block_number,
                    })
                }
                Ok(None) => sleep(self.confirm_poll).await,
                Err(e) => {
                    return Err(TxError::Rpc {
                        tx_hash: format!("{:?}", hash),
                        reason: e.to_string(),
                    })
                }
            }
        }
    }
}

fn transport_err<E: std::fmt::Display>(e: E) -> anyhow::Error {
    NetworkError::Transport {
        reason: e.to_string(),
    }
    .into()
}

#[async_trait]
impl ChainBackend for RpcClient {
    async fn native_balance(&self, owner: Address) -> Result<U256> {
        self.provider
            .get_balance(owner, None)
            .await
            .map_err(transport_err)
    }

    async fn token_balance(&self, token: Address, owner: Address) -> Result<U256> {
        self.erc20_at(token)
            .method::<_, U256>("balanceOf", owner)?
            .call()
            .await
            .map_err(transport_err)
    }

    async fn last_claim_time(&self, owner: Address) -> Result<U256> {
        self.faucet_contract()
            .method::<_, U256>("lastClaimTime", owner)?
            .call()
            .await
            .map_err(transport_err)
    }

    async fn claim_cooldown(&self) -> Result<U256> {
        self.faucet_contract()
            .method::<_, U256>("claimCooldown", ())?
            .call()
            .await
            .map_err(transport_err)
    }

    async fn submit_approve(
        &self,
        signer: &LocalWallet,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TxHandle> {
        let data = self.erc20_at(token).encode("approve", (spender, amount))?;
        let tx = Eip1559TransactionRequest::new()
            .to(token)
            .data(data)
            .from(signer.address());
        self.submit(signer, tx).await
    }

    async fn submit_swap(&self, signer: &LocalWallet, call: RouterCall) -> Result<TxHandle> {
        let tx = Eip1559TransactionRequest::new()
            .to(self.contracts.router)
            .data(call.calldata())
            .gas(SWAP_GAS_LIMIT)
            .from(signer.address());
        self.submit(signer, tx).await
    }

    async fn submit_claim(&self, signer: &LocalWallet) -> Result<TxHandle> {
        let data = self.faucet_contract().encode("claimTokens", ())?;
        let tx = Eip1559TransactionRequest::new()
            .to(self.contracts.faucet)
            .data(data)
            .from(signer.address());
        self.submit(signer, tx).await
    }

    async fn await_confirmation(
        &self,
        tx: &TxHandle,
        timeout: Option<Duration>,
    ) -> Result<TxOutcome, TxError> {
        match timeout {
            Some(limit) => tokio::time::timeout(limit, self.poll_receipt(tx.hash))
                .await
                .map_err(|_| TxError::ConfirmationTimeout {
                    tx_hash: tx.short(),
                    timeout_ms: limit.as_millis() as u64,
                })?,
            None => self.poll_receipt(tx.hash).await,
        }
    }
}
