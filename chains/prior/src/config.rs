use anyhow::Result;
use core_logic::ConfigError;
use ethers::prelude::*;
use std::env;

pub const NETWORK_NAME: &str = "PRIOR TESTNET";

/// Base Sepolia, the single testnet the bot drives.
pub const CHAIN_ID: u64 = 84532;

/// Environment variable holding the RPC endpoint.
pub const RPC_URL_ENV: &str = "RPC_URL";

pub const NATIVE_DECIMALS: u32 = 18;
pub const PRIOR_DECIMALS: u32 = 18;
pub const STABLE_DECIMALS: u32 = 6;

const PRIOR_ADDRESS: &str = "0xc19Ec2EEBB009b2422514C51F9118026f1cD89ba";
const USDC_ADDRESS: &str = "0x109694D75363A75317A8136D80f50F871E81044e";
const USDT_ADDRESS: &str = "0x014397DaEa96CaC46DbEdcbce50A42D5e0152B2E";
const ROUTER_ADDRESS: &str = "0x0f1DADEcc263eB79AE3e4db0d57c49a8b6178B0B";
const FAUCET_ADDRESS: &str = "0xCa602D9E45E1Ed25105Ee43643ea936B8e2Fd6B7";

/// The fixed contract set the bot talks to. Not configurable.
#[derive(Debug, Clone, Copy)]
pub struct Contracts {
    pub prior: Address,
    pub usdc: Address,
    pub usdt: Address,
    pub router: Address,
    pub faucet: Address,
}

impl Contracts {
    pub fn prior_testnet() -> Result<Self> {
        Ok(Self {
            prior: PRIOR_ADDRESS.parse()?,
            usdc: USDC_ADDRESS.parse()?,
            usdt: USDT_ADDRESS.parse()?,
            router: ROUTER_ADDRESS.parse()?,
            faucet: FAUCET_ADDRESS.parse()?,
        })
    }
}

#[derive(Debug, Clone)]
pub struct PriorConfig {
    pub rpc_url: String,
    pub contracts: Contracts,
}

impl PriorConfig {
    pub fn from_env() -> Result<Self> {
        let rpc_url = env::var(RPC_URL_ENV).map_err(|_| ConfigError::MissingEnv {
            var: RPC_URL_ENV.to_string(),
        })?;
        Ok(Self {
            rpc_url,
            contracts: Contracts::prior_testnet()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contract_addresses_parse() {
        let contracts = Contracts::prior_testnet().unwrap();
        assert_ne!(contracts.prior, contracts.router);
        assert_ne!(contracts.usdc, contracts.usdt);
    }
}
