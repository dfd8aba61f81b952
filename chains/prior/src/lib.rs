//! PRIOR testnet multi-wallet bot: balance tracking, faucet claims, and
//! repeated approve+swap cycles driven from an interactive console.

pub mod client;
pub mod config;
pub mod faucet;
pub mod menu;
pub mod swap;
pub mod wallets;
