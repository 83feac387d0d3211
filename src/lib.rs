//! CKB Explorer Core
//!
//! Chain-data decoding and economic calculations for a block explorer:
//! - Cellbase witness parsing into miner lock scripts
//! - Lock script to address encoding (short and full payload families)
//! - Compact proof-of-work target expansion and difficulty
//! - Epoch base reward distribution and packed epoch field decoding
//! - Nervos DAO withdrawal interest and transaction fees
//!
//! Everything is pure computation over caller-supplied data; the node
//! RPC client is the only I/O surface and lives behind trait seams.

pub mod address;
pub mod compact;
pub mod config;
pub mod crypto;
pub mod dao;
pub mod error;
pub mod reward;
pub mod rpc;
pub mod types;
pub mod utils;
pub mod witness;

pub use config::{Config, Network};
pub use error::{Error, Result};
pub use types::*;

/// Application information
pub const APP_NAME: &str = "ckb-explorer-core";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
