//! Configuration management for the explorer core
//!
//! Network mode, canonical code-hash constants, and the per-epoch reward
//! constant are explicit values resolved once at load time and passed into
//! the components that need them, never process-wide mutable state.
//! Supports command line arguments, environment variables, and
//! configuration files (YAML/JSON) with validation and defaults.

use crate::types::Byte32;
use crate::{utils, Error, Result};
use clap::{Parser, ValueEnum};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Network mode, selecting the address prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
}

impl Network {
    /// Human-readable prefix used by the address codec
    pub fn hrp(&self) -> &'static str {
        match self {
            Network::Mainnet => "ckb",
            Network::Testnet => "ckt",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => write!(f, "mainnet"),
            Network::Testnet => write!(f, "testnet"),
        }
    }
}

/// Log levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

/// Canonical code hash of the secp256k1 blake160 sighash lock
pub const SECP_SIGHASH_CODE_HASH: &str =
    "0x9bd7e06f3ecf4be0f2fcd2188b23f1b9fcc88e5d4b65a8637b17723bbda3cce8";

/// Canonical code hash of the secp256k1 blake160 multisig lock
pub const SECP_MULTISIG_CODE_HASH: &str =
    "0x5c5069eb0857efc65e1bca0c07df34c31663b3622fd3876c876320fc9634e2a8";

/// Default total reward issued per epoch, in shannons
pub const DEFAULT_EPOCH_REWARD: u64 = 125_000_000_000_000;

static DEFAULT_SIGHASH_HASH: Lazy<Byte32> = Lazy::new(|| {
    Byte32::from_hex(SECP_SIGHASH_CODE_HASH).expect("canonical sighash code hash is valid hex")
});

static DEFAULT_MULTISIG_HASH: Lazy<Byte32> = Lazy::new(|| {
    Byte32::from_hex(SECP_MULTISIG_CODE_HASH).expect("canonical multisig code hash is valid hex")
});

/// The code-hash constants address classification compares against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptConstants {
    pub secp_sighash: Byte32,
    pub secp_multisig: Byte32,
}

impl Default for ScriptConstants {
    fn default() -> Self {
        Self {
            secp_sighash: *DEFAULT_SIGHASH_HASH,
            secp_multisig: *DEFAULT_MULTISIG_HASH,
        }
    }
}

/// Complete configuration for the explorer core
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(
    name = "ckb-explorer-core",
    version = env!("CARGO_PKG_VERSION"),
    about = "Chain-data inspector for a CKB block explorer",
    long_about = "Decodes cellbase witnesses into miner addresses, expands compact \
                  proof-of-work targets into difficulty values, and unpacks epoch fields"
)]
pub struct Config {
    /// Print program info and exit
    #[arg(long)]
    #[serde(default)]
    pub info: bool,

    /// Print the parsed configuration and exit
    #[arg(long)]
    #[serde(default)]
    pub print_config: bool,

    /// Configuration file path (YAML or JSON)
    #[arg(long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Network mode selecting the address prefix
    #[arg(long, value_enum, default_value = "mainnet", env = "CKB_NET_MODE")]
    #[serde(default = "default_network")]
    pub network: Network,

    /// Override for the secp256k1 sighash code hash
    #[arg(long, value_name = "HASH", env = "SECP_CELL_TYPE_HASH")]
    pub secp_sighash_code_hash: Option<String>,

    /// Override for the secp256k1 multisig code hash
    #[arg(long, value_name = "HASH", env = "SECP_MULTISIG_CELL_TYPE_HASH")]
    pub secp_multisig_code_hash: Option<String>,

    /// Total reward issued per epoch, in shannons
    #[arg(long, default_value_t = DEFAULT_EPOCH_REWARD, env = "DEFAULT_EPOCH_REWARD")]
    #[serde(default = "default_epoch_reward")]
    pub epoch_reward: u64,

    /// Node RPC address
    #[arg(short = 'n', long, default_value = "localhost:8114")]
    #[serde(default = "default_node")]
    pub node: String,

    /// Use TLS to connect to node
    #[arg(short = 't', long)]
    #[serde(default)]
    pub tls: bool,

    /// Accept self-signed TLS certificates
    #[arg(short = 'x', long)]
    #[serde(default)]
    pub insecure: bool,

    /// Log level
    #[arg(short = 'l', long, default_value = "info")]
    #[serde(default = "default_log_level")]
    pub log_level: LogLevel,

    /// Default HTTP timeout in milliseconds
    #[arg(long, default_value = "30000")]
    #[serde(default = "default_http_timeout")]
    pub http_timeout: u64,

    /// Maximum retry attempts for RPC requests
    #[arg(long, default_value = "10")]
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,

    /// Base retry delay in milliseconds
    #[arg(long, default_value = "100")]
    #[serde(default = "default_retry_delay")]
    pub retry_delay: u64,

    /// Maximum retry delay in milliseconds
    #[arg(long, default_value = "5000")]
    #[serde(default = "default_max_retry_delay")]
    pub max_retry_delay: u64,

    /// Decode a hex cellbase witness and print the miner script/address
    #[arg(long, value_name = "HEX")]
    pub decode_witness: Option<String>,

    /// Expand a compact target (hex or decimal) into target and difficulty
    #[arg(long, value_name = "COMPACT")]
    pub compact_target: Option<String>,

    /// Unpack a 64-bit epoch header field
    #[arg(long, value_name = "FIELD")]
    pub epoch_field: Option<u64>,

    /// Block number the epoch field was read from
    #[arg(long, value_name = "NUMBER")]
    pub block_number: Option<u64>,
}

impl Config {
    /// Load configuration from CLI, environment, and optional file
    pub async fn load() -> Result<Self> {
        let mut config = Self::parse();

        // Load from config file if specified
        if let Some(config_file) = &config.config_file {
            let file_config = Self::load_from_file(config_file).await?;
            config = config.merge_with_file(file_config)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file
    pub(crate) async fn load_from_file(path: &PathBuf) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;

        if path.extension().and_then(|s| s.to_str()) == Some("json") {
            serde_json::from_str(&content).map_err(Error::from)
        } else {
            // Default to YAML
            serde_yaml::from_str(&content).map_err(Error::from)
        }
    }

    /// Merge CLI config with file config (CLI takes precedence)
    fn merge_with_file(mut self, file_config: Self) -> Result<Self> {
        // Only override CLI defaults with file values if not explicitly set

        if self.secp_sighash_code_hash.is_none() {
            self.secp_sighash_code_hash = file_config.secp_sighash_code_hash;
        }

        if self.secp_multisig_code_hash.is_none() {
            self.secp_multisig_code_hash = file_config.secp_multisig_code_hash;
        }

        // For other fields, keep CLI values (they include defaults)
        Ok(self)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        // Validate code-hash overrides if provided
        for hash in [&self.secp_sighash_code_hash, &self.secp_multisig_code_hash]
            .into_iter()
            .flatten()
        {
            utils::validate_hex_string(utils::strip_hex_prefix(hash), Some(64))?;
        }

        // Validate node URL
        Url::parse(&self.node_url())
            .map_err(|e| Error::config(format!("Invalid node URL: {}", e)))?;

        if self.epoch_reward == 0 {
            return Err(Error::config("Epoch reward must be greater than 0"));
        }

        Ok(())
    }

    /// Get the resolved code-hash constants
    pub fn script_constants(&self) -> Result<ScriptConstants> {
        let secp_sighash = match &self.secp_sighash_code_hash {
            Some(hash) => Byte32::from_hex(hash)?,
            None => *DEFAULT_SIGHASH_HASH,
        };
        let secp_multisig = match &self.secp_multisig_code_hash {
            Some(hash) => Byte32::from_hex(hash)?,
            None => *DEFAULT_MULTISIG_HASH,
        };
        Ok(ScriptConstants {
            secp_sighash,
            secp_multisig,
        })
    }

    /// Get node URL
    pub fn node_url(&self) -> String {
        if self.tls {
            format!("https://{}", self.node)
        } else {
            format!("http://{}", self.node)
        }
    }

    /// Get HTTP timeout duration
    pub fn http_timeout_duration(&self) -> Duration {
        Duration::from_millis(self.http_timeout)
    }

    /// Get retry delay duration
    pub fn retry_delay_duration(&self) -> Duration {
        Duration::from_millis(self.retry_delay)
    }

    /// Get max retry delay duration
    pub fn max_retry_delay_duration(&self) -> Duration {
        Duration::from_millis(self.max_retry_delay)
    }
}

// Default value functions for serde
fn default_network() -> Network {
    Network::Mainnet
}
fn default_epoch_reward() -> u64 {
    DEFAULT_EPOCH_REWARD
}
fn default_node() -> String {
    "localhost:8114".to_string()
}
fn default_log_level() -> LogLevel {
    LogLevel::Info
}
fn default_http_timeout() -> u64 {
    30000
}
fn default_max_retries() -> usize {
    10
}
fn default_retry_delay() -> u64 {
    100
}
fn default_max_retry_delay() -> u64 {
    5000
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_defaults() {
        let args = vec!["ckb-explorer-core"];
        let config = Config::try_parse_from(args).unwrap();

        assert_eq!(config.network, Network::Mainnet);
        assert_eq!(config.epoch_reward, DEFAULT_EPOCH_REWARD);
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(!config.tls);
        assert!(!config.insecure);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_script_constants() {
        let config = Config::try_parse_from(vec!["ckb-explorer-core"]).unwrap();
        let constants = config.script_constants().unwrap();
        assert_eq!(
            constants.secp_sighash.to_hex(),
            SECP_SIGHASH_CODE_HASH
        );
        assert_eq!(
            constants.secp_multisig.to_hex(),
            SECP_MULTISIG_CODE_HASH
        );
        assert_eq!(constants, ScriptConstants::default());
    }

    #[tokio::test]
    async fn test_config_from_yaml() {
        let yaml_content = r#"
network: testnet
node: "example.com:8114"
tls: true
epoch_reward: 42
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml_content).unwrap();

        let config = Config::load_from_file(&temp_file.path().to_path_buf())
            .await
            .unwrap();

        assert_eq!(config.network, Network::Testnet);
        assert_eq!(config.node, "example.com:8114");
        assert!(config.tls);
        assert_eq!(config.epoch_reward, 42);
        assert_eq!(config.node_url(), "https://example.com:8114");
    }

    #[test]
    fn test_validate_rejects_bad_code_hash() {
        let mut config = Config::try_parse_from(vec!["ckb-explorer-core"]).unwrap();
        config.secp_sighash_code_hash = Some("0x1234".to_string());
        assert!(config.validate().is_err());

        config.secp_sighash_code_hash = Some(SECP_SIGHASH_CODE_HASH.to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_epoch_reward() {
        let mut config = Config::try_parse_from(vec!["ckb-explorer-core"]).unwrap();
        config.epoch_reward = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_network_hrp() {
        assert_eq!(Network::Mainnet.hrp(), "ckb");
        assert_eq!(Network::Testnet.hrp(), "ckt");
        assert_eq!(Network::Mainnet.to_string(), "mainnet");
    }
}
