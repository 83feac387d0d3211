//! Chain-data inspector
//!
//! Small diagnostic front end over the explorer core: decodes cellbase
//! witnesses into miner scripts and addresses, expands compact targets,
//! and unpacks epoch header fields.

use ckb_explorer_core::{
    address, compact,
    config::Config,
    reward, witness, Error, Result, APP_NAME, APP_VERSION,
};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Load and validate configuration first so the log level applies
    let config = Config::load().await?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing::Level::from(config.log_level).to_string()));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    // Handle special commands
    if config.info {
        print_info();
        return Ok(());
    }

    if config.print_config {
        print_configuration(&config)?;
        return Ok(());
    }

    let mut handled = false;

    if let Some(witness_hex) = &config.decode_witness {
        decode_witness(witness_hex, &config)?;
        handled = true;
    }

    if let Some(compact_str) = &config.compact_target {
        decode_compact_target(compact_str)?;
        handled = true;
    }

    if let Some(epoch_field) = config.epoch_field {
        let block_number = config.block_number.ok_or_else(|| {
            Error::config("--epoch-field requires --block-number")
        })?;
        decode_epoch_field(epoch_field, block_number);
        handled = true;
    }

    if !handled {
        print_info();
        println!();
        println!("Pass --decode-witness, --compact-target, or --epoch-field; see --help.");
    }

    Ok(())
}

/// Decode a cellbase witness and print script, lock hash, and address
fn decode_witness(witness_hex: &str, config: &Config) -> Result<()> {
    let constants = config.script_constants()?;
    let script = witness::parse_cellbase_witness(witness_hex)?;

    info!(network = %config.network, "decoded cellbase witness");

    println!("code_hash: {}", script.code_hash);
    println!("hash_type: {}", script.hash_type);
    println!("args:      {}", script.args_hex());
    println!("lock_hash: {}", script.hash());
    match address::encode_address(&script, config.network, &constants) {
        Some(addr) => println!("address:   {}", addr),
        None => println!("address:   (none)"),
    }
    Ok(())
}

/// Expand a compact target and print target, overflow flag, and difficulty
fn decode_compact_target(compact_str: &str) -> Result<()> {
    let compact = parse_u32_literal(compact_str)?;
    let (target, overflow) = compact::compact_to_target(compact);

    println!("compact:    {:#010x}", compact);
    println!("target:     {:#x}", target);
    println!("overflow:   {}", overflow);
    println!("difficulty: {}", compact::compact_to_difficulty(compact));
    Ok(())
}

/// Unpack an epoch header field
fn decode_epoch_field(epoch_field: u64, block_number: u64) {
    match reward::parse_epoch_info(epoch_field, block_number) {
        Some(epoch) => {
            println!("epoch:        {}", epoch.number);
            println!("length:       {}", epoch.length);
            println!("start_number: {}", epoch.start_number);
        }
        None => println!("epoch field is zero; parameters must come from the node"),
    }
}

/// Parse a u32 from a decimal or `0x`-prefixed hex literal
fn parse_u32_literal(s: &str) -> Result<u32> {
    let parsed = if let Some(hex_digits) = s.strip_prefix("0x") {
        u32::from_str_radix(hex_digits, 16)
    } else {
        s.parse::<u32>()
    };
    parsed.map_err(|_| Error::config(format!("Invalid compact target literal: {}", s)))
}

/// Print basic program information
fn print_info() {
    println!("{} v{}", APP_NAME, APP_VERSION);
    println!("Chain-data inspector for a CKB block explorer");
}

/// Print current configuration
fn print_configuration(config: &Config) -> Result<()> {
    let config_yaml = serde_yaml::to_string(config)?;
    println!("{}", config_yaml);
    Ok(())
}
