//! Address encoding for lock scripts
//!
//! A lock script maps to one of three address families. Scripts whose
//! arguments are exactly 20 bytes and whose code hash matches a canonical
//! secp256k1 lock get a short payload; everything else is encoded with the
//! full code hash. Payloads go through the standard bech32 codec with the
//! network's address prefix.

use crate::config::{Network, ScriptConstants};
use crate::types::{HashType, Script};
use crate::witness;
use crate::Result;
use bech32::{ToBase32, Variant};

/// Payload format byte for both short families
pub const SHORT_FORMAT: u8 = 0x01;
/// Payload format byte for full payloads of `Data` scripts
pub const FULL_DATA_FORMAT: u8 = 0x02;
/// Payload format byte for full payloads of `Type` scripts
pub const FULL_TYPE_FORMAT: u8 = 0x04;

/// Code-hash index of the sighash lock in short payloads
pub const SIGHASH_CODE_HASH_INDEX: u8 = 0x00;
/// Code-hash index of the multisig lock in short payloads
pub const MULTISIG_CODE_HASH_INDEX: u8 = 0x01;

/// Argument length required by the short families
const SHORT_ARGS_LEN: usize = 20;

/// The three address encodings a script can fall into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    /// Short payload, secp256k1 blake160 sighash lock
    ShortSig,
    /// Short payload, secp256k1 blake160 multisig lock
    ShortMultisig,
    /// Full payload carrying the whole code hash
    FullPayload,
}

/// Classify a script into its address family
///
/// Only scripts with exactly 20 bytes of arguments are eligible for the
/// short families, and then only when code hash and hash type structurally
/// match one of the configured canonical locks.
pub fn address_family(script: &Script, constants: &ScriptConstants) -> AddressFamily {
    if script.args.len() != SHORT_ARGS_LEN {
        return AddressFamily::FullPayload;
    }
    if script.hash_type != HashType::Type {
        return AddressFamily::FullPayload;
    }
    if script.code_hash == constants.secp_sighash {
        AddressFamily::ShortSig
    } else if script.code_hash == constants.secp_multisig {
        AddressFamily::ShortMultisig
    } else {
        AddressFamily::FullPayload
    }
}

/// Encode a lock script into an address string
///
/// Returns `None` for blank arguments, a recoverable "no address" outcome
/// seen on malformed upstream data, distinct from a decode error.
pub fn encode_address(
    script: &Script,
    network: Network,
    constants: &ScriptConstants,
) -> Option<String> {
    if script.args.is_empty() {
        return None;
    }

    let payload = match address_family(script, constants) {
        AddressFamily::ShortSig => short_payload(SIGHASH_CODE_HASH_INDEX, &script.args),
        AddressFamily::ShortMultisig => short_payload(MULTISIG_CODE_HASH_INDEX, &script.args),
        AddressFamily::FullPayload => full_payload(script),
    };

    bech32::encode(network.hrp(), payload.to_base32(), Variant::Bech32).ok()
}

/// Decode the miner address out of a block's witness list
///
/// An empty witness list yields `Ok(None)`; malformed witness bytes are a
/// decode error.
pub fn miner_address(
    witnesses: &[String],
    network: Network,
    constants: &ScriptConstants,
) -> Result<Option<String>> {
    Ok(witness::miner_script(witnesses)?
        .as_ref()
        .and_then(|script| encode_address(script, network, constants)))
}

fn short_payload(code_hash_index: u8, args: &[u8]) -> Vec<u8> {
    let mut payload = Vec::with_capacity(2 + args.len());
    payload.push(SHORT_FORMAT);
    payload.push(code_hash_index);
    payload.extend_from_slice(args);
    payload
}

fn full_payload(script: &Script) -> Vec<u8> {
    let format = match script.hash_type {
        HashType::Data => FULL_DATA_FORMAT,
        HashType::Type => FULL_TYPE_FORMAT,
    };
    let mut payload = Vec::with_capacity(1 + 32 + script.args.len());
    payload.push(format);
    payload.extend_from_slice(script.code_hash.as_bytes());
    payload.extend_from_slice(&script.args);
    payload
}
