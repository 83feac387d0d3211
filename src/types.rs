//! Core types for explorer chain-data decoding
//!
//! Fundamental on-chain values used throughout the crate, with hex
//! (de)serialization matching the node's JSON conventions.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 32-byte on-chain value (code hash, transaction hash, block hash)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Byte32([u8; 32]);

impl Byte32 {
    /// Create from a fixed array
    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Create from a byte slice, which must be exactly 32 bytes
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 32 {
            return Err(Error::unexpected_length(32, bytes.len()));
        }
        let mut array = [0u8; 32];
        array.copy_from_slice(bytes);
        Ok(Self(array))
    }

    /// Create from a hex string, with or without a `0x` prefix
    pub fn from_hex(s: &str) -> Result<Self> {
        let stripped = crate::utils::strip_hex_prefix(s);
        let bytes = hex::decode(stripped)?;
        Self::from_slice(&bytes)
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Convert to a `0x`-prefixed hex string
    pub fn to_hex(&self) -> String {
        format!("0x{}", crate::utils::bytes_to_hex(&self.0))
    }
}

impl FromStr for Byte32 {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Byte32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Serialize for Byte32 {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Byte32 {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Byte32::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// How a script's code hash resolves to code
///
/// The wire form is a single byte: `0x00` means `Data`; every other value
/// observed on chain is treated as `Type`. The mapping is deliberately
/// two-way and must stay that way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashType {
    Data,
    Type,
}

impl HashType {
    /// Decode from the serialized one-byte form
    pub fn from_wire_byte(byte: u8) -> Self {
        if byte == 0x00 {
            HashType::Data
        } else {
            HashType::Type
        }
    }

    /// The serialized one-byte form
    pub fn wire_byte(&self) -> u8 {
        match self {
            HashType::Data => 0x00,
            HashType::Type => 0x01,
        }
    }

    /// Lowercase name used in JSON
    pub fn as_str(&self) -> &'static str {
        match self {
            HashType::Data => "data",
            HashType::Type => "type",
        }
    }
}

impl fmt::Display for HashType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A lock script: the predicate authorizing a cell spend
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Script {
    pub code_hash: Byte32,
    pub hash_type: HashType,
    #[serde(with = "hex_bytes")]
    pub args: Vec<u8>,
}

impl Script {
    /// Create a new script
    pub fn new(code_hash: Byte32, hash_type: HashType, args: Vec<u8>) -> Self {
        Self {
            code_hash,
            hash_type,
            args,
        }
    }

    /// Create from hex-encoded parts, validating both hex fields
    pub fn from_hex_parts(code_hash: &str, hash_type: HashType, args: &str) -> Result<Self> {
        let code_hash = Byte32::from_hex(code_hash)?;
        let args = crate::utils::hex_to_bytes(crate::utils::strip_hex_prefix(args))?;
        Ok(Self::new(code_hash, hash_type, args))
    }

    /// Argument bytes as a `0x`-prefixed hex string
    pub fn args_hex(&self) -> String {
        format!("0x{}", crate::utils::bytes_to_hex(&self.args))
    }

    /// The script hash identifying this lock on chain
    pub fn hash(&self) -> Byte32 {
        crate::crypto::script_hash(self)
    }
}

/// Capacity in shannons
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
pub struct Capacity(u64);

impl Capacity {
    /// Create a capacity from shannons
    pub const fn shannons(value: u64) -> Self {
        Self(value)
    }

    /// Zero capacity
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Get the value in shannons
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Saturating subtraction
    pub fn saturating_sub(self, other: Capacity) -> Capacity {
        Self(self.0.saturating_sub(other.0))
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Capacity {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!("{:#x}", self.0))
    }
}

impl<'de> Deserialize<'de> for Capacity {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = hex_quantity::deserialize(deserializer)?;
        Ok(Capacity(value))
    }
}

/// Reference to a cell by its creating transaction and output index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutPoint {
    pub tx_hash: Byte32,
    #[serde(with = "hex_quantity_u32")]
    pub index: u32,
}

impl OutPoint {
    /// Create a new out point
    pub fn new(tx_hash: Byte32, index: u32) -> Self {
        Self { tx_hash, index }
    }
}

/// Epoch parameters as reported by the node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpochInfo {
    #[serde(with = "hex_quantity")]
    pub number: u64,
    #[serde(with = "hex_quantity")]
    pub length: u64,
    #[serde(with = "hex_quantity")]
    pub start_number: u64,
}

/// Cellbase reward breakdown supplied per block by the node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RewardBreakdown {
    pub primary: Capacity,
    pub secondary: Capacity,
}

/// Serde adapter for `u64` hex quantities (`"0x1a"` on the wire)
pub(crate) mod hex_quantity {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &u64, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{:#x}", value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let stripped = s.strip_prefix("0x").unwrap_or(&s);
        u64::from_str_radix(stripped, 16).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for `u32` hex quantities
pub(crate) mod hex_quantity_u32 {
    use serde::{Deserializer, Serializer};

    pub fn serialize<S>(value: &u32, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("{:#x}", value))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u32, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = super::hex_quantity::deserialize(deserializer)?;
        u32::try_from(value).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter for byte vectors carried as `0x`-prefixed hex strings
pub(crate) mod hex_bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format!("0x{}", hex::encode(value)))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let stripped = s.strip_prefix("0x").unwrap_or(&s);
        hex::decode(stripped).map_err(serde::de::Error::custom)
    }
}
