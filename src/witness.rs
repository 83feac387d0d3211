//! Cellbase witness and script-table codec
//!
//! The first witness of a cellbase transaction is a fixed-layout binary
//! table carrying the miner's lock script. Both the witness table and the
//! nested script table start with a little-endian u32 full size followed by
//! one little-endian u32 offset per field; every offset is validated before
//! use so malformed data fails with a typed error instead of a wild read.

use crate::types::{Byte32, HashType, Script};
use crate::utils;
use crate::{Error, Result};
use byteorder::{ByteOrder, LittleEndian};
use tracing::debug;

/// Witness table header: full size + two field offsets
const WITNESS_HEADER_SIZE: usize = 12;
/// Script table header: full size + three field offsets
const SCRIPT_HEADER_SIZE: usize = 16;
/// Length prefix of a serialized byte vector
const VEC_LEN_SIZE: usize = 4;

/// Bounds-checked reader over a byte slice
///
/// All reads are absolute; callers derive positions from decoded offsets,
/// so every access re-checks against the underlying length.
#[derive(Debug, Clone, Copy)]
pub struct SliceReader<'a> {
    data: &'a [u8],
}

impl<'a> SliceReader<'a> {
    /// Wrap a byte slice
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Length of the underlying slice
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the underlying slice is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Read a little-endian u32 at an absolute offset
    pub fn u32_le(&self, offset: usize) -> Result<u32> {
        let end = offset
            .checked_add(4)
            .ok_or_else(|| Error::out_of_bounds(offset, usize::MAX, self.data.len()))?;
        if end > self.data.len() {
            return Err(Error::truncated(end, self.data.len()));
        }
        Ok(LittleEndian::read_u32(&self.data[offset..end]))
    }

    /// Read a single byte at an absolute offset
    pub fn byte(&self, offset: usize) -> Result<u8> {
        self.data
            .get(offset)
            .copied()
            .ok_or_else(|| Error::truncated(offset + 1, self.data.len()))
    }

    /// Borrow the bytes in `[start, end)`
    pub fn slice(&self, start: usize, end: usize) -> Result<&'a [u8]> {
        if start > end || end > self.data.len() {
            return Err(Error::out_of_bounds(start, end, self.data.len()));
        }
        Ok(&self.data[start..end])
    }

    /// Borrow everything from `start` to the end of the slice
    pub fn tail(&self, start: usize) -> Result<&'a [u8]> {
        self.slice(start, self.data.len())
    }
}

/// Decode the lock script out of a hex-encoded cellbase witness
pub fn parse_cellbase_witness(witness_hex: &str) -> Result<Script> {
    let bytes = utils::hex_to_bytes(utils::strip_hex_prefix(witness_hex))?;
    parse_cellbase_witness_bytes(&bytes)
}

/// Decode the lock script out of a raw cellbase witness
pub fn parse_cellbase_witness_bytes(witness: &[u8]) -> Result<Script> {
    let reader = SliceReader::new(witness);
    let script_offset = reader.u32_le(4)? as usize;
    let message_offset = reader.u32_le(8)? as usize;
    let table = reader.slice(script_offset, message_offset)?;
    parse_script_table(table)
}

/// Decode a serialized script table
pub fn parse_script_table(table: &[u8]) -> Result<Script> {
    let reader = SliceReader::new(table);
    let code_hash_offset = reader.u32_le(4)? as usize;
    let hash_type_offset = reader.u32_le(8)? as usize;
    let args_offset = reader.u32_le(12)? as usize;

    let code_hash = Byte32::from_slice(reader.slice(code_hash_offset, hash_type_offset)?)?;
    let hash_type = HashType::from_wire_byte(reader.byte(hash_type_offset)?);

    // The args field immediately follows the one-byte hash type and starts
    // with its own u32 length prefix, which is skipped; the argument bytes
    // are everything after that prefix.
    let args_start = hash_type_offset + 1;
    if args_offset != args_start {
        debug!(args_offset, args_start, "args offset disagrees with hash_type position");
    }
    let declared_len = reader.u32_le(args_start)? as usize;
    let args = reader.tail(args_start + VEC_LEN_SIZE)?;
    if declared_len != args.len() {
        debug!(
            declared_len,
            actual_len = args.len(),
            "args length prefix disagrees with remaining bytes"
        );
    }

    Ok(Script::new(code_hash, hash_type, args.to_vec()))
}

/// Decode the miner's lock script from a block's witness list
///
/// An empty witness list is a valid "no miner info" outcome, not an error.
pub fn miner_script(witnesses: &[String]) -> Result<Option<Script>> {
    match witnesses.first() {
        None => Ok(None),
        Some(witness) => parse_cellbase_witness(witness).map(Some),
    }
}

/// Serialize a script into its binary table form
///
/// Exact inverse of [`parse_script_table`]; also the input to script
/// hashing.
pub fn serialize_script(script: &Script) -> Vec<u8> {
    let code_hash_offset = SCRIPT_HEADER_SIZE;
    let hash_type_offset = code_hash_offset + 32;
    let args_offset = hash_type_offset + 1;
    let total = args_offset + VEC_LEN_SIZE + script.args.len();

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(code_hash_offset as u32).to_le_bytes());
    out.extend_from_slice(&(hash_type_offset as u32).to_le_bytes());
    out.extend_from_slice(&(args_offset as u32).to_le_bytes());
    out.extend_from_slice(script.code_hash.as_bytes());
    out.push(script.hash_type.wire_byte());
    out.extend_from_slice(&(script.args.len() as u32).to_le_bytes());
    out.extend_from_slice(&script.args);
    out
}

/// Serialize a full cellbase witness table (lock script + message)
pub fn serialize_cellbase_witness(script: &Script, message: &[u8]) -> Vec<u8> {
    let script_bytes = serialize_script(script);
    let script_offset = WITNESS_HEADER_SIZE;
    let message_offset = script_offset + script_bytes.len();
    let total = message_offset + VEC_LEN_SIZE + message.len();

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(script_offset as u32).to_le_bytes());
    out.extend_from_slice(&(message_offset as u32).to_le_bytes());
    out.extend_from_slice(&script_bytes);
    out.extend_from_slice(&(message.len() as u32).to_le_bytes());
    out.extend_from_slice(message);
    out
}
