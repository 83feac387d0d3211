//! Utility functions and helpers
//!
//! Hex handling shared by the witness codec, address encoding, and
//! configuration loading.

use crate::{Error, Result};

/// Strip an optional `0x` prefix from a hex string
pub fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x").unwrap_or(s)
}

/// Validate hex string format
pub fn validate_hex_string(s: &str, expected_len: Option<usize>) -> Result<()> {
    if let Some(len) = expected_len {
        if s.len() != len {
            return Err(Error::unexpected_length(len / 2, s.len() / 2));
        }
    }

    if s.is_empty() || s.len() % 2 != 0 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(Error::Hex(hex::FromHexError::OddLength));
    }

    Ok(())
}

/// Convert hex string to bytes
pub fn hex_to_bytes(hex: &str) -> Result<Vec<u8>> {
    hex::decode(hex).map_err(Error::from)
}

/// Convert bytes to hex string
pub fn bytes_to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_hex_prefix() {
        assert_eq!(strip_hex_prefix("0xdeadbeef"), "deadbeef");
        assert_eq!(strip_hex_prefix("deadbeef"), "deadbeef");
        assert_eq!(strip_hex_prefix(""), "");
    }

    #[test]
    fn test_validate_hex_string() {
        assert!(validate_hex_string("deadbeef", Some(8)).is_ok());
        assert!(validate_hex_string("DEADBEEF", Some(8)).is_ok());
        assert!(validate_hex_string("123456789abcdef0", None).is_ok());

        assert!(validate_hex_string("deadbeef", Some(10)).is_err());
        assert!(validate_hex_string("deadbzzf", None).is_err());
        assert!(validate_hex_string("abc", None).is_err());
        assert!(validate_hex_string("", Some(2)).is_err());
    }

    #[test]
    fn test_hex_conversion() {
        let bytes = vec![0xde, 0xad, 0xbe, 0xef];
        let hex = "deadbeef";

        assert_eq!(hex_to_bytes(hex).unwrap(), bytes);
        assert_eq!(bytes_to_hex(&bytes), hex);
    }
}
