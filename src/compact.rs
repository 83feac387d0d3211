//! Compact target and difficulty conversion
//!
//! A block header carries its proof-of-work target in a 32-bit compact
//! form: the top byte is a base-256 exponent and the low 24 bits are the
//! mantissa. The full target is a 256-bit integer and the difficulty is
//! `2^256 / target`, both computed with exact unsigned integer arithmetic
//! with no floating point and no silent wrapping.

use primitive_types::{U256, U512};

/// Exponent values above this cannot be represented in 256 bits
const MAX_EXPONENT: u32 = 32;

/// Expand a compact target into its full 256-bit form
///
/// Returns the target together with an overflow flag; the flag is set when
/// the mantissa is non-zero and the exponent pushes it past 256 bits, in
/// which case the returned target must not be used.
pub fn compact_to_target(compact: u32) -> (U256, bool) {
    let exponent = compact >> 24;
    let mantissa = compact & 0x00ff_ffff;

    let target = if exponent <= 3 {
        U256::from(mantissa >> (8 * (3 - exponent)))
    } else {
        U256::from(mantissa) << (8 * (exponent - 3) as usize)
    };
    let overflow = mantissa != 0 && exponent > MAX_EXPONENT;

    (target, overflow)
}

/// Difficulty corresponding to a target: `2^256 / target`
///
/// The quotient is taken in 512-bit space so nothing wraps; a zero target
/// maps to the maximum difficulty, and a target of one saturates to
/// `U256::MAX` (the exact quotient `2^256` exceeds the representation by
/// one).
pub fn target_to_difficulty(target: &U256) -> U256 {
    if target.is_zero() {
        return U256::MAX;
    }
    let hspace: U512 = U512::one() << 256;
    let difficulty = hspace / U512::from(*target);
    U256::try_from(difficulty).unwrap_or(U256::MAX)
}

/// Difficulty of a block given its compact target header field
///
/// A zero target or an overflowing expansion yields zero difficulty, which
/// callers treat as "no usable value" rather than consuming a bogus one.
pub fn compact_to_difficulty(compact: u32) -> U256 {
    let (target, overflow) = compact_to_target(compact);
    if target.is_zero() || overflow {
        return U256::zero();
    }
    target_to_difficulty(&target)
}
