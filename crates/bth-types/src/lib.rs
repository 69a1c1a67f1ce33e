//! Foundation types for the Blockthentic registries.
//!
//! These are the wire-level primitives every registry operation speaks in:
//! 20-byte account and contract addresses, opaque 32-byte identifiers and
//! content hashes, and block timestamps. Every other `bth-*` crate depends on
//! `bth-types`.
//!
//! # Key Types
//!
//! - [`Address`] -- Account or contract address (20 bytes, zero means "none")
//! - [`Bytes32`] -- Opaque identifier or content hash (32 bytes)
//! - [`BlockTime`] -- Block timestamp in seconds since the UNIX epoch

pub mod address;
pub mod bytes;
pub mod error;
pub mod time;

pub use address::{parse_address_or_label, Address};
pub use bytes::{parse_bytes32_or_label, Bytes32};
pub use error::TypeError;
pub use time::BlockTime;

/// Strip an optional `0x`/`0X` prefix from a hex string.
pub(crate) fn strip_hex_prefix(s: &str) -> &str {
    if has_hex_prefix(s) {
        &s[2..]
    } else {
        s
    }
}

pub(crate) fn has_hex_prefix(s: &str) -> bool {
    s.starts_with("0x") || s.starts_with("0X")
}

/// Decode `input` as `N` bytes of hex when it looks like hex: always with a
/// `0x` prefix, otherwise only at exactly `2 * N` hex digits. `None` means the
/// input is a label.
pub(crate) fn parse_hex_or_label<const N: usize>(
    input: &str,
) -> Option<Result<[u8; N], TypeError>> {
    if has_hex_prefix(input) {
        return Some(decode_fixed::<N>(input));
    }
    if input.len() == 2 * N && input.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Some(decode_fixed::<N>(input));
    }
    None
}

/// Decode a hex string into a fixed-size array, reporting length mismatches.
pub(crate) fn decode_fixed<const N: usize>(s: &str) -> Result<[u8; N], TypeError> {
    let bytes =
        hex::decode(strip_hex_prefix(s)).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
    if bytes.len() != N {
        return Err(TypeError::InvalidLength {
            expected: N,
            actual: bytes.len(),
        });
    }
    let mut arr = [0u8; N];
    arr.copy_from_slice(&bytes);
    Ok(arr)
}
