//! Address decoding.
//!
//! An address is base58 over 26 bytes: version, chain byte, 20-byte public
//! key hash, 4-byte checksum. Only the layout is checked here.

use crate::blockchain::types::ChainByte;

/// Address format version.
pub const ADDRESS_VERSION: u8 = 1;

/// Decoded address length in bytes.
pub const ADDRESS_LENGTH: usize = 26;

/// Chain byte embedded in `address`, or `None` if it is not an address.
pub fn chain_byte_of(address: &str) -> Option<ChainByte> {
    let bytes = bs58::decode(address).into_vec().ok()?;
    if bytes.len() != ADDRESS_LENGTH || bytes[0] != ADDRESS_VERSION {
        return None;
    }
    Some(ChainByte(bytes[1]))
}

/// First path segment that decodes as an address.
pub fn find_address(path: &str) -> Option<(&str, ChainByte)> {
    path.split(|c: char| c == '/' || c == '?' || c == '#')
        .filter(|segment| !segment.is_empty())
        .find_map(|segment| chain_byte_of(segment).map(|byte| (segment, byte)))
}

#[cfg(test)]
pub(crate) fn encode_test_address(chain: ChainByte) -> String {
    let mut bytes = vec![ADDRESS_VERSION, chain.0];
    bytes.extend((0u8..24).map(|i| i.wrapping_mul(7)));
    bs58::encode(bytes).into_string()
}
