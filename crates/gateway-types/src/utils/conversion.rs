//! Conversion utilities for common data transformations.

use super::formatting::without_0x_prefix;
use alloy_primitives::{Address, B256};

/// Parses a hex string into a 32-byte value.
///
/// Shorter inputs are left-padded with zeros, so a 20-byte address or a
/// small integer such as `0x00` maps onto its canonical bytes32 form.
pub fn parse_b256(value: &str) -> Result<B256, String> {
	let stripped = without_0x_prefix(value);
	let padded = if stripped.len() % 2 == 1 {
		format!("0{}", stripped)
	} else {
		stripped.to_string()
	};
	let bytes = hex::decode(&padded).map_err(|e| format!("Invalid hex '{}': {}", value, e))?;
	if bytes.len() > 32 {
		return Err(format!(
			"Value '{}' is {} bytes, expected at most 32",
			value,
			bytes.len()
		));
	}

	let mut out = [0u8; 32];
	out[32 - bytes.len()..].copy_from_slice(&bytes);
	Ok(B256::from(out))
}

/// Left-pads a 20-byte address into a bytes32 value.
pub fn address_to_b256(address: &Address) -> B256 {
	address.into_word()
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::address;

	#[test]
	fn test_parse_b256_pads_short_values() {
		assert_eq!(parse_b256("0x00").unwrap(), B256::ZERO);
		assert_eq!(parse_b256("0x1").unwrap(), B256::with_last_byte(1));

		let full = "0x1111111111111111111111111111111111111111111111111111111111111111";
		assert_eq!(parse_b256(full).unwrap(), B256::repeat_byte(0x11));
	}

	#[test]
	fn test_parse_b256_rejects_oversized() {
		let too_long = format!("0x{}", "ab".repeat(33));
		assert!(parse_b256(&too_long).is_err());
		assert!(parse_b256("0xzz").is_err());
	}

	#[test]
	fn test_address_to_b256() {
		let addr = address!("D8dA6BF26964aF9D7eEd9e03E53415D37aA96045");
		let word = address_to_b256(&addr);
		assert!(word[..12].iter().all(|&b| b == 0));
		assert_eq!(&word[12..], addr.as_slice());
	}
}
