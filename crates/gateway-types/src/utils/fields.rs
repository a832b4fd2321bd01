//! Packing of values into 32-byte log fields.
//!
//! Gateway logs are flat arrays of 32-byte fields. Integers are stored
//! right-aligned big-endian. Byte strings are stored as a length field
//! followed by `ceil(len / 31)` chunk fields; each chunk occupies bytes
//! `1..32` of its field (the leading byte stays zero so the field is a valid
//! element on the settlement domain) and unused tail bytes are zero.

use alloy_primitives::{Bytes, B256, U256};
use thiserror::Error;

/// Number of payload bytes carried by one chunk field.
pub const BYTES_PER_CHUNK: usize = 31;

/// Errors raised when a field does not hold the value shape expected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
	#[error("Value {value} does not fit in {bits} bits")]
	OutOfRange { value: U256, bits: u32 },
	#[error("Byte string needs {expected} fields, {actual} available")]
	Truncated { expected: usize, actual: usize },
	#[error("Chunk field {index} has non-zero padding")]
	NonZeroPadding { index: usize },
}

pub fn u32_to_field(value: u32) -> B256 {
	u256_to_field(U256::from(value))
}

pub fn u64_to_field(value: u64) -> B256 {
	u256_to_field(U256::from(value))
}

pub fn u256_to_field(value: U256) -> B256 {
	B256::from(value.to_be_bytes::<32>())
}

pub fn field_to_u256(field: &B256) -> U256 {
	U256::from_be_bytes(field.0)
}

/// Reads a field that must hold a value below 2^32.
pub fn field_to_u32(field: &B256) -> Result<u32, FieldError> {
	let value = field_to_u256(field);
	if field[..28].iter().any(|&b| b != 0) {
		return Err(FieldError::OutOfRange { value, bits: 32 });
	}
	Ok(u32::from_be_bytes([field[28], field[29], field[30], field[31]]))
}

/// Number of fields `pack_bytes` produces for `byte_len` bytes.
pub fn packed_len(byte_len: usize) -> usize {
	1 + byte_len.div_ceil(BYTES_PER_CHUNK)
}

/// Packs a byte string as a length field followed by chunk fields.
pub fn pack_bytes(bytes: &[u8]) -> Vec<B256> {
	let mut fields = Vec::with_capacity(packed_len(bytes.len()));
	fields.push(u64_to_field(bytes.len() as u64));
	for chunk in bytes.chunks(BYTES_PER_CHUNK) {
		let mut field = [0u8; 32];
		field[1..1 + chunk.len()].copy_from_slice(chunk);
		fields.push(B256::from(field));
	}
	fields
}

/// Unpacks a byte string from the start of `fields`.
///
/// Returns the bytes and the number of fields consumed. Padding that is not
/// zero is rejected so every byte string has exactly one packed form.
pub fn unpack_bytes(fields: &[B256]) -> Result<(Bytes, usize), FieldError> {
	let len_field = fields.first().ok_or(FieldError::Truncated {
		expected: 1,
		actual: 0,
	})?;
	let len = field_to_u32(len_field)? as usize;
	let consumed = packed_len(len);
	if fields.len() < consumed {
		return Err(FieldError::Truncated {
			expected: consumed,
			actual: fields.len(),
		});
	}

	let mut out = Vec::with_capacity(len);
	for (index, field) in fields[1..consumed].iter().enumerate() {
		let take = (len - out.len()).min(BYTES_PER_CHUNK);
		if field[0] != 0 || field[1 + take..].iter().any(|&b| b != 0) {
			return Err(FieldError::NonZeroPadding { index });
		}
		out.extend_from_slice(&field[1..1 + take]);
	}

	Ok((Bytes::from(out), consumed))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_u32_bounds() {
		assert_eq!(field_to_u32(&u32_to_field(u32::MAX)), Ok(u32::MAX));
		assert!(matches!(
			field_to_u32(&u64_to_field(1 << 32)),
			Err(FieldError::OutOfRange { bits: 32, .. })
		));
	}

	#[test]
	fn test_packed_len() {
		assert_eq!(packed_len(0), 1);
		assert_eq!(packed_len(31), 2);
		assert_eq!(packed_len(32), 3);
		assert_eq!(packed_len(301), 11);
	}

	#[test]
	fn test_pack_layout() {
		let bytes: Vec<u8> = (1..=33).collect();
		let fields = pack_bytes(&bytes);

		assert_eq!(fields.len(), 3);
		assert_eq!(field_to_u32(&fields[0]), Ok(33));
		assert_eq!(fields[1][0], 0);
		assert_eq!(fields[1][1], 1);
		assert_eq!(fields[1][31], 31);
		assert_eq!(fields[2][1], 32);
		assert_eq!(fields[2][2], 33);
		assert!(fields[2][3..].iter().all(|&b| b == 0));
	}

	#[test]
	fn test_unpack_ignores_trailing_fields() {
		let mut fields = pack_bytes(b"hello");
		fields.push(B256::repeat_byte(0xff));

		let (bytes, consumed) = unpack_bytes(&fields).unwrap();
		assert_eq!(bytes.as_ref(), b"hello");
		assert_eq!(consumed, 2);
	}

	#[test]
	fn test_unpack_rejects_dirty_padding() {
		let mut fields = pack_bytes(b"hi");
		let mut chunk = fields[1].0;
		chunk[10] = 1;
		fields[1] = B256::from(chunk);

		assert_eq!(
			unpack_bytes(&fields),
			Err(FieldError::NonZeroPadding { index: 0 })
		);
	}

	#[test]
	fn test_unpack_rejects_missing_chunks() {
		let fields = pack_bytes(&[9u8; 40]);
		assert_eq!(
			unpack_bytes(&fields[..2]),
			Err(FieldError::Truncated {
				expected: 3,
				actual: 2
			})
		);
	}
}
