//! Utility functions for common type conversions and transformations.
//!
//! Hashing, log field packing, hex parsing and string formatting helpers
//! shared by every gateway component.

pub mod constants;
pub mod conversion;
pub mod fields;
pub mod formatting;
pub mod hashing;

pub use conversion::{address_to_b256, parse_b256};
pub use fields::{
	field_to_u256, field_to_u32, pack_bytes, packed_len, u256_to_field, u32_to_field,
	u64_to_field, unpack_bytes, FieldError, BYTES_PER_CHUNK,
};
pub use formatting::{truncate_id, without_0x_prefix};
pub use hashing::sha256_to_field;
