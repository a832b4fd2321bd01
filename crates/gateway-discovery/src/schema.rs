//! Log record schema.
//!
//! Every record opens with a tag field naming its kind. The arity of each
//! record is fixed for a given schema version; v1 orders carry exactly one
//! leg in each of `max_spent`, `min_received` and `fill_instructions`.

use gateway_types::{utils::u32_to_field, B256};

/// Version of the record layout produced by `encode_*_log`.
pub const LOG_SCHEMA_VERSION: u32 = 1;

/// Number of legs per order array in schema v1.
pub const LEGS_PER_ORDER_V1: usize = 1;

/// Fields in an open record: tag, order id, fill deadline.
pub const OPEN_LOG_LEN: usize = 3;

/// Fields in a settled record: tag, order id, receiver.
pub const SETTLED_LOG_LEN: usize = 3;

/// Fields before the packed origin data in a resolved record.
pub const RESOLVED_LOG_HEAD_LEN: usize = 16;

/// Fields before the packed origin data in a filled record.
pub const FILLED_LOG_HEAD_LEN: usize = 3;

/// Kind of a gateway log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum LogTag {
	Open = 1,
	Resolved = 2,
	Filled = 3,
	Settled = 4,
}

impl LogTag {
	/// The tag as the leading field of a record.
	pub fn field(self) -> B256 {
		u32_to_field(self as u32)
	}

	/// Reads a tag field, returning `None` for anything else.
	pub fn from_field(field: &B256) -> Option<Self> {
		if field[..31].iter().any(|&b| b != 0) {
			return None;
		}
		match field[31] {
			1 => Some(Self::Open),
			2 => Some(Self::Resolved),
			3 => Some(Self::Filled),
			4 => Some(Self::Settled),
			_ => None,
		}
	}
}
