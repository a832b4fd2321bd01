//! EIP-7683 gateway log records.
//!
//! Layout of each record, one 32-byte field per entry:
//!
//! ```text
//! open:     [OPEN, order_id, fill_deadline]
//! resolved: [RESOLVED, user, origin_chain_id, open_deadline, fill_deadline, order_id,
//!            max_spent.{token, amount, recipient, chain_id},
//!            min_received.{token, amount, recipient, chain_id},
//!            fill_instruction.{destination_chain_id, destination_settler},
//!            packed(origin_data)...]
//! filled:   [FILLED, order_id, filler_data, packed(origin_data)...]
//! settled:  [SETTLED, order_id, receiver]
//! ```
//!
//! Parsers require the exact arity; a record with missing or extra fields is
//! rejected rather than truncated or padded.

use crate::schema::{
	LogTag, FILLED_LOG_HEAD_LEN, LEGS_PER_ORDER_V1, OPEN_LOG_LEN, RESOLVED_LOG_HEAD_LEN,
	SETTLED_LOG_LEN,
};
use crate::LogError;
use alloy_primitives::{Bytes, B256, U256};
use gateway_types::{
	utils::{
		field_to_u256, field_to_u32, pack_bytes, packed_len, parse_b256, u256_to_field,
		u32_to_field, unpack_bytes, without_0x_prefix,
	},
	FillInstruction, FilledRecord, Output, ResolvedCrossChainOrder, SettledRecord,
};
use serde_json::Value;
use std::str::FromStr;

const RESOLVED_KEYS: &[&str] = &[
	"user",
	"originChainId",
	"openDeadline",
	"fillDeadline",
	"orderId",
	"maxSpent",
	"minReceived",
	"fillInstructions",
];
const OUTPUT_KEYS: &[&str] = &["token", "amount", "recipient", "chainId"];
const FILL_INSTRUCTION_KEYS: &[&str] = &["destinationChainId", "destinationSettler", "originData"];

/// Encodes the open record announcing a new order.
pub fn encode_open_log(order_id: B256, fill_deadline: u32) -> Vec<B256> {
	vec![LogTag::Open.field(), order_id, u32_to_field(fill_deadline)]
}

/// Encodes the resolved record emitted alongside an open record.
///
/// # Errors
///
/// Returns `LogError::MalformedLog` if the order does not carry exactly
/// `LEGS_PER_ORDER_V1` legs in each array.
pub fn encode_resolved_log(resolved: &ResolvedCrossChainOrder) -> Result<Vec<B256>, LogError> {
	let max_spent = single_leg(&resolved.max_spent, "maxSpent")?;
	let min_received = single_leg(&resolved.min_received, "minReceived")?;
	let instruction = single_leg(&resolved.fill_instructions, "fillInstructions")?;

	let mut fields =
		Vec::with_capacity(RESOLVED_LOG_HEAD_LEN + packed_len(instruction.origin_data.len()));
	fields.extend([
		LogTag::Resolved.field(),
		resolved.user,
		u32_to_field(resolved.origin_chain_id),
		u32_to_field(resolved.open_deadline),
		u32_to_field(resolved.fill_deadline),
		resolved.order_id,
	]);
	push_output(&mut fields, max_spent);
	push_output(&mut fields, min_received);
	fields.push(u32_to_field(instruction.destination_chain_id));
	fields.push(instruction.destination_settler);
	fields.extend(pack_bytes(&instruction.origin_data));
	Ok(fields)
}

/// Encodes the record emitted when an order is filled.
pub fn encode_filled_log(order_id: B256, origin_data: &[u8], filler_data: B256) -> Vec<B256> {
	let mut fields = Vec::with_capacity(FILLED_LOG_HEAD_LEN + packed_len(origin_data.len()));
	fields.extend([LogTag::Filled.field(), order_id, filler_data]);
	fields.extend(pack_bytes(origin_data));
	fields
}

/// Encodes the record emitted when settlement releases funds.
pub fn encode_settled_log(order_id: B256, receiver: B256) -> Vec<B256> {
	vec![LogTag::Settled.field(), order_id, receiver]
}

/// Resolves an opened order from its open and resolved records.
///
/// # Errors
///
/// Returns `LogError::MalformedLog` on any arity or tag mismatch, or if the
/// two records disagree on the order id or fill deadline.
pub fn parse_open_log(
	open: &[B256],
	resolved: &[B256],
) -> Result<ResolvedCrossChainOrder, LogError> {
	expect_record(open, LogTag::Open, OPEN_LOG_LEN)?;
	let order_id = open[1];
	let fill_deadline = u32_at(open, 2, "fillDeadline")?;

	let order = parse_resolved_log(resolved)?;
	if order.order_id != order_id {
		return Err(LogError::MalformedLog(format!(
			"Open log order id {} does not match resolved order id {}",
			order_id, order.order_id
		)));
	}
	if order.fill_deadline != fill_deadline {
		return Err(LogError::MalformedLog(format!(
			"Open log fill deadline {} does not match resolved fill deadline {}",
			fill_deadline, order.fill_deadline
		)));
	}

	tracing::debug!(order_id = %order_id, "Resolved open log");
	Ok(order)
}

fn parse_resolved_log(fields: &[B256]) -> Result<ResolvedCrossChainOrder, LogError> {
	expect_tag(fields, LogTag::Resolved)?;
	if fields.len() < RESOLVED_LOG_HEAD_LEN + 1 {
		return Err(arity_error(LogTag::Resolved, RESOLVED_LOG_HEAD_LEN + 1, fields.len()));
	}

	let (origin_data, consumed) = unpack_bytes(&fields[RESOLVED_LOG_HEAD_LEN..])
		.map_err(|e| LogError::MalformedLog(format!("originData: {}", e)))?;
	if RESOLVED_LOG_HEAD_LEN + consumed != fields.len() {
		return Err(arity_error(
			LogTag::Resolved,
			RESOLVED_LOG_HEAD_LEN + consumed,
			fields.len(),
		));
	}

	Ok(ResolvedCrossChainOrder {
		user: fields[1],
		origin_chain_id: u32_at(fields, 2, "originChainId")?,
		open_deadline: u32_at(fields, 3, "openDeadline")?,
		fill_deadline: u32_at(fields, 4, "fillDeadline")?,
		order_id: fields[5],
		max_spent: vec![output_at(fields, 6)?],
		min_received: vec![output_at(fields, 10)?],
		fill_instructions: vec![FillInstruction {
			destination_chain_id: u32_at(fields, 14, "destinationChainId")?,
			destination_settler: fields[15],
			origin_data,
		}],
	})
}

/// Parses a filled record.
pub fn parse_filled_log(fields: &[B256]) -> Result<FilledRecord, LogError> {
	expect_tag(fields, LogTag::Filled)?;
	if fields.len() < FILLED_LOG_HEAD_LEN + 1 {
		return Err(arity_error(LogTag::Filled, FILLED_LOG_HEAD_LEN + 1, fields.len()));
	}

	let (origin_data, consumed) = unpack_bytes(&fields[FILLED_LOG_HEAD_LEN..])
		.map_err(|e| LogError::MalformedLog(format!("originData: {}", e)))?;
	if FILLED_LOG_HEAD_LEN + consumed != fields.len() {
		return Err(arity_error(
			LogTag::Filled,
			FILLED_LOG_HEAD_LEN + consumed,
			fields.len(),
		));
	}

	Ok(FilledRecord {
		order_id: fields[1],
		origin_data,
		filler_data: fields[2],
	})
}

/// Parses a settled record.
pub fn parse_settled_log(fields: &[B256]) -> Result<SettledRecord, LogError> {
	expect_record(fields, LogTag::Settled, SETTLED_LOG_LEN)?;
	Ok(SettledRecord {
		order_id: fields[1],
		receiver: fields[2],
	})
}

/// Normalises a loosely typed decode of a resolved order.
///
/// Accepts camelCase keys, with 32-byte values and amounts as hex strings or
/// JSON numbers and chain ids or deadlines as numbers, decimal strings or
/// hex strings. Each leg array must hold exactly `LEGS_PER_ORDER_V1`
/// elements. Unknown keys are rejected, at the top level and in every leg.
pub fn parse_resolved_cross_chain_order(raw: &Value) -> Result<ResolvedCrossChainOrder, LogError> {
	expect_keys(raw, "resolved order", RESOLVED_KEYS)?;
	let max_spent = json_legs(raw, "maxSpent")?
		.iter()
		.map(json_output)
		.collect::<Result<Vec<_>, _>>()?;
	let min_received = json_legs(raw, "minReceived")?
		.iter()
		.map(json_output)
		.collect::<Result<Vec<_>, _>>()?;
	let fill_instructions = json_legs(raw, "fillInstructions")?
		.iter()
		.map(|leg| {
			expect_keys(leg, "fillInstructions", FILL_INSTRUCTION_KEYS)?;
			Ok(FillInstruction {
				destination_chain_id: json_u32(leg, "destinationChainId")?,
				destination_settler: json_b256(leg, "destinationSettler")?,
				origin_data: json_bytes(leg, "originData")?,
			})
		})
		.collect::<Result<Vec<_>, LogError>>()?;

	Ok(ResolvedCrossChainOrder {
		user: json_b256(raw, "user")?,
		origin_chain_id: json_u32(raw, "originChainId")?,
		open_deadline: json_u32(raw, "openDeadline")?,
		fill_deadline: json_u32(raw, "fillDeadline")?,
		order_id: json_b256(raw, "orderId")?,
		max_spent,
		min_received,
		fill_instructions,
	})
}

fn single_leg<'a, T>(legs: &'a [T], name: &str) -> Result<&'a T, LogError> {
	match legs {
		[leg] => Ok(leg),
		_ => Err(LogError::MalformedLog(format!(
			"{} has {} legs, expected {}",
			name,
			legs.len(),
			LEGS_PER_ORDER_V1
		))),
	}
}

fn push_output(fields: &mut Vec<B256>, output: &Output) {
	fields.push(output.token);
	fields.push(u256_to_field(output.amount));
	fields.push(output.recipient);
	fields.push(u32_to_field(output.chain_id));
}

fn output_at(fields: &[B256], start: usize) -> Result<Output, LogError> {
	Ok(Output {
		token: fields[start],
		amount: field_to_u256(&fields[start + 1]),
		recipient: fields[start + 2],
		chain_id: u32_at(fields, start + 3, "chainId")?,
	})
}

fn expect_tag(fields: &[B256], tag: LogTag) -> Result<(), LogError> {
	match fields.first().and_then(LogTag::from_field) {
		Some(found) if found == tag => Ok(()),
		found => Err(LogError::MalformedLog(format!(
			"Expected {:?} record, found {:?}",
			tag, found
		))),
	}
}

fn expect_record(fields: &[B256], tag: LogTag, len: usize) -> Result<(), LogError> {
	expect_tag(fields, tag)?;
	if fields.len() != len {
		return Err(arity_error(tag, len, fields.len()));
	}
	Ok(())
}

fn arity_error(tag: LogTag, expected: usize, actual: usize) -> LogError {
	LogError::MalformedLog(format!(
		"{:?} record has {} fields, expected {}",
		tag, actual, expected
	))
}

fn u32_at(fields: &[B256], index: usize, name: &str) -> Result<u32, LogError> {
	field_to_u32(&fields[index]).map_err(|e| LogError::MalformedLog(format!("{}: {}", name, e)))
}

fn json_field<'a>(value: &'a Value, key: &str) -> Result<&'a Value, LogError> {
	value
		.get(key)
		.ok_or_else(|| LogError::MalformedLog(format!("Missing field '{}'", key)))
}

/// Fails on the first key of `value` outside `allowed`.
fn expect_keys(value: &Value, name: &str, allowed: &[&str]) -> Result<(), LogError> {
	let object = value
		.as_object()
		.ok_or_else(|| LogError::MalformedLog(format!("{} is not an object", name)))?;
	match object.keys().find(|key| !allowed.contains(&key.as_str())) {
		Some(key) => Err(LogError::MalformedLog(format!(
			"Unexpected field '{}' in {}",
			key, name
		))),
		None => Ok(()),
	}
}

fn json_legs<'a>(value: &'a Value, key: &str) -> Result<&'a Vec<Value>, LogError> {
	let legs = json_field(value, key)?
		.as_array()
		.ok_or_else(|| LogError::MalformedLog(format!("Field '{}' is not an array", key)))?;
	single_leg(legs, key)?;
	Ok(legs)
}

fn json_output(leg: &Value) -> Result<Output, LogError> {
	expect_keys(leg, "output", OUTPUT_KEYS)?;
	Ok(Output {
		token: json_b256(leg, "token")?,
		amount: json_u256(leg, "amount")?,
		recipient: json_b256(leg, "recipient")?,
		chain_id: json_u32(leg, "chainId")?,
	})
}

fn json_b256(value: &Value, key: &str) -> Result<B256, LogError> {
	match json_field(value, key)? {
		Value::String(s) => parse_b256(s)
			.map_err(|e| LogError::MalformedLog(format!("Field '{}': {}", key, e))),
		Value::Number(_) => json_u256(value, key).map(u256_to_field),
		other => Err(LogError::MalformedLog(format!(
			"Field '{}' has unsupported value {}",
			key, other
		))),
	}
}

fn json_u256(value: &Value, key: &str) -> Result<U256, LogError> {
	match json_field(value, key)? {
		Value::Number(n) => n.as_u64().map(U256::from).ok_or_else(|| {
			LogError::MalformedLog(format!("Field '{}' is not an unsigned integer", key))
		}),
		Value::String(s) => U256::from_str(s)
			.map_err(|e| LogError::MalformedLog(format!("Field '{}': {}", key, e))),
		other => Err(LogError::MalformedLog(format!(
			"Field '{}' has unsupported value {}",
			key, other
		))),
	}
}

fn json_u32(value: &Value, key: &str) -> Result<u32, LogError> {
	let wide = json_u256(value, key)?;
	u32::try_from(wide)
		.map_err(|_| LogError::MalformedLog(format!("Field '{}' value {} exceeds u32", key, wide)))
}

fn json_bytes(value: &Value, key: &str) -> Result<Bytes, LogError> {
	match json_field(value, key)? {
		Value::String(s) => hex::decode(without_0x_prefix(s))
			.map(Bytes::from)
			.map_err(|e| LogError::MalformedLog(format!("Field '{}': {}", key, e))),
		other => Err(LogError::MalformedLog(format!(
			"Field '{}' has unsupported value {}",
			key, other
		))),
	}
}
