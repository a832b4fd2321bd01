//! Configuration module for a gateway deployment.
//!
//! Describes which domain a gateway serves, the rollup parameters its
//! settlement messages are bound to, and the protocol identifiers it
//! accepts. Configuration is loaded from TOML and validated before use.
//!
//! ## Modular Configuration Support
//!
//! Configurations can be split into multiple files:
//! - Use `include = ["file1.toml", "file2.toml"]` to include other config files
//! - Each top-level section must be unique across all files (no duplicates allowed)

mod loader;

use alloy_primitives::{Address, B256};
use gateway_settlement::MessageContext;
use gateway_types::{ORDER_DATA_TYPE, SETTLE_ORDER_TYPE};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error that occurs during file I/O operations.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),
	/// Error that occurs when parsing TOML configuration.
	#[error("Configuration error: {0}")]
	Parse(String),
	/// Error that occurs when configuration validation fails.
	#[error("Validation error: {0}")]
	Validation(String),
}

impl From<toml::de::Error> for ConfigError {
	fn from(err: toml::de::Error) -> Self {
		ConfigError::Parse(err.message().to_string())
	}
}

/// Main configuration structure for a gateway.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
	/// Identity of the gateway and the domain it serves.
	pub gateway: GatewayConfig,
	/// Rollup parameters bound into settlement messages.
	pub rollup: RollupConfig,
	/// Protocol identifiers. Defaults to the pinned deployment values.
	#[serde(default)]
	pub protocol: ProtocolConfig,
}

/// Identity of the gateway instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct GatewayConfig {
	/// Domain id of the chain this gateway lives on.
	pub domain: u32,
	/// Address of this gateway, as carried in `destination_settler`.
	pub address: B256,
}

/// Rollup parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct RollupConfig {
	/// Rollup version mixed into message hashes.
	pub version: u64,
	/// Chain id of the settlement layer.
	pub l1_chain_id: u64,
	/// Portal contract receiving settlement messages on the settlement layer.
	pub portal: Address,
}

/// Protocol identifiers a gateway accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProtocolConfig {
	#[serde(default = "default_order_data_type")]
	pub order_data_type: B256,
	#[serde(default = "default_settle_order_type")]
	pub settle_order_type: B256,
}

impl Default for ProtocolConfig {
	fn default() -> Self {
		Self {
			order_data_type: default_order_data_type(),
			settle_order_type: default_settle_order_type(),
		}
	}
}

fn default_order_data_type() -> B256 {
	ORDER_DATA_TYPE
}

fn default_settle_order_type() -> B256 {
	SETTLE_ORDER_TYPE
}

/// Resolves environment variables in a string.
///
/// Replaces ${VAR_NAME} with the value of the environment variable VAR_NAME.
/// Supports default values with ${VAR_NAME:-default_value}.
///
/// Input strings are limited to 1MB.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, ConfigError> {
	const MAX_INPUT_SIZE: usize = 1024 * 1024;
	if input.len() > MAX_INPUT_SIZE {
		return Err(ConfigError::Validation(format!(
			"Configuration file too large: {} bytes (max: {} bytes)",
			input.len(),
			MAX_INPUT_SIZE
		)));
	}

	let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]{0,127})(?::-([^}]{0,256}))?\}")
		.map_err(|e| ConfigError::Parse(format!("Regex error: {}", e)))?;

	let mut result = input.to_string();
	let mut replacements = Vec::new();

	for cap in re.captures_iter(input) {
		let (Some(full_match), Some(var_name)) = (cap.get(0), cap.get(1)) else {
			continue;
		};
		let default_value = cap.get(2).map(|m| m.as_str());

		let value = match std::env::var(var_name.as_str()) {
			Ok(v) => v,
			Err(_) => match default_value {
				Some(default) => default.to_string(),
				None => {
					return Err(ConfigError::Validation(format!(
						"Environment variable '{}' not found",
						var_name.as_str()
					)));
				},
			},
		};

		replacements.push((full_match.start(), full_match.end(), value));
	}

	// Apply replacements in reverse order to maintain positions
	for (start, end, value) in replacements.iter().rev() {
		result.replace_range(start..end, value);
	}

	Ok(result)
}

impl Config {
	/// Loads configuration from a file, following `include` directives.
	///
	/// Each top-level section must be unique across all configuration files.
	pub async fn from_file(path: &str) -> Result<Self, ConfigError> {
		let path_buf = Path::new(path);
		let base_dir = path_buf.parent().unwrap_or_else(|| Path::new("."));

		let mut loader = loader::ConfigLoader::new(base_dir);
		let file_name = path_buf
			.file_name()
			.ok_or_else(|| ConfigError::Validation(format!("Invalid path: {}", path)))?;
		loader.load_config(file_name).await
	}

	/// Message context for settlement messages sent or verified by this
	/// gateway.
	pub fn message_context(&self) -> MessageContext {
		MessageContext::new(self.rollup.version, self.rollup.l1_chain_id)
	}

	/// Validates the configuration to ensure all required fields are properly set.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.gateway.domain == 0 {
			return Err(ConfigError::Validation(
				"Gateway domain cannot be 0".into(),
			));
		}
		if self.gateway.address.is_zero() {
			return Err(ConfigError::Validation(
				"Gateway address cannot be zero".into(),
			));
		}
		if self.rollup.version == 0 {
			return Err(ConfigError::Validation(
				"Rollup version cannot be 0".into(),
			));
		}
		if self.rollup.l1_chain_id == 0 {
			return Err(ConfigError::Validation(
				"Settlement layer chain id cannot be 0".into(),
			));
		}
		if self.rollup.portal.is_zero() {
			return Err(ConfigError::Validation(
				"Portal address cannot be zero".into(),
			));
		}
		if self.protocol.order_data_type.is_zero() || self.protocol.settle_order_type.is_zero() {
			return Err(ConfigError::Validation(
				"Protocol type identifiers cannot be zero".into(),
			));
		}
		if self.protocol.order_data_type == self.protocol.settle_order_type {
			return Err(ConfigError::Validation(
				"Order data type and settle order type must differ".into(),
			));
		}

		if self.protocol.order_data_type != ORDER_DATA_TYPE {
			tracing::warn!(
				order_data_type = %self.protocol.order_data_type,
				"Order data type differs from the deployed gateways"
			);
		}
		Ok(())
	}

	/// A valid configuration for tests.
	#[cfg(any(test, feature = "testing"))]
	pub fn for_testing(domain: u32, address: B256) -> Self {
		Self {
			gateway: GatewayConfig { domain, address },
			rollup: RollupConfig {
				version: 1,
				l1_chain_id: 11_155_111,
				portal: Address::repeat_byte(0x77),
			},
			protocol: ProtocolConfig::default(),
		}
	}
}

/// Parses a TOML string, resolving environment variables and validating
/// the result.
impl FromStr for Config {
	type Err = ConfigError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let resolved = resolve_env_vars(s)?;
		let config: Config = toml::from_str(&resolved)?;
		config.validate()?;
		Ok(config)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const BASE: &str = r#"
[gateway]
domain = 999999
address = "0x1111111111111111111111111111111111111111111111111111111111111111"

[rollup]
version = 1
l1_chain_id = 11155111
portal = "0x7777777777777777777777777777777777777777"
"#;

	#[test]
	fn test_env_var_resolution() {
		std::env::set_var("GATEWAY_TEST_HOST", "localhost");
		std::env::set_var("GATEWAY_TEST_PORT", "5432");

		let input = "host = \"${GATEWAY_TEST_HOST}:${GATEWAY_TEST_PORT}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "host = \"localhost:5432\"");

		std::env::remove_var("GATEWAY_TEST_HOST");
		std::env::remove_var("GATEWAY_TEST_PORT");
	}

	#[test]
	fn test_env_var_with_default() {
		let input = "value = \"${GATEWAY_MISSING_VAR:-default_value}\"";
		let result = resolve_env_vars(input).unwrap();
		assert_eq!(result, "value = \"default_value\"");
	}

	#[test]
	fn test_missing_env_var_error() {
		let input = "value = \"${GATEWAY_MISSING_VAR}\"";
		let result = resolve_env_vars(input);
		assert!(result.is_err());
		assert!(result
			.unwrap_err()
			.to_string()
			.contains("GATEWAY_MISSING_VAR"));
	}

	#[test]
	fn test_parse_with_protocol_defaults() {
		let config: Config = BASE.parse().unwrap();
		assert_eq!(config.gateway.domain, 999_999);
		assert_eq!(config.protocol.order_data_type, ORDER_DATA_TYPE);
		assert_eq!(config.protocol.settle_order_type, SETTLE_ORDER_TYPE);
		assert_eq!(config.message_context(), MessageContext::new(1, 11_155_111));
	}

	#[test]
	fn test_config_with_env_vars() {
		std::env::set_var("GATEWAY_TEST_DOMAIN", "11155420");
		let config_str = BASE.replace("999999", "${GATEWAY_TEST_DOMAIN}");

		let config: Config = config_str.parse().unwrap();
		assert_eq!(config.gateway.domain, 11_155_420);

		std::env::remove_var("GATEWAY_TEST_DOMAIN");
	}

	#[test]
	fn test_validation_rejects_zero_portal() {
		let config_str = BASE.replace(
			"0x7777777777777777777777777777777777777777",
			"0x0000000000000000000000000000000000000000",
		);
		let err = config_str.parse::<Config>().unwrap_err();
		assert!(err.to_string().contains("Portal"));
	}

	#[test]
	fn test_validation_rejects_identical_type_identifiers() {
		let config_str = format!(
			"{}\n[protocol]\norder_data_type = \"{}\"\nsettle_order_type = \"{}\"\n",
			BASE, SETTLE_ORDER_TYPE, SETTLE_ORDER_TYPE
		);
		let err = config_str.parse::<Config>().unwrap_err();
		assert!(matches!(err, ConfigError::Validation(_)));
	}

	#[test]
	fn test_missing_section_is_parse_error() {
		let err = "[gateway]\ndomain = 1\n".parse::<Config>().unwrap_err();
		assert!(matches!(err, ConfigError::Parse(_)));
	}
}
