//! Cache tuning knobs.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Upper bound on [`CacheConfig::shards`].
pub const MAX_SHARDS: usize = 1024;

const DEFAULT_SHARDS: usize = 64;

/// Construction-time settings for a [`crate::TypeInfoCache`].
///
/// Deserializes from a table with every field optional, so hosts can embed it
/// in their own configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
	/// Number of independently published map shards. Must be a power of two.
	pub shards: usize,
}

impl Default for CacheConfig {
	fn default() -> Self {
		Self {
			shards: DEFAULT_SHARDS,
		}
	}
}

impl CacheConfig {
	pub fn with_shards(shards: usize) -> Self {
		Self { shards }
	}

	pub fn validate(&self) -> Result<(), ConfigError> {
		if self.shards == 0 || self.shards > MAX_SHARDS {
			return Err(ConfigError::ShardsOutOfRange {
				shards: self.shards,
				max: MAX_SHARDS,
			});
		}
		if !self.shards.is_power_of_two() {
			return Err(ConfigError::ShardsNotPowerOfTwo {
				shards: self.shards,
			});
		}
		Ok(())
	}
}
