//! Registry tuning knobs.

use std::num::NonZeroUsize;

use serde::Deserialize;
use thiserror::Error;

const DEFAULT_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1000) {
	Some(capacity) => capacity,
	None => unreachable!(),
};

/// Per-registry settings.
///
/// Every field has a default, so an empty document is a valid config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistryConfig {
	/// Maximum number of memoized lookups, negative results included.
	pub cache_capacity: NonZeroUsize,
}

impl Default for RegistryConfig {
	fn default() -> Self {
		Self {
			cache_capacity: DEFAULT_CACHE_CAPACITY,
		}
	}
}

impl RegistryConfig {
	/// Parses a TOML document such as `cache_capacity = 64`.
	pub fn from_toml_str(src: &str) -> Result<Self, ConfigError> {
		Ok(toml::from_str(src)?)
	}

	pub fn with_cache_capacity(mut self, capacity: NonZeroUsize) -> Self {
		self.cache_capacity = capacity;
		self
	}
}

#[derive(Error, Debug)]
pub enum ConfigError {
	#[error("invalid registry config: {0}")]
	Toml(#[from] toml::de::Error),
}
