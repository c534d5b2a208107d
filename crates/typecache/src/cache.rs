//! Get-or-create facade over [`InterningMap`].
//!
//! # Role
//!
//! Turns a primary type plus ordered tags into a composite key, short-circuits
//! the empty identity to a shared sentinel, and otherwise resolves through the
//! map. Construction of a new descriptor happens before the map is touched for
//! writing, so an expensive constructor never blocks unrelated keys.
//!
//! # Invariants
//!
//! - Same inputs resolve to the same allocation (see `invariants::test_find_or_create_is_idempotent`).
//! - The empty identity never reaches the map (see `invariants::test_empty_identity_bypasses_map`).

use std::sync::Arc;

use typecache_symbol::Symbol;

use crate::config::CacheConfig;
use crate::descriptor::{Descriptor, PrimTypeInfo};
use crate::error::ConfigError;
use crate::key::build_key;
use crate::map::{Claim, InterningMap};
use crate::stats::{CacheStats, CacheStatsSnapshot};

/// Cache of canonical descriptors keyed by primary type and ordered tags.
///
/// Entries live as long as the cache; handles returned from it keep their
/// descriptor alive even past that.
pub struct TypeInfoCache<D: Descriptor = PrimTypeInfo> {
	map: InterningMap<D>,
	empty: Arc<D>,
	stats: CacheStats,
}

impl<D: Descriptor> TypeInfoCache<D> {
	/// Creates a cache with the default configuration.
	pub fn new() -> Self {
		Self::from_valid_config(&CacheConfig::default())
	}

	pub fn with_config(config: &CacheConfig) -> Result<Self, ConfigError> {
		config.validate()?;
		Ok(Self::from_valid_config(config))
	}

	fn from_valid_config(config: &CacheConfig) -> Self {
		tracing::debug!(
			domain = "typecache",
			shards = config.shards,
			"creating type info cache"
		);
		Self {
			map: InterningMap::with_shards(config.shards),
			empty: D::empty(),
			stats: CacheStats::default(),
		}
	}

	/// Returns the canonical descriptor for `primary` and `tags`, creating it
	/// if this is the first request for that identity.
	///
	/// Tags are order-sensitive: `["A", "B"]` and `["B", "A"]` produce two
	/// separately cached descriptors.
	pub fn find_or_create(&self, primary: Symbol, tags: Vec<Symbol>) -> Arc<D> {
		let key = build_key(primary, &tags);
		if key.is_empty() {
			self.stats.record_empty_hit();
			return Arc::clone(&self.empty);
		}

		if let Some(found) = self.map.find(key) {
			self.stats.record_hit();
			return found;
		}

		self.stats.record_miss();
		let candidate = D::from_parts_keyed(key, primary, tags);
		match self.map.try_insert(key, candidate) {
			Claim::Inserted(value) => {
				self.stats.record_inserted();
				tracing::debug!(
					domain = "typecache",
					key = %key,
					shard = self.map.shard_index(key),
					"cached new descriptor"
				);
				value
			}
			Claim::Existing(value) => {
				self.stats.record_discarded();
				tracing::trace!(
					domain = "typecache",
					key = %key,
					"discarded descriptor that lost a creation race"
				);
				value
			}
		}
	}

	/// Returns the cached descriptor without creating one.
	pub fn find(&self, primary: Symbol, tags: &[Symbol]) -> Option<Arc<D>> {
		let key = build_key(primary, tags);
		if key.is_empty() {
			return Some(Arc::clone(&self.empty));
		}
		self.map.find(key)
	}

	/// Returns the shared descriptor for the empty identity.
	#[inline]
	pub fn empty(&self) -> Arc<D> {
		Arc::clone(&self.empty)
	}

	/// Number of cached descriptors, not counting the empty sentinel.
	pub fn len(&self) -> usize {
		self.map.len()
	}

	pub fn is_empty(&self) -> bool {
		self.map.is_empty()
	}

	pub fn shard_count(&self) -> usize {
		self.map.shard_count()
	}

	pub fn stats(&self) -> CacheStatsSnapshot {
		self.stats.snapshot()
	}

	/// Point-in-time copy of every cached descriptor, sorted by key text.
	pub fn entries(&self) -> Vec<(Symbol, Arc<D>)> {
		self.map.entries()
	}
}

impl<D: Descriptor> Default for TypeInfoCache<D> {
	fn default() -> Self {
		Self::new()
	}
}

impl<D: Descriptor> std::fmt::Debug for TypeInfoCache<D> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("TypeInfoCache")
			.field("map", &self.map)
			.field("stats", &self.stats.snapshot())
			.finish()
	}
}
