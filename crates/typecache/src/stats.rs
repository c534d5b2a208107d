use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free cache counters.
///
/// Counters are updated with relaxed ordering; a snapshot taken while other
/// threads are active is not a consistent cut across fields.
#[derive(Debug, Default)]
pub(crate) struct CacheStats {
	hits: AtomicU64,
	misses: AtomicU64,
	inserted: AtomicU64,
	discarded: AtomicU64,
	empty_hits: AtomicU64,
}

impl CacheStats {
	pub(crate) fn record_hit(&self) {
		self.hits.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_miss(&self) {
		self.misses.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_inserted(&self) {
		self.inserted.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_discarded(&self) {
		self.discarded.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_empty_hit(&self) {
		self.empty_hits.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn snapshot(&self) -> CacheStatsSnapshot {
		CacheStatsSnapshot {
			hits: self.hits.load(Ordering::Relaxed),
			misses: self.misses.load(Ordering::Relaxed),
			inserted: self.inserted.load(Ordering::Relaxed),
			discarded: self.discarded.load(Ordering::Relaxed),
			empty_hits: self.empty_hits.load(Ordering::Relaxed),
		}
	}
}

/// Point-in-time copy of the cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStatsSnapshot {
	/// Lookups answered from the map without constructing anything.
	pub hits: u64,
	/// Lookups that constructed a candidate.
	pub misses: u64,
	/// Candidates that won and were published.
	pub inserted: u64,
	/// Candidates that lost a race and were dropped.
	pub discarded: u64,
	/// Lookups answered by the empty sentinel.
	pub empty_hits: u64,
}
