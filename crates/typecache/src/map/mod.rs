//! Sharded symbol-keyed map with atomic get-or-insert.
//!
//! # Role
//!
//! Each shard is an [`FxHashMap`] behind its own [`RwLock`]. Readers take the
//! shared lock of one shard only, so lookups never wait on each other and
//! never wait on writers to other shards. Writers allocate the published
//! handle before locking, then hold the exclusive lock for one hash-map entry
//! operation. A value is inserted fully built, so no reader sees it half done.
//!
//! # Invariants
//!
//! - At most one value per key is ever published (see `invariants::test_single_winner_per_key`).
//! - A losing candidate is dropped by the inserting thread and never returned
//!   (see `invariants::test_losing_candidate_dropped_unobserved`).
//! - Published values are never removed or replaced (see `invariants::test_published_value_is_stable`).

use std::collections::hash_map::Entry;
use std::hash::BuildHasher;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::{FxBuildHasher, FxHashMap};
use typecache_symbol::Symbol;


/// Outcome of [`InterningMap::try_insert`].
#[derive(Debug)]
pub enum Claim<V> {
	/// The key was free; the candidate is now the published value.
	Inserted(Arc<V>),
	/// The key was already taken; the candidate was dropped.
	Existing(Arc<V>),
}

impl<V> Claim<V> {
	/// Returns the published value regardless of who won.
	pub fn into_inner(self) -> Arc<V> {
		match self {
			Claim::Inserted(value) | Claim::Existing(value) => value,
		}
	}

	pub fn is_inserted(&self) -> bool {
		matches!(self, Claim::Inserted(_))
	}
}

type Slots<V> = FxHashMap<Symbol, Arc<V>>;

/// Grow-only map from [`Symbol`] to shared values.
pub struct InterningMap<V> {
	shards: Box<[RwLock<Slots<V>>]>,
	mask: usize,
}

impl<V> InterningMap<V> {
	/// Creates an empty map with `shards` shards.
	///
	/// `shards` is rounded up to the next power of two.
	pub fn with_shards(shards: usize) -> Self {
		let count = shards.max(1).next_power_of_two();
		let shards = (0..count)
			.map(|_| RwLock::new(Slots::default()))
			.collect();
		Self {
			shards,
			mask: count - 1,
		}
	}

	pub fn shard_count(&self) -> usize {
		self.shards.len()
	}

	pub(crate) fn shard_index(&self, key: Symbol) -> usize {
		let hash = FxBuildHasher.hash_one(key);
		((hash >> 32) ^ hash) as usize & self.mask
	}

	fn shard(&self, key: Symbol) -> &RwLock<Slots<V>> {
		&self.shards[self.shard_index(key)]
	}

	/// Returns the published value for `key`, if any.
	///
	/// An insert for the same key that has not yet committed is not visible.
	#[inline]
	pub fn find(&self, key: Symbol) -> Option<Arc<V>> {
		self.shard(key).read().get(&key).cloned()
	}

	pub fn contains(&self, key: Symbol) -> bool {
		self.shard(key).read().contains_key(&key)
	}

	/// Publishes `candidate` under `key` unless a value is already there.
	///
	/// Returns the value that ends up published for `key`. When the key was
	/// already taken, `candidate` is dropped before this returns.
	pub fn insert_if_absent(&self, key: Symbol, candidate: V) -> Arc<V> {
		self.try_insert(key, candidate).into_inner()
	}

	/// Like [`Self::insert_if_absent`], but reports whether `candidate` won.
	pub fn try_insert(&self, key: Symbol, candidate: V) -> Claim<V> {
		let shard = self.shard(key);
		let existing = shard.read().get(&key).cloned();
		if let Some(existing) = existing {
			drop(candidate);
			return Claim::Existing(existing);
		}

		let candidate = Arc::new(candidate);
		let mut slots = shard.write();
		// Another insert may have claimed the key between the two locks.
		let existing = match slots.entry(key) {
			Entry::Occupied(entry) => Arc::clone(entry.get()),
			Entry::Vacant(entry) => {
				entry.insert(Arc::clone(&candidate));
				return Claim::Inserted(candidate);
			}
		};
		drop(slots);
		debug_assert_eq!(Arc::strong_count(&candidate), 1);
		drop(candidate);
		Claim::Existing(existing)
	}

	/// Number of published entries across all shards.
	pub fn len(&self) -> usize {
		self.shards.iter().map(|shard| shard.read().len()).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.shards.iter().all(|shard| shard.read().is_empty())
	}

	/// Point-in-time copy of all entries, sorted by key text.
	///
	/// Shards are read one after another, so entries inserted concurrently
	/// may or may not appear.
	pub fn entries(&self) -> Vec<(Symbol, Arc<V>)> {
		let mut out: Vec<_> = self
			.shards
			.iter()
			.flat_map(|shard| {
				shard
					.read()
					.iter()
					.map(|(key, value)| (*key, Arc::clone(value)))
					.collect::<Vec<_>>()
			})
			.collect();
		out.sort_unstable_by(|(a, _), (b, _)| a.cmp(b));
		out
	}
}

impl<V> std::fmt::Debug for InterningMap<V> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("InterningMap")
			.field("shards", &self.shards.len())
			.field("len", &self.len())
			.finish()
	}
}
