//! Invariant proofs for the interning map and the cache facade.
//!
//! Each `inv_*` function states one invariant and checks it; the matching
//! `test_*` wrapper runs it under the test harness.

use std::sync::atomic::Ordering;
use std::sync::{Arc, Barrier};

use typecache_symbol::Symbol;

use crate::map::{Claim, InterningMap};
use crate::test_fixtures::counting_descriptor;
use crate::{CacheConfig, Descriptor, TypeInfoCache};

const RACERS: usize = 16;

/// Invariant: racing creators converge on a single published value per key.
///
/// Every caller gets the same allocation, the map holds one entry, and every
/// constructed candidate except the winner has been dropped.
pub(crate) fn inv_single_winner_per_key() {
	counting_descriptor!(Racer);

	let cache: TypeInfoCache<Racer> =
		TypeInfoCache::with_config(&CacheConfig::with_shards(1)).unwrap();
	let primary = Symbol::new("InvRaceMesh");
	let tags = vec![Symbol::new("ClothAPI")];
	let barrier = Barrier::new(RACERS);

	let results: Vec<Arc<Racer>> = std::thread::scope(|s| {
		let handles: Vec<_> = (0..RACERS)
			.map(|_| {
				s.spawn(|| {
					barrier.wait();
					cache.find_or_create(primary, tags.clone())
				})
			})
			.collect();
		handles.into_iter().map(|h| h.join().unwrap()).collect()
	});

	let winner = &results[0];
	for result in &results {
		assert!(Arc::ptr_eq(result, winner), "every racer must see the winner");
	}
	assert_eq!(cache.len(), 1);

	let constructed = CONSTRUCTED.load(Ordering::SeqCst);
	let dropped = DROPPED.load(Ordering::SeqCst);
	assert!(constructed >= 1);
	assert_eq!(dropped, constructed - 1, "losing candidates must be dropped");

	let stats = cache.stats();
	assert_eq!(stats.inserted, 1);
	assert_eq!(stats.discarded as usize, constructed - 1);
	assert_eq!(stats.hits + stats.misses, RACERS as u64);
}

#[cfg_attr(test, test)]
pub(crate) fn test_single_winner_per_key() {
	inv_single_winner_per_key()
}

/// Invariant: a candidate that loses is dropped before `try_insert` returns
/// and is never handed to anyone.
pub(crate) fn inv_losing_candidate_dropped_unobserved() {
	counting_descriptor!(Candidate);

	let map: InterningMap<Candidate> = InterningMap::with_shards(1);
	let key = Symbol::new("InvLosingCandidate");

	let first = map.try_insert(key, Candidate::from_parts(key, Vec::new()));
	assert!(first.is_inserted());
	let published = first.into_inner();

	let loser = Candidate::from_parts(key, vec![Symbol::new("Other")]);
	assert_eq!(DROPPED.load(Ordering::SeqCst), 0);

	match map.try_insert(key, loser) {
		Claim::Existing(value) => {
			assert!(Arc::ptr_eq(&value, &published));
			assert!(value.tags.is_empty(), "the loser's fields must not leak");
		}
		Claim::Inserted(_) => panic!("occupied key must not accept a second value"),
	}
	assert_eq!(
		DROPPED.load(Ordering::SeqCst),
		1,
		"loser must be dropped synchronously"
	);
	assert_eq!(map.len(), 1);
}

#[cfg_attr(test, test)]
pub(crate) fn test_losing_candidate_dropped_unobserved() {
	inv_losing_candidate_dropped_unobserved()
}

/// Invariant: once published, a value stays reachable and unchanged while the
/// shard it lives in keeps growing.
pub(crate) fn inv_published_value_is_stable() {
	let map: InterningMap<String> = InterningMap::with_shards(1);
	let key = Symbol::new("InvStableKey");
	let published = map.insert_if_absent(key, "stable".to_owned());

	for i in 0..128 {
		map.insert_if_absent(Symbol::new(&format!("InvStableNeighbour{i}")), i.to_string());
		let found = map.find(key).expect("published key must stay reachable");
		assert!(Arc::ptr_eq(&found, &published));
	}
	assert_eq!(*published, "stable");
	assert_eq!(map.len(), 129);
}

#[cfg_attr(test, test)]
pub(crate) fn test_published_value_is_stable() {
	inv_published_value_is_stable()
}

/// Invariant: repeated requests for one identity return one allocation.
pub(crate) fn inv_find_or_create_is_idempotent() {
	counting_descriptor!(Stable);

	let cache: TypeInfoCache<Stable> = TypeInfoCache::new();
	let primary = Symbol::new("InvIdempotentMesh");
	let first = cache.find_or_create(primary, Vec::new());
	let second = cache.find_or_create(primary, Vec::new());

	assert!(Arc::ptr_eq(&first, &second));
	assert_eq!(CONSTRUCTED.load(Ordering::SeqCst), 1);
	assert_eq!(first.primary, primary);
}

#[cfg_attr(test, test)]
pub(crate) fn test_find_or_create_is_idempotent() {
	inv_find_or_create_is_idempotent()
}

/// Invariant: the empty identity resolves to the sentinel without touching
/// the map or constructing anything.
pub(crate) fn inv_empty_identity_bypasses_map() {
	counting_descriptor!(Sentinel);

	let cache: TypeInfoCache<Sentinel> = TypeInfoCache::new();
	let via_lookup = cache.find_or_create(Symbol::empty(), Vec::new());

	assert!(Arc::ptr_eq(&via_lookup, &cache.empty()));
	assert!(Arc::ptr_eq(&via_lookup, &Sentinel::empty()));
	assert_eq!(CONSTRUCTED.load(Ordering::SeqCst), 0);
	assert!(cache.is_empty());
	assert_eq!(cache.stats().empty_hits, 1);
}

#[cfg_attr(test, test)]
pub(crate) fn test_empty_identity_bypasses_map() {
	inv_empty_identity_bypasses_map()
}

/// Invariant: descriptors stay alive while any handle to them exists, and are
/// released once the cache and every handle are gone.
pub(crate) fn inv_handles_keep_descriptors_alive() {
	counting_descriptor!(Held);

	let cache: TypeInfoCache<Held> = TypeInfoCache::new();
	let held = cache.find_or_create(Symbol::new("InvHeldMesh"), Vec::new());
	cache.find_or_create(Symbol::new("InvUnheldMesh"), Vec::new());

	drop(cache);
	assert_eq!(DROPPED.load(Ordering::SeqCst), 1, "only the unheld entry is released");
	assert_eq!(held.primary.as_str(), "InvHeldMesh");

	drop(held);
	assert_eq!(DROPPED.load(Ordering::SeqCst), 2);
}

#[cfg_attr(test, test)]
pub(crate) fn test_handles_keep_descriptors_alive() {
	inv_handles_keep_descriptors_alive()
}
