//! Concurrent interning cache for composite type descriptors.
//!
//! # Purpose
//!
//! [`TypeInfoCache`] hands out exactly one immutable descriptor per distinct
//! identity, where an identity is a primary type name plus an ordered list of
//! applied tags. Any number of threads may look up and create descriptors at
//! once; lookups share a read lock and creators only contend within one shard.
//!
//! # Mental Model
//!
//! 1. **Key:** [`build_key`] folds `(primary, tags)` into a single [`Symbol`]
//!    (`"Mesh"`, `"Mesh,CollectionAPI,ClothAPI"`, `",ClothAPI"`).
//! 2. **Fast path:** the empty key resolves to the shared [`Descriptor::empty`]
//!    sentinel without touching the map.
//! 3. **Lookup:** [`InterningMap::find`] reads the key's shard under its shared lock.
//! 4. **Create:** on a miss a candidate is constructed outside the map from
//!    the key already built ([`Descriptor::from_parts_keyed`]), then
//!    [`InterningMap::try_insert`] publishes it or drops it in favour of the
//!    value that won.
//!
//! # Key Types
//!
//! | Type | Role |
//! |------|------|
//! | [`TypeInfoCache`] | Get-or-create facade and owner of the map. |
//! | [`InterningMap`] | Sharded, grow-only `Symbol -> Arc<V>` map. |
//! | [`Descriptor`] | Construction contract for cached values. |
//! | [`PrimTypeInfo`] | Type name plus applied API schemas. |
//! | [`CacheConfig`] | Shard count. |
//!
//! # Concurrency
//!
//! - **Reads:** Shared [`parking_lot::RwLock`] on one shard; readers never block each other.
//! - **Writes:** Linearizable per key. The exclusive lock covers a single
//!   entry operation, so an insert costs O(1) regardless of shard size.
//!
//! # Invariants
//!
//! - Must publish at most one descriptor per key.
//!   - Enforced in: [`InterningMap::try_insert`] (re-check under the write lock).
//!   - Tested by: `invariants::test_single_winner_per_key`
//!   - Failure symptom: `Arc::ptr_eq` fails for equal identities.
//!
//! - Must drop losing candidates without exposing them.
//!   - Enforced in: [`InterningMap::try_insert`].
//!   - Tested by: `invariants::test_losing_candidate_dropped_unobserved`
//!   - Failure symptom: callers observe a descriptor that is not in the map.
//!
//! - Must resolve the empty identity to the sentinel.
//!   - Enforced in: [`TypeInfoCache::find_or_create`].
//!   - Tested by: `invariants::test_empty_identity_bypasses_map`
//!   - Failure symptom: typeless prims allocate and diverge from [`Descriptor::empty`].
//!
//! - Must keep descriptors alive while handles exist.
//!   - Enforced in: `Arc` ownership of map entries and returned handles.
//!   - Tested by: `invariants::test_handles_keep_descriptors_alive`
//!   - Failure symptom: use-after-free or early drop of held descriptors.

mod cache;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod key;
pub mod map;
mod stats;

pub use cache::TypeInfoCache;
pub use config::{CacheConfig, MAX_SHARDS};
pub use descriptor::{Descriptor, PrimTypeInfo};
pub use error::ConfigError;
pub use key::build_key;
pub use map::{Claim, InterningMap};
pub use stats::CacheStatsSnapshot;
pub use typecache_symbol::Symbol;

#[cfg(test)]
mod invariants;
