/// Rejected cache configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
	#[error("shard count {shards} is not a power of two")]
	ShardsNotPowerOfTwo { shards: usize },
	#[error("shard count {shards} outside 1..={max}")]
	ShardsOutOfRange { shards: usize, max: usize },
}
