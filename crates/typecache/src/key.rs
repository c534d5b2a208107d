//! Composite cache keys.

use typecache_symbol::Symbol;

/// Separator placed before every tag in a composite key.
pub const TAG_SEPARATOR: char = ',';

/// Builds the canonical key for a primary type and its ordered tags.
///
/// With no tags the primary type itself is the key and nothing is allocated.
/// Otherwise the key text is the primary type followed by `,<tag>` for each
/// tag in the given order. An empty primary type is valid, so
/// `("", ["ClothAPI"])` keys as `",ClothAPI"`.
///
/// Tag order is part of the identity: callers that want order-insensitive
/// caching must sort before calling.
pub fn build_key(primary: Symbol, tags: &[Symbol]) -> Symbol {
	if tags.is_empty() {
		return primary;
	}

	let capacity = tags.iter().map(|tag| tag.len()).sum::<usize>() + primary.len() + tags.len();
	let mut text = String::with_capacity(capacity);
	text.push_str(primary.as_str());
	for tag in tags {
		text.push(TAG_SEPARATOR);
		text.push_str(tag.as_str());
	}
	debug_assert_eq!(text.len(), capacity);
	Symbol::new(&text)
}
