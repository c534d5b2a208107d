//! Descriptor values stored by the cache.

use std::fmt;
use std::sync::{Arc, LazyLock};

use typecache_symbol::Symbol;

use crate::key::build_key;

/// Immutable value identified by a primary type plus ordered tags.
///
/// Implementations must be cheap to discard: under contention the cache may
/// construct several candidates for one key and keep only the first to be
/// published.
pub trait Descriptor: Send + Sync + 'static {
	/// Builds a descriptor for `primary` with the given ordered tags.
	fn from_parts(primary: Symbol, tags: Vec<Symbol>) -> Self;

	/// Like [`Self::from_parts`], with the composite key already built.
	///
	/// `key` is `build_key(primary, &tags)`. The cache calls this on a miss so
	/// the key is built and interned once per request.
	fn from_parts_keyed(key: Symbol, primary: Symbol, tags: Vec<Symbol>) -> Self
	where
		Self: Sized,
	{
		let _ = key;
		Self::from_parts(primary, tags)
	}

	/// Returns the process-wide empty descriptor (no type, no tags).
	///
	/// Every call must return the same allocation.
	fn empty() -> Arc<Self>;
}

static EMPTY_PRIM_TYPE: LazyLock<Arc<PrimTypeInfo>> =
	LazyLock::new(|| Arc::new(PrimTypeInfo::from_parts(Symbol::empty(), Vec::new())));

/// Full type information for a prim: its concrete type and applied API schemas.
#[derive(Debug, PartialEq, Eq)]
pub struct PrimTypeInfo {
	type_name: Symbol,
	applied_schemas: Box<[Symbol]>,
	/// The composite key this info is cached under.
	type_id: Symbol,
}

impl PrimTypeInfo {
	pub fn type_name(&self) -> Symbol {
		self.type_name
	}

	/// Applied schemas in the order they were applied.
	pub fn applied_schemas(&self) -> &[Symbol] {
		&self.applied_schemas
	}

	/// Composite identity: the type name followed by `,<schema>` per applied schema.
	pub fn type_id(&self) -> Symbol {
		self.type_id
	}

	/// Returns true for the typeless info with no applied schemas.
	pub fn is_empty(&self) -> bool {
		self.type_id.is_empty()
	}

	pub fn has_applied_schema(&self, schema: Symbol) -> bool {
		self.applied_schemas.contains(&schema)
	}
}

impl Descriptor for PrimTypeInfo {
	fn from_parts(primary: Symbol, tags: Vec<Symbol>) -> Self {
		Self::from_parts_keyed(build_key(primary, &tags), primary, tags)
	}

	fn from_parts_keyed(type_id: Symbol, primary: Symbol, tags: Vec<Symbol>) -> Self {
		Self {
			type_name: primary,
			applied_schemas: tags.into_boxed_slice(),
			type_id,
		}
	}

	fn empty() -> Arc<Self> {
		Arc::clone(&EMPTY_PRIM_TYPE)
	}
}

impl fmt::Display for PrimTypeInfo {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Display::fmt(&self.type_id, f)
	}
}
