//! Interned text handles with O(1) equality, hashing and length.
//!
//! A [`Symbol`] pairs a [`lasso::Spur`] from a process-wide
//! [`ThreadedRodeo`] with the resolved `&'static str`. Two symbols compare
//! equal exactly when they were interned from the same text, so equality and
//! hashing only look at the key, and reading the text never goes back to the
//! interner.
//!
//! # Invariants
//!
//! - Interning the same text twice yields the same key and storage.
//!   - Enforced in: [`ThreadedRodeo::get_or_intern`].
//!   - Tested by: `tests::test_concurrent_intern_converges`
//!   - Failure symptom: equal text comparing unequal, duplicate cache entries upstream.
//!
//! - The empty text always maps to [`Symbol::empty`].
//!   - Enforced in: [`Symbol::new`] (short-circuits before touching the interner).
//!   - Tested by: `tests::test_empty_is_canonical`
//!   - Failure symptom: empty-key fast paths miss and allocate.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::LazyLock;

use lasso::{Spur, ThreadedRodeo};
use serde::{Deserialize, Deserializer, Serialize, Serializer};


/// Process-wide interner. Strings live in its arena for the rest of the process.
static INTERNER: LazyLock<ThreadedRodeo> = LazyLock::new(ThreadedRodeo::new);

/// The empty text never reaches the interner and carries no key.
static EMPTY: Symbol = Symbol { key: None, text: "" };

/// Interned text handle.
#[derive(Clone, Copy)]
pub struct Symbol {
	key: Option<Spur>,
	text: &'static str,
}

impl Symbol {
	/// Interns `text`, returning its canonical handle.
	pub fn new(text: &str) -> Self {
		if text.is_empty() {
			return EMPTY;
		}
		let key = INTERNER.get_or_intern(text);
		Self::from_key(key)
	}

	fn from_key(key: Spur) -> Self {
		let interner: &'static ThreadedRodeo = &INTERNER;
		Self {
			key: Some(key),
			text: interner.resolve(&key),
		}
	}

	/// Returns the handle for the empty text.
	#[inline]
	pub fn empty() -> Self {
		EMPTY
	}

	/// Returns the handle for `text` only if it has already been interned.
	pub fn lookup(text: &str) -> Option<Self> {
		if text.is_empty() {
			return Some(EMPTY);
		}
		INTERNER.get(text).map(Self::from_key)
	}

	#[inline]
	pub fn as_str(self) -> &'static str {
		self.text
	}

	/// Length of the text in bytes.
	#[inline]
	pub fn len(self) -> usize {
		self.text.len()
	}

	#[inline]
	pub fn is_empty(self) -> bool {
		self.key.is_none()
	}

	/// Number of distinct non-empty texts interned so far in this process.
	pub fn interned_count() -> usize {
		INTERNER.len()
	}
}

impl PartialEq for Symbol {
	#[inline]
	fn eq(&self, other: &Self) -> bool {
		self.key == other.key
	}
}

impl Eq for Symbol {}

impl Hash for Symbol {
	#[inline]
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.key.hash(state);
	}
}

impl PartialOrd for Symbol {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

/// Orders by text so iteration over symbol-keyed data is deterministic.
impl Ord for Symbol {
	fn cmp(&self, other: &Self) -> Ordering {
		if self == other {
			return Ordering::Equal;
		}
		self.text.cmp(other.text)
	}
}

impl Default for Symbol {
	fn default() -> Self {
		EMPTY
	}
}

impl From<&str> for Symbol {
	fn from(text: &str) -> Self {
		Self::new(text)
	}
}

impl AsRef<str> for Symbol {
	fn as_ref(&self) -> &str {
		self.text
	}
}

impl fmt::Debug for Symbol {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Symbol({:?})", self.text)
	}
}

impl fmt::Display for Symbol {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.text)
	}
}

impl Serialize for Symbol {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		serializer.serialize_str(self.text)
	}
}

impl<'de> Deserialize<'de> for Symbol {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
		let text = String::deserialize(deserializer)?;
		Ok(Self::new(&text))
	}
}
