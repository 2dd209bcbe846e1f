//! Elements visited during one merge.

use core::hash::Hash;
use hashbrown::HashSet;

/// Identities of the elements touched by a single top-level merge.
///
/// Stores [`Document::Identity`](`crate::Document::Identity`) values rather than element handles,
/// since browser DOM handles can't be hashed.
#[derive(Debug, Clone)]
pub struct TouchedSet<K>(HashSet<K>);

impl<K> Default for TouchedSet<K> {
	fn default() -> Self {
		Self(HashSet::new())
	}
}

impl<K: Eq + Hash> TouchedSet<K> {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns `false` if `identity` was touched already.
	pub fn insert(&mut self, identity: K) -> bool {
		self.0.insert(identity)
	}

	#[must_use]
	pub fn contains(&self, identity: &K) -> bool {
		self.0.contains(identity)
	}

	/// Adds everything `other` touched.
	pub fn union(&mut self, other: Self) {
		if self.0.len() < other.0.len() {
			let smaller = core::mem::replace(&mut self.0, other.0);
			self.0.extend(smaller);
		} else {
			self.0.extend(other.0);
		}
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}
}
