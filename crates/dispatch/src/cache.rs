//! Memoized lookup results.
//!
//! # Purpose
//!
//! Walking the combination order is the expensive part of a lookup. The cache
//! remembers, per [`LookupKey`], either the resolved result or the fact that
//! nothing matched, so repeated lookups cost one hash probe.
//!
//! # Invariants
//!
//! - A miss ("never attempted") and a negative hit ([`Cached::NotFound`]) are
//!   distinct; a stored `None` component is a positive hit.
//!   - Tested by: `registry::tests::stored_none_is_not_a_miss`
//! - The cache is cleared before any store mutation becomes visible to readers.
//!   - Enforced in: `Registry::mutate`
//!   - Tested by: `invariants::test_mutation_clears_cache`
//!   - Failure symptom: a lookup keeps returning a component that was unregistered.

use std::num::NonZeroUsize;

use lru::LruCache;

use crate::query::{LookupKey, Resolved};

/// A memoized lookup outcome.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Cached<T> {
	Found(Resolved<T>),
	NotFound,
}

impl<T> Cached<T> {
	pub(crate) fn into_option(self) -> Option<Resolved<T>> {
		match self {
			Self::Found(found) => Some(found),
			Self::NotFound => None,
		}
	}
}

impl<T> From<Option<Resolved<T>>> for Cached<T> {
	fn from(found: Option<Resolved<T>>) -> Self {
		found.map_or(Self::NotFound, Self::Found)
	}
}

/// Bounded LRU of lookup outcomes, owned by exactly one registry.
pub(crate) struct LookupCache<T> {
	entries: LruCache<LookupKey, Cached<T>>,
}

impl<T> LookupCache<T> {
	pub(crate) fn new(capacity: NonZeroUsize) -> Self {
		Self {
			entries: LruCache::new(capacity),
		}
	}

	/// `None` means the lookup was never attempted since the last clear.
	pub(crate) fn get(&mut self, key: &LookupKey) -> Option<Cached<T>>
	where
		T: Clone,
	{
		self.entries.get(key).cloned()
	}

	pub(crate) fn put(&mut self, key: LookupKey, outcome: Cached<T>) {
		self.entries.put(key, outcome);
	}

	pub(crate) fn clear(&mut self) {
		self.entries.clear();
	}

	pub(crate) fn len(&self) -> usize {
		self.entries.len()
	}

	pub(crate) fn capacity(&self) -> NonZeroUsize {
		self.entries.cap()
	}
}
