//! Requirement-keyed component storage.
//!
//! # Mental model
//!
//! The store is a two-level map. The outer key is the exact requirement tuple
//! a component was registered for (one capability per position). Each
//! [`Bucket`] maps `(provides, name)` to the component and, per provides,
//! keeps the `ALL` list: every component registered under that provides in
//! registration order, whatever its name.
//!
//! The store never enumerates combinations or clears caches; the registry
//! drives both.
//!
//! # Invariants
//!
//! - A bucket only holds an `ALL` list for a provides while at least one
//!   specifically named entry for that provides remains.
//!   - Enforced in: [`Store::remove`]
//!   - Tested by: `invariants::test_all_list_needs_a_named_entry`
//! - A bucket with no named entries is removed.
//!   - Enforced in: [`Store::remove`]
//!   - Tested by: `invariants::test_last_entry_drops_bucket`
//!   - Failure symptom: `Name::All` lookups match a tuple nothing is registered for.

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::{FxBuildHasher, FxHashMap as HashMap};
use switchyard_capability::{Capability, Name, Provides};

use crate::query::Resolved;

#[derive(Debug, Clone)]
struct AllEntry<T> {
	name: Arc<str>,
	component: T,
}

/// Everything registered for one exact requirement tuple.
#[derive(Debug, Clone)]
pub(crate) struct Bucket<T> {
	named: IndexMap<(Provides, Arc<str>), T, FxBuildHasher>,
	all: HashMap<Provides, Vec<AllEntry<T>>>,
}

impl<T> Default for Bucket<T> {
	fn default() -> Self {
		Self {
			named: IndexMap::default(),
			all: HashMap::default(),
		}
	}
}

impl<T> Bucket<T> {
	#[cfg(test)]
	pub(crate) fn named_len(&self) -> usize {
		self.named.len()
	}

	pub(crate) fn get(&self, provides: &Provides, name: &str) -> Option<&T> {
		self.named.get(&(provides.clone(), Arc::from(name)))
	}

	/// The `ALL` list for `provides`, in registration order.
	pub(crate) fn all<'a>(
		&'a self,
		provides: &Provides,
	) -> Option<impl Iterator<Item = &'a T> + use<'a, T>> {
		self.all
			.get(provides)
			.map(|entries| entries.iter().map(|entry| &entry.component))
	}
}

#[derive(Debug, Clone)]
pub(crate) struct Store<T> {
	buckets: HashMap<Box<[Capability]>, Bucket<T>>,
}

impl<T> Default for Store<T> {
	fn default() -> Self {
		Self {
			buckets: HashMap::default(),
		}
	}
}

impl<T: Clone> Store<T> {
	/// Reads the component for one concrete combination.
	pub(crate) fn get(
		&self,
		requires: &[Capability],
		provides: &Provides,
		name: &Name,
	) -> Option<Resolved<T>> {
		let bucket = self.buckets.get(requires)?;
		match name {
			Name::All => bucket
				.all(provides)
				.map(|components| Resolved::All(components.cloned().collect())),
			Name::Specific(name) => bucket
				.named
				.get(&(provides.clone(), Arc::clone(name)))
				.cloned()
				.map(Resolved::One),
		}
	}

	/// Stores `component` and appends it to the `ALL` list.
	pub(crate) fn register(
		&mut self,
		provides: Provides,
		component: T,
		requires: Box<[Capability]>,
		name: Arc<str>,
	) {
		let bucket = self.buckets.entry(requires).or_default();
		bucket
			.named
			.insert((provides.clone(), Arc::clone(&name)), component.clone());
		bucket
			.all
			.entry(provides)
			.or_default()
			.push(AllEntry { name, component });
	}

	/// Stores `component`, replacing the `ALL` entry contributed by the same
	/// name instead of appending a second one.
	pub(crate) fn replace(
		&mut self,
		provides: Provides,
		component: T,
		requires: Box<[Capability]>,
		name: Arc<str>,
	) {
		let bucket = self.buckets.entry(requires).or_default();
		bucket
			.named
			.insert((provides.clone(), Arc::clone(&name)), component.clone());
		let all = bucket.all.entry(provides).or_default();
		match all.iter_mut().find(|entry| entry.name == name) {
			Some(entry) => entry.component = component,
			None => all.push(AllEntry { name, component }),
		}
	}
}

impl<T> Store<T> {
	#[cfg(test)]
	pub(crate) fn bucket(&self, requires: &[Capability]) -> Option<&Bucket<T>> {
		self.buckets.get(requires)
	}

	pub(crate) fn bucket_count(&self) -> usize {
		self.buckets.len()
	}

	/// Reads the exact `(requires, provides, name)` entry; no fallback.
	pub(crate) fn get_exact(
		&self,
		requires: &[Capability],
		provides: &Provides,
		name: &str,
	) -> Option<&T> {
		self.buckets.get(requires)?.get(provides, name)
	}

	/// Removes the named entry and the `ALL` occurrence it contributed.
	///
	/// Nothing changes unless the stored entry is accepted by `matches`.
	/// Returns the removed named entry, or `None` if there was nothing
	/// matching under that key.
	pub(crate) fn remove(
		&mut self,
		requires: &[Capability],
		provides: &Provides,
		name: &Arc<str>,
		matches: impl Fn(&T) -> bool,
	) -> Option<T> {
		let bucket = self.buckets.get_mut(requires)?;
		let key = (provides.clone(), Arc::clone(name));
		if !bucket.named.get(&key).is_some_and(|stored| matches(stored)) {
			return None;
		}
		let removed = bucket.named.shift_remove(&key)?;

		if let Some(all) = bucket.all.get_mut(provides) {
			let position = all
				.iter()
				.position(|entry| entry.name == *name && matches(&entry.component));
			if let Some(position) = position {
				all.remove(position);
			}
			let named_left = bucket.named.keys().any(|(p, _)| p == provides);
			if all.is_empty() || !named_left {
				bucket.all.remove(provides);
			}
		}

		if bucket.named.is_empty() {
			self.buckets.remove(requires);
		}
		Some(removed)
	}

	/// Drops every registration for `requires`.
	pub(crate) fn remove_bucket(&mut self, requires: &[Capability]) -> Option<Bucket<T>> {
		self.buckets.remove(requires)
	}

	/// Zero-arity, unnamed entries under caller provides keys, in insertion order.
	pub(crate) fn direct(&self) -> impl Iterator<Item = (&Capability, &T)> {
		let zero_arity: &[Capability] = &[];
		self.buckets
			.get(zero_arity)
			.into_iter()
			.flat_map(|bucket| bucket.named.iter())
			.filter_map(|((provides, name), component)| match provides {
				Provides::Component(cap) if name.is_empty() => Some((cap, component)),
				_ => None,
			})
	}
}
