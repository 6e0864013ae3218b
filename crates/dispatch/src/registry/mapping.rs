//! Map-like view over zero-arity, unnamed registrations.
//!
//! `registry.insert(k, v)` is `register(k, v, [], "")`; every other method
//! here is defined the same way. Registrations with requirements or a name are
//! invisible to this view.

use std::sync::Arc;

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use switchyard_capability::{Capability, Name, Provides, Requirement};

use super::Registry;
use crate::component::Slot;
use crate::query::Resolved;
use crate::store::Store;

const DIRECT: &[Capability] = &[];

fn direct_key(key: impl Into<Capability>) -> Provides {
	Provides::Component(key.into())
}

fn unnamed() -> Arc<str> {
	Arc::from("")
}

impl<V: Clone> Registry<V> {
	/// Cached lookup of the direct entry for `key`.
	pub fn get(&self, key: impl Into<Capability>) -> Option<V> {
		self.lookup(key, std::iter::empty::<Requirement>(), Name::default())
			.ok()
			.and_then(Resolved::one)
	}

	/// Sets the direct entry for `key`, returning the previous value.
	pub fn insert(&self, key: impl Into<Capability>, value: V) -> Option<V> {
		let provides = direct_key(key);
		self.mutate("insert", |store| {
			let previous = direct_value(store, &provides);
			store.register(provides, Slot::Component(value), Box::default(), unnamed());
			previous
		})
	}

	/// Removes the direct entry for `key`, returning its value.
	pub fn remove(&self, key: impl Into<Capability>) -> Option<V> {
		let provides = direct_key(key);
		self.mutate("remove", |store| {
			store
				.remove(DIRECT, &provides, &unnamed(), |_| true)
				.and_then(Slot::into_component)
		})
	}

	pub fn contains_key(&self, key: impl Into<Capability>) -> bool {
		let provides = direct_key(key);
		direct_value(&self.store.read(), &provides).is_some()
	}

	pub fn len(&self) -> usize {
		self.store.read().direct().count()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Direct keys in insertion order.
	pub fn keys(&self) -> Vec<Capability> {
		self.store
			.read()
			.direct()
			.map(|(key, _)| key.clone())
			.collect()
	}

	pub fn values(&self) -> Vec<V> {
		self.store
			.read()
			.direct()
			.filter_map(|(_, slot)| slot.as_component().cloned())
			.collect()
	}

	pub fn items(&self) -> Vec<(Capability, V)> {
		self.direct_entries().into_iter().collect()
	}

	/// Snapshot of the mapping view, for comparing a registry against a map.
	pub fn direct_entries(&self) -> IndexMap<Capability, V, FxBuildHasher> {
		self.store
			.read()
			.direct()
			.filter_map(|(key, slot)| Some((key.clone(), slot.as_component()?.clone())))
			.collect()
	}

	/// Removes every direct entry; other registrations are kept.
	pub fn clear_direct(&self) {
		self.mutate("clear_direct", |store| {
			let keys: Vec<Capability> = store.direct().map(|(key, _)| key.clone()).collect();
			for key in keys {
				store.remove(DIRECT, &direct_key(key), &unnamed(), |_| true);
			}
		});
	}

	/// Inserts every pair under one write lock.
	pub fn update<I, K>(&self, entries: I)
	where
		I: IntoIterator<Item = (K, V)>,
		K: Into<Capability>,
	{
		self.mutate("update", |store| {
			for (key, value) in entries {
				let provides = direct_key(key);
				store.register(provides, Slot::Component(value), Box::default(), unnamed());
			}
		});
	}

	/// Returns the direct entry for `key`, inserting `make()` first if absent.
	///
	/// `make` runs under the store write lock and must not touch the registry.
	pub fn get_or_insert_with(
		&self,
		key: impl Into<Capability>,
		make: impl FnOnce() -> V,
	) -> V {
		let provides = direct_key(key);
		self.mutate("get_or_insert_with", |store| {
			if let Some(existing) = direct_value(store, &provides) {
				return existing;
			}
			let value = make();
			let slot = Slot::Component(value.clone());
			store.register(provides, slot, Box::default(), unnamed());
			value
		})
	}

	/// Removes and returns the oldest direct entry.
	pub fn pop_item(&self) -> Option<(Capability, V)> {
		self.mutate("pop_item", |store| {
			let key = store.direct().next().map(|(key, _)| key.clone())?;
			let value = store
				.remove(DIRECT, &direct_key(key.clone()), &unnamed(), |_| true)?
				.into_component()?;
			Some((key, value))
		})
	}
}

fn direct_value<V: Clone>(store: &Store<Slot<V>>, provides: &Provides) -> Option<V> {
	store
		.get_exact(DIRECT, provides, "")
		.and_then(Slot::as_component)
		.cloned()
}

impl<V: Clone, K: Into<Capability>> FromIterator<(K, V)> for Registry<V> {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(entries: I) -> Self {
		let registry = Self::new();
		registry.update(entries);
		registry
	}
}

impl<V: Clone, K: Into<Capability>> Extend<(K, V)> for Registry<V> {
	fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, entries: I) {
		self.update(entries);
	}
}
