//! Read side: lookups, value-driven resolution and adaptation.

use switchyard_capability::{
	Capability, CombinationPlan, DispatchError, Name, Requirement, Subject,
};
use tracing::trace;

use super::Registry;
use crate::cache::Cached;
use crate::component::{Factory, Slot};
use crate::query::{LookupKey, Query, Resolved};

impl<V: Clone> Registry<V> {
	/// Runs a fully specified query.
	///
	/// # Errors
	///
	/// [`DispatchError::NotFound`] when no combination matches, or
	/// [`DispatchError::ArityMismatch`] when the query's defaults do not fit
	/// its requirements.
	pub fn find(&self, query: Query) -> Result<Resolved<V>, DispatchError> {
		let key = query.into_key();
		let provides = key.provides.clone();
		let name = key.name.clone();
		self.resolve_components(key)?
			.ok_or(DispatchError::NotFound { provides, name })
	}

	/// Looks up by explicit requirements, one per position.
	///
	/// Each position falls back to the wildcard. A lookup that matches nothing
	/// is an error, never an empty value: any `V`, `None` included, is a valid
	/// component.
	pub fn lookup<I>(
		&self,
		provides: impl Into<Capability>,
		requires: I,
		name: impl Into<Name>,
	) -> Result<Resolved<V>, DispatchError>
	where
		I: IntoIterator,
		I::Item: Into<Requirement>,
	{
		self.find(Query::new(provides).requires(requires).named(name))
	}

	/// Like [`Registry::lookup`], returning `default` when nothing matches.
	pub fn lookup_or<I>(
		&self,
		provides: impl Into<Capability>,
		requires: I,
		name: impl Into<Name>,
		default: impl Into<Resolved<V>>,
	) -> Result<Resolved<V>, DispatchError>
	where
		I: IntoIterator,
		I::Item: Into<Requirement>,
	{
		let key = Query::new(provides)
			.requires(requires)
			.named(name)
			.into_key();
		Ok(self
			.resolve_components(key)?
			.unwrap_or_else(|| default.into()))
	}

	/// Looks up by the capabilities of live values, one position per object.
	pub fn resolve(
		&self,
		provides: impl Into<Capability>,
		objects: &[&dyn Subject],
		name: impl Into<Name>,
	) -> Result<Resolved<V>, DispatchError> {
		self.lookup(provides, self.requirements_of(objects), name)
	}

	pub fn resolve_or(
		&self,
		provides: impl Into<Capability>,
		objects: &[&dyn Subject],
		name: impl Into<Name>,
		default: impl Into<Resolved<V>>,
	) -> Result<Resolved<V>, DispatchError> {
		self.lookup_or(provides, self.requirements_of(objects), name, default)
	}

	pub(crate) fn requirements_of(&self, objects: &[&dyn Subject]) -> Vec<Requirement> {
		objects
			.iter()
			.map(|object| self.capabilities.capabilities_of(*object))
			.collect()
	}

	fn resolve_components(&self, key: LookupKey) -> Result<Option<Resolved<V>>, DispatchError> {
		Ok(self.resolve_key(key)?.and_then(into_components))
	}

	/// Cache probe, then the combination walk on a miss.
	///
	/// The store read lock is held until the outcome is cached, so the fill
	/// cannot outlive the state it was computed from.
	pub(crate) fn resolve_key(
		&self,
		key: LookupKey,
	) -> Result<Option<Resolved<Slot<V>>>, DispatchError> {
		let store = self.store.read();
		if let Some(hit) = self.cache.lock().get(&key) {
			trace!(provides = %key.provides, name = %key.name, "lookup cache hit");
			return Ok(hit.into_option());
		}

		let plan = CombinationPlan::new(&key.requires, &key.defaults)?;
		let found = plan
			.iter()
			.find_map(|combo| store.get(&combo, &key.provides, &key.name));
		trace!(
			provides = %key.provides,
			name = %key.name,
			found = found.is_some(),
			"lookup cache miss"
		);
		self.cache.lock().put(key, Cached::from(found.clone()));
		Ok(found)
	}
}

fn into_components<V>(found: Resolved<Slot<V>>) -> Option<Resolved<V>> {
	match found {
		Resolved::One(slot) => slot.into_component().map(Resolved::One),
		Resolved::All(slots) => Some(Resolved::All(
			slots.into_iter().filter_map(Slot::into_component).collect(),
		)),
	}
}

impl<R> Registry<Factory<R>> {
	/// Resolves a factory for `objects` and builds its product from them.
	///
	/// # Errors
	///
	/// [`DispatchError::InvalidName`] for [`Name::All`] (there is no single
	/// factory to call), [`DispatchError::NotFound`] when nothing matches, and
	/// [`DispatchError::Factory`] carrying the factory's own failure.
	pub fn adapt(
		&self,
		provides: impl Into<Capability>,
		objects: &[&dyn Subject],
		name: impl Into<Name>,
	) -> Result<R, DispatchError> {
		let name = name.into();
		if name.is_all() {
			return Err(DispatchError::InvalidName { operation: "adapt" });
		}
		let factory = self
			.resolve(provides, objects, name)?
			.one()
			.ok_or(DispatchError::InvalidName { operation: "adapt" })?;
		factory.build(objects).map_err(DispatchError::Factory)
	}
}
