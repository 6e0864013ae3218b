//! The component registry.
//!
//! # Purpose
//!
//! Map `(requirement tuple, provides, name)` to components and answer
//! "what provides X for these inputs" with most-specific-first fallback.
//!
//! # Mental model
//!
//! * Writers register a component for one exact tuple of capabilities.
//! * Readers ask with one [`Requirement`] per position (several acceptable
//!   tags, most specific first). The [`CombinationPlan`] turns that into an
//!   ordered list of exact tuples; the first tuple with a matching entry wins.
//! * Results, including "nothing matched", are memoized per query until the
//!   next mutation.
//!
//! # Key types
//!
//! | Type | Meaning | Constraints | Constructed / mutated in |
//! |---|---|---|---|
//! | [`Registry`] | Store + cache + capability strategy | One cache per registry, never shared | [`Registry::with_config`] |
//! | [`crate::Query`] | Fully specified lookup | Defaults are one wildcard per position unless overridden | [`crate::Query::new`] |
//! | [`crate::Resolved`] | Lookup result | `All` only for [`Name::All`] | `Registry::find` |
//! | [`crate::Subscriber`] | Notification callback | Compared by identity | [`crate::Subscriber::new`] |
//!
//! # Invariants
//!
//! * Every mutation clears the lookup cache while still holding the store
//!   write lock (see `invariants::test_mutation_clears_cache`).
//! * [`Name::All`] is rejected by every write (see `invariants::test_all_name_rejected_on_write`).
//! * Subscriber lists keep append order (see `invariants::test_subscribers_keep_append_order`).
//!
//! # Concurrency & ordering
//!
//! * Lock order is store, then cache. Readers hold the store read lock across
//!   cache probe, combination walk and cache fill, so a fill can never land
//!   after a writer cleared the cache for a newer store state.
//! * Subscribers and factories run after all locks are released; they may
//!   call back into the registry.

mod mapping;
mod notify;
mod resolver;

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::{Mutex, RwLock};
use switchyard_capability::{
	CapabilitiesOf, Capability, DirectCapabilities, DispatchError, Name, Provides,
};
#[cfg(doc)]
use switchyard_capability::{CombinationPlan, Requirement};
use tracing::debug;

use crate::cache::LookupCache;
use crate::component::Slot;
use crate::config::RegistryConfig;
use crate::store::Store;

/// A capability-keyed component registry.
///
/// `V` is the component type. Lookups hand out clones, so `V` is usually
/// cheap to clone (`Arc`, `&'static str`, a small enum).
pub struct Registry<V> {
	store: RwLock<Store<Slot<V>>>,
	cache: Mutex<LookupCache<Slot<V>>>,
	capabilities: Arc<dyn CapabilitiesOf>,
	has_subscribers: AtomicBool,
	config: RegistryConfig,
}

impl<V: Clone> Registry<V> {
	pub fn new() -> Self {
		Self::with_config(RegistryConfig::default())
	}

	pub fn with_config(config: RegistryConfig) -> Self {
		Self {
			store: RwLock::new(Store::default()),
			cache: Mutex::new(LookupCache::new(config.cache_capacity)),
			capabilities: Arc::new(DirectCapabilities),
			has_subscribers: AtomicBool::new(false),
			config,
		}
	}

	/// Replaces the strategy `resolve`, `adapt` and `notify` use to read the
	/// capabilities of live values.
	pub fn with_capabilities(mut self, capabilities: Arc<dyn CapabilitiesOf>) -> Self {
		self.capabilities = capabilities;
		self
	}

	#[inline]
	pub fn config(&self) -> RegistryConfig {
		self.config
	}

	/// Number of memoized lookups, negative results included.
	pub fn cached_lookups(&self) -> usize {
		self.cache.lock().len()
	}

	/// Registers `component` for the exact capability tuple `requires`.
	///
	/// Re-registering the same `(provides, requires, name)` replaces the named
	/// entry; both components stay in the `ALL` list, in order.
	///
	/// # Errors
	///
	/// [`DispatchError::InvalidName`] if `name` is [`Name::All`].
	pub fn register<I>(
		&self,
		provides: impl Into<Capability>,
		component: V,
		requires: I,
		name: impl Into<Name>,
	) -> Result<(), DispatchError>
	where
		I: IntoIterator,
		I::Item: Into<Capability>,
	{
		let name = writable(name.into(), "register")?;
		let provides = Provides::Component(provides.into());
		let requires = exact(requires);
		debug!(%provides, ?requires, name = %name, "register");
		self.mutate("register", |store| {
			store.register(provides, Slot::Component(component), requires, name);
		});
		Ok(())
	}

	/// Removes a registration.
	///
	/// With a specific name, drops that entry and the occurrence of
	/// `component` it contributed to the `ALL` list. With [`Name::All`], drops
	/// every registration for the tuple regardless of provides.
	///
	/// # Errors
	///
	/// [`DispatchError::NotFound`] if nothing is registered under the key, or
	/// the entry there is not `component`. The store is left unchanged.
	pub fn unregister<I>(
		&self,
		provides: impl Into<Capability>,
		component: &V,
		requires: I,
		name: impl Into<Name>,
	) -> Result<(), DispatchError>
	where
		V: PartialEq,
		I: IntoIterator,
		I::Item: Into<Capability>,
	{
		let provides = Provides::Component(provides.into());
		let name = name.into();
		let requires = exact(requires);
		let removed = self.mutate("unregister", |store| match &name {
			Name::All => store.remove_bucket(&requires).is_some(),
			Name::Specific(specific) => store
				.remove(&requires, &provides, specific, |slot| {
					slot.as_component() == Some(component)
				})
				.is_some(),
		});
		debug!(%provides, ?requires, %name, removed, "unregister");
		if removed {
			Ok(())
		} else {
			Err(DispatchError::NotFound { provides, name })
		}
	}

	/// Applies a store mutation and clears the cache before the write lock drops.
	fn mutate<R>(
		&self,
		operation: &'static str,
		apply: impl FnOnce(&mut Store<Slot<V>>) -> R,
	) -> R {
		let mut store = self.store.write();
		let result = apply(&mut store);
		let mut cache = self.cache.lock();
		let dropped = cache.len();
		cache.clear();
		debug!(operation, dropped, "lookup cache cleared");
		result
	}

	fn mark_subscribed(&self) {
		self.has_subscribers.store(true, Ordering::Release);
	}

	fn any_subscribed(&self) -> bool {
		self.has_subscribers.load(Ordering::Acquire)
	}

	#[cfg(test)]
	pub(crate) fn with_store<R>(&self, inspect: impl FnOnce(&Store<Slot<V>>) -> R) -> R {
		inspect(&self.store.read())
	}
}

/// Converts a name for the write side, where [`Name::All`] is meaningless.
fn writable(name: Name, operation: &'static str) -> Result<Arc<str>, DispatchError> {
	name.into_specific()
		.ok_or(DispatchError::InvalidName { operation })
}

fn exact<I>(requires: I) -> Box<[Capability]>
where
	I: IntoIterator,
	I::Item: Into<Capability>,
{
	requires.into_iter().map(Into::into).collect()
}

impl<V: Clone> Default for Registry<V> {
	fn default() -> Self {
		Self::new()
	}
}

/// Copies the store; the copy starts with an empty cache of the same capacity.
impl<V: Clone> Clone for Registry<V> {
	fn clone(&self) -> Self {
		Self {
			store: RwLock::new(self.store.read().clone()),
			cache: Mutex::new(LookupCache::new(self.cache.lock().capacity())),
			capabilities: Arc::clone(&self.capabilities),
			has_subscribers: AtomicBool::new(self.any_subscribed()),
			config: self.config,
		}
	}
}

impl<V> fmt::Debug for Registry<V> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Registry")
			.field("buckets", &self.store.read().bucket_count())
			.field("cached_lookups", &self.cache.lock().len())
			.field("config", &self.config)
			.finish_non_exhaustive()
	}
}
