//! Subscriber lists and event fan-out.
//!
//! Subscriber lists live in the same store as components, under the reserved
//! [`Provides::Subscribers`] key, so they resolve with the same precedence.

use std::sync::Arc;

use switchyard_capability::{Capability, DispatchError, Name, Provides, Requirement, Subject};
use tracing::{debug, trace, warn};

use super::{Registry, exact, writable};
use crate::component::{Slot, Subscriber};
use crate::query::{LookupKey, Resolved};

impl<V: Clone> Registry<V> {
	/// Appends `subscriber` to the list at exactly `requires` and `name`.
	///
	/// The list is read from the exact key only, never from a wildcard
	/// fallback, so subscribing never edits another key's list.
	pub fn subscribe<I>(
		&self,
		subscriber: Subscriber,
		requires: I,
		name: impl Into<Name>,
	) -> Result<(), DispatchError>
	where
		I: IntoIterator,
		I::Item: Into<Capability>,
	{
		let name = writable(name.into(), "subscribe")?;
		let requires = exact(requires);
		debug!(?requires, name = %name, ?subscriber, "subscribe");
		self.mutate("subscribe", |store| {
			let mut list = store
				.get_exact(&requires, &Provides::Subscribers, &name)
				.map(|slot| slot.subscribers().to_vec())
				.unwrap_or_default();
			list.push(subscriber);
			store.replace(Provides::Subscribers, Slot::Subscribers(list), requires, name);
			self.mark_subscribed();
		});
		Ok(())
	}

	/// Removes one occurrence of `subscriber` from the list at exactly
	/// `requires` and `name`. Unknown subscribers are ignored.
	///
	/// An emptied list stays registered, so it keeps shadowing less specific
	/// lists: `notify` for these requirements resolves to it and calls nobody.
	pub fn unsubscribe<I>(
		&self,
		subscriber: &Subscriber,
		requires: I,
		name: impl Into<Name>,
	) -> Result<(), DispatchError>
	where
		I: IntoIterator,
		I::Item: Into<Capability>,
	{
		let name = writable(name.into(), "unsubscribe")?;
		let requires = exact(requires);
		let label = Arc::clone(&name);
		let removed = self.mutate("unsubscribe", |store| {
			let Some(mut list) = store
				.get_exact(&requires, &Provides::Subscribers, &name)
				.map(|slot| slot.subscribers().to_vec())
			else {
				return false;
			};
			let Some(position) = list.iter().position(|s| s == subscriber) else {
				return false;
			};
			list.remove(position);
			store.replace(Provides::Subscribers, Slot::Subscribers(list), requires, name);
			true
		});
		debug!(name = %label, ?subscriber, removed, "unsubscribe");
		Ok(())
	}

	/// The subscriber list resolved for explicit requirements.
	///
	/// With [`Name::All`], one list per name registered at the first matching
	/// combination.
	pub fn subscribers<I>(
		&self,
		requires: I,
		name: impl Into<Name>,
	) -> Result<Resolved<Vec<Subscriber>>, DispatchError>
	where
		I: IntoIterator,
		I::Item: Into<Requirement>,
	{
		let name = name.into();
		let requires = requires.into_iter().map(Into::into).collect();
		let key = LookupKey::new(Provides::Subscribers, requires, name.clone(), None);
		let found = self.resolve_key(key)?.ok_or(DispatchError::NotFound {
			provides: Provides::Subscribers,
			name,
		})?;
		Ok(found.map(Slot::into_subscribers))
	}

	/// Calls every subscriber resolved for `objects`, in append order.
	///
	/// Does nothing when no subscriber was ever registered or none matches.
	///
	/// # Errors
	///
	/// The first failing subscriber stops the fan-out; its error is returned
	/// as [`DispatchError::Subscriber`].
	pub fn notify(
		&self,
		objects: &[&dyn Subject],
		name: impl Into<Name>,
	) -> Result<(), DispatchError> {
		if !self.any_subscribed() {
			return Ok(());
		}
		let key = LookupKey::new(
			Provides::Subscribers,
			self.requirements_of(objects),
			name.into(),
			None,
		);
		let Some(found) = self.resolve_key(key)? else {
			trace!(objects = objects.len(), "notify: no subscribers matched");
			return Ok(());
		};

		let subscribers: Vec<Subscriber> = found
			.into_vec()
			.into_iter()
			.flat_map(Slot::into_subscribers)
			.collect();
		trace!(objects = objects.len(), subscribers = subscribers.len(), "notify");
		for subscriber in &subscribers {
			subscriber.call(objects).map_err(|err| {
				warn!(?subscriber, error = %err, "subscriber failed");
				DispatchError::Subscriber(err)
			})?;
		}
		Ok(())
	}
}
