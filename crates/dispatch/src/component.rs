//! Callable components: subscribers and factories.
//!
//! Both wrap a shared closure. Equality is identity of the closure allocation,
//! so unsubscribing a clone of a [`Subscriber`] removes the one it was cloned from.

use std::fmt;
use std::sync::Arc;

use switchyard_capability::Subject;

type Callback = dyn Fn(&[&dyn Subject]) -> anyhow::Result<()> + Send + Sync;
type Build<R> = dyn Fn(&[&dyn Subject]) -> anyhow::Result<R> + Send + Sync;

/// A notification callback, invoked with the objects passed to `notify`.
#[derive(Clone)]
pub struct Subscriber(Arc<Callback>);

impl Subscriber {
	pub fn new<F>(callback: F) -> Self
	where
		F: Fn(&[&dyn Subject]) -> anyhow::Result<()> + Send + Sync + 'static,
	{
		Self(Arc::new(callback))
	}

	pub fn call(&self, objects: &[&dyn Subject]) -> anyhow::Result<()> {
		(self.0)(objects)
	}

	fn addr(&self) -> *const () {
		Arc::as_ptr(&self.0) as *const ()
	}
}

impl PartialEq for Subscriber {
	fn eq(&self, other: &Self) -> bool {
		self.addr() == other.addr()
	}
}

impl Eq for Subscriber {}

impl fmt::Debug for Subscriber {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Subscriber({:p})", self.addr())
	}
}

/// Builds an adapter from the objects passed to `adapt`.
pub struct Factory<R>(Arc<Build<R>>);

impl<R> Factory<R> {
	pub fn new<F>(build: F) -> Self
	where
		F: Fn(&[&dyn Subject]) -> anyhow::Result<R> + Send + Sync + 'static,
	{
		Self(Arc::new(build))
	}

	pub fn build(&self, objects: &[&dyn Subject]) -> anyhow::Result<R> {
		(self.0)(objects)
	}

	fn addr(&self) -> *const () {
		Arc::as_ptr(&self.0) as *const ()
	}
}

impl<R> Clone for Factory<R> {
	fn clone(&self) -> Self {
		Self(Arc::clone(&self.0))
	}
}

impl<R> PartialEq for Factory<R> {
	fn eq(&self, other: &Self) -> bool {
		self.addr() == other.addr()
	}
}

impl<R> fmt::Debug for Factory<R> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Factory({:p})", self.addr())
	}
}

/// What the store actually holds under one `(provides, name)` key.
///
/// Caller components and subscriber lists share one store; they are told
/// apart by their provides key, never by inspecting the value.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Slot<V> {
	Component(V),
	Subscribers(Vec<Subscriber>),
}

impl<V> Slot<V> {
	pub(crate) fn into_component(self) -> Option<V> {
		match self {
			Self::Component(value) => Some(value),
			Self::Subscribers(_) => None,
		}
	}

	pub(crate) fn as_component(&self) -> Option<&V> {
		match self {
			Self::Component(value) => Some(value),
			Self::Subscribers(_) => None,
		}
	}

	pub(crate) fn into_subscribers(self) -> Vec<Subscriber> {
		match self {
			Self::Component(_) => Vec::new(),
			Self::Subscribers(list) => list,
		}
	}

	pub(crate) fn subscribers(&self) -> &[Subscriber] {
		match self {
			Self::Component(_) => &[],
			Self::Subscribers(list) => list,
		}
	}
}
