//! Lookup requests and their results.

use switchyard_capability::{Capability, Name, Provides, Requirement};

/// The outcome of a successful lookup.
///
/// A specific name resolves to [`Resolved::One`]; [`Name::All`] resolves to
/// every component registered under the first matching combination, in
/// registration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved<V> {
	One(V),
	All(Vec<V>),
}

impl<V> Resolved<V> {
	/// The single component, or `None` for an `All` result.
	pub fn one(self) -> Option<V> {
		match self {
			Self::One(value) => Some(value),
			Self::All(_) => None,
		}
	}

	pub fn as_one(&self) -> Option<&V> {
		match self {
			Self::One(value) => Some(value),
			Self::All(_) => None,
		}
	}

	/// Flattens into a list; a single component becomes a one-element list.
	pub fn into_vec(self) -> Vec<V> {
		match self {
			Self::One(value) => vec![value],
			Self::All(values) => values,
		}
	}

	pub fn map<U>(self, mut f: impl FnMut(V) -> U) -> Resolved<U> {
		match self {
			Self::One(value) => Resolved::One(f(value)),
			Self::All(values) => Resolved::All(values.into_iter().map(f).collect()),
		}
	}
}

impl<V> From<V> for Resolved<V> {
	fn from(value: V) -> Self {
		Self::One(value)
	}
}

/// A fully specified lookup.
///
/// ```ignore
/// let query = Query::new("fight")
///     .require(["inherits", "barris"])
///     .require("luckman")
///     .named("primary");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
	provides: Capability,
	requires: Vec<Requirement>,
	name: Name,
	defaults: Option<Vec<Requirement>>,
}

impl Query {
	pub fn new(provides: impl Into<Capability>) -> Self {
		Self {
			provides: provides.into(),
			requires: Vec::new(),
			name: Name::default(),
			defaults: None,
		}
	}

	/// Appends one dispatch position.
	pub fn require(mut self, requirement: impl Into<Requirement>) -> Self {
		self.requires.push(requirement.into());
		self
	}

	pub fn requires<I>(mut self, requirements: I) -> Self
	where
		I: IntoIterator,
		I::Item: Into<Requirement>,
	{
		self.requires.extend(requirements.into_iter().map(Into::into));
		self
	}

	pub fn named(mut self, name: impl Into<Name>) -> Self {
		self.name = name.into();
		self
	}

	/// Overrides the per-position fallbacks, which otherwise are the wildcard
	/// alone. Each tuple may hold several slots tried in order.
	pub fn defaults<I>(mut self, defaults: I) -> Self
	where
		I: IntoIterator,
		I::Item: Into<Requirement>,
	{
		self.defaults = Some(defaults.into_iter().map(Into::into).collect());
		self
	}

	pub fn name(&self) -> &Name {
		&self.name
	}

	pub(crate) fn into_key(self) -> LookupKey {
		LookupKey::new(
			Provides::Component(self.provides),
			self.requires,
			self.name,
			self.defaults,
		)
	}
}

/// Identity of one lookup; the cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct LookupKey {
	pub(crate) provides: Provides,
	pub(crate) requires: Vec<Requirement>,
	pub(crate) name: Name,
	pub(crate) defaults: Vec<Requirement>,
}

impl LookupKey {
	pub(crate) fn new(
		provides: Provides,
		requires: Vec<Requirement>,
		name: Name,
		defaults: Option<Vec<Requirement>>,
	) -> Self {
		let defaults = defaults.unwrap_or_else(|| vec![Requirement::wildcard(); requires.len()]);
		Self {
			provides,
			requires,
			name,
			defaults,
		}
	}
}
