//! Registration names.

use std::fmt;
use std::sync::Arc;

/// Secondary key distinguishing registrations that share provides and requires.
///
/// The default is the empty name. [`Name::All`] is a read-side selector for
/// "every specifically named registration"; it can never be stored.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Name {
	Specific(Arc<str>),
	All,
}

impl Name {
	pub fn new(name: impl Into<Arc<str>>) -> Self {
		Self::Specific(name.into())
	}

	#[inline]
	pub fn is_all(&self) -> bool {
		matches!(self, Self::All)
	}

	/// Returns true for the empty (unnamed) registration name.
	pub fn is_default(&self) -> bool {
		matches!(self, Self::Specific(name) if name.is_empty())
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Specific(name) => Some(name),
			Self::All => None,
		}
	}

	/// Converts into a storable name; `None` for [`Name::All`].
	pub fn into_specific(self) -> Option<Arc<str>> {
		match self {
			Self::Specific(name) => Some(name),
			Self::All => None,
		}
	}
}

impl Default for Name {
	fn default() -> Self {
		Self::Specific(Arc::from(""))
	}
}

impl From<&str> for Name {
	fn from(name: &str) -> Self {
		Self::Specific(Arc::from(name))
	}
}

impl From<String> for Name {
	fn from(name: String) -> Self {
		Self::Specific(Arc::from(name))
	}
}

impl From<Arc<str>> for Name {
	fn from(name: Arc<str>) -> Self {
		Self::Specific(name)
	}
}

impl From<&Name> for Name {
	fn from(name: &Name) -> Self {
		name.clone()
	}
}

impl fmt::Debug for Name {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Specific(name) => write!(f, "{name:?}"),
			Self::All => f.write_str("ALL"),
		}
	}
}

impl fmt::Display for Name {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		fmt::Debug::fmt(self, f)
	}
}
