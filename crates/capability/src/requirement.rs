//! Per-position requirement tuples.

use std::fmt;
use std::ops::Deref;

use smallvec::SmallVec;

use crate::capability::{Capability, TypeTag};

/// The ordered capability tags accepted at one dispatch position.
///
/// Order is precedence: the first tag is the most specific. A bare tag
/// converts into a one-element requirement.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Requirement(SmallVec<[Capability; 4]>);

impl Requirement {
	pub fn new() -> Self {
		Self::default()
	}

	/// The `[Wildcard]` requirement used as the default fallback of a position.
	pub fn wildcard() -> Self {
		Self::from(Capability::Wildcard)
	}

	pub fn push(&mut self, cap: impl Into<Capability>) {
		self.0.push(cap.into());
	}

	/// Appends `cap` unless it is already present.
	pub fn push_unique(&mut self, cap: impl Into<Capability>) {
		let cap = cap.into();
		if !self.0.contains(&cap) {
			self.0.push(cap);
		}
	}

	#[inline]
	pub fn as_slice(&self) -> &[Capability] {
		&self.0
	}
}

impl Deref for Requirement {
	type Target = [Capability];

	fn deref(&self) -> &[Capability] {
		&self.0
	}
}

impl fmt::Debug for Requirement {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(self.0.iter()).finish()
	}
}

impl From<Capability> for Requirement {
	fn from(cap: Capability) -> Self {
		let mut tags = SmallVec::new();
		tags.push(cap);
		Self(tags)
	}
}

impl From<&str> for Requirement {
	fn from(name: &str) -> Self {
		Self::from(Capability::from(name))
	}
}

impl From<String> for Requirement {
	fn from(name: String) -> Self {
		Self::from(Capability::from(name))
	}
}

impl From<TypeTag> for Requirement {
	fn from(ty: TypeTag) -> Self {
		Self::from(Capability::Type(ty))
	}
}

impl<T: Into<Capability>> From<Vec<T>> for Requirement {
	fn from(tags: Vec<T>) -> Self {
		tags.into_iter().collect()
	}
}

impl<T: Into<Capability>, const N: usize> From<[T; N]> for Requirement {
	fn from(tags: [T; N]) -> Self {
		tags.into_iter().collect()
	}
}

impl<T: Into<Capability>> FromIterator<T> for Requirement {
	fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
		Self(iter.into_iter().map(Into::into).collect())
	}
}

impl<'a> IntoIterator for &'a Requirement {
	type Item = &'a Capability;
	type IntoIter = std::slice::Iter<'a, Capability>;

	fn into_iter(self) -> Self::IntoIter {
		self.0.iter()
	}
}
