//! Capability tags and provides keys.

use std::any::{TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Type identity usable as a capability tag.
///
/// Equality and hashing only look at the [`TypeId`]; the name is carried for
/// diagnostics.
#[derive(Clone, Copy)]
pub struct TypeTag {
	id: TypeId,
	name: &'static str,
}

impl TypeTag {
	/// Returns the tag for `T`.
	pub fn of<T: ?Sized + 'static>() -> Self {
		Self {
			id: TypeId::of::<T>(),
			name: type_name::<T>(),
		}
	}

	#[inline]
	pub fn id(&self) -> TypeId {
		self.id
	}

	#[inline]
	pub fn name(&self) -> &'static str {
		self.name
	}
}

impl PartialEq for TypeTag {
	fn eq(&self, other: &Self) -> bool {
		self.id == other.id
	}
}

impl Eq for TypeTag {}

impl Hash for TypeTag {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.id.hash(state);
	}
}

impl fmt::Debug for TypeTag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TypeTag({})", self.name)
	}
}

/// A role a registration can require or a value can carry.
///
/// Tags are compared by value only. [`Capability::Wildcard`] is the least
/// specific tag: it is the implicit fallback for every dispatch position and
/// matches registrations made "for anything".
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum Capability {
	/// Matches any value; the terminal fallback of every position.
	Wildcard,
	/// A string tag such as `"deckard"`.
	Named(Arc<str>),
	/// A concrete Rust type.
	Type(TypeTag),
}

impl Capability {
	pub fn named(name: impl Into<Arc<str>>) -> Self {
		Self::Named(name.into())
	}

	/// Returns the type tag for `T`.
	pub fn of<T: ?Sized + 'static>() -> Self {
		Self::Type(TypeTag::of::<T>())
	}

	#[inline]
	pub fn is_wildcard(&self) -> bool {
		matches!(self, Self::Wildcard)
	}

	/// Returns the string for [`Capability::Named`] tags.
	pub fn as_name(&self) -> Option<&str> {
		match self {
			Self::Named(name) => Some(name),
			_ => None,
		}
	}
}

impl fmt::Debug for Capability {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Wildcard => f.write_str("*"),
			Self::Named(name) => write!(f, "{name:?}"),
			Self::Type(ty) => write!(f, "<{}>", ty.name()),
		}
	}
}

impl fmt::Display for Capability {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Wildcard => f.write_str("*"),
			Self::Named(name) => f.write_str(name),
			Self::Type(ty) => write!(f, "<{}>", ty.name()),
		}
	}
}

impl From<&str> for Capability {
	fn from(name: &str) -> Self {
		Self::Named(Arc::from(name))
	}
}

impl From<String> for Capability {
	fn from(name: String) -> Self {
		Self::Named(Arc::from(name))
	}
}

impl From<Arc<str>> for Capability {
	fn from(name: Arc<str>) -> Self {
		Self::Named(name)
	}
}

impl From<TypeTag> for Capability {
	fn from(ty: TypeTag) -> Self {
		Self::Type(ty)
	}
}

impl From<&Capability> for Capability {
	fn from(cap: &Capability) -> Self {
		cap.clone()
	}
}

/// What a registration satisfies.
///
/// Callers only ever reach [`Provides::Component`]; the notification layer
/// files its subscriber lists under [`Provides::Subscribers`], which no caller
/// tag can be equal to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Provides {
	Component(Capability),
	Subscribers,
}

impl Provides {
	/// Returns the caller tag, if this is not the subscriber key.
	pub fn component(&self) -> Option<&Capability> {
		match self {
			Self::Component(cap) => Some(cap),
			Self::Subscribers => None,
		}
	}
}

impl From<Capability> for Provides {
	fn from(cap: Capability) -> Self {
		Self::Component(cap)
	}
}

impl fmt::Display for Provides {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Component(cap) => fmt::Display::fmt(cap, f),
			Self::Subscribers => f.write_str("<subscribers>"),
		}
	}
}
