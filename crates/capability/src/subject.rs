//! Live values and the capabilities they carry.
//!
//! # Purpose
//!
//! `resolve`, `adapt` and `notify` dispatch on values instead of explicit tags.
//! A [`Subject`] reports the tags it declares itself plus its runtime type; a
//! [`CapabilitiesOf`] strategy turns that into the [`Requirement`] for one
//! dispatch position. The registry never inspects values beyond this seam.
//!
//! # Key types
//!
//! | Type | Meaning |
//! |---|---|
//! | [`Subject`] | A value that can be dispatched on |
//! | [`Tagged`] | Wrapper that attaches instance-level tags to any value |
//! | [`CapabilitiesOf`] | Injected strategy: value → ordered tags, most specific first |
//! | [`DirectCapabilities`] | Default strategy: instance tags, then the runtime type |

use std::ops::Deref;

use crate::capability::{Capability, TypeTag};
use crate::requirement::Requirement;

/// A value the registry can dispatch on.
pub trait Subject: 'static {
	/// Tags declared directly on this value, most specific first.
	fn direct_capabilities(&self) -> &[Capability] {
		&[]
	}

	/// The runtime type of this value; the least specific tag it carries.
	fn type_tag(&self) -> TypeTag {
		TypeTag::of::<Self>()
	}
}

/// Computes the requirement a live value satisfies at one dispatch position.
pub trait CapabilitiesOf: Send + Sync {
	fn capabilities_of(&self, object: &dyn Subject) -> Requirement;
}

/// Instance tags followed by the runtime type.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectCapabilities;

impl CapabilitiesOf for DirectCapabilities {
	fn capabilities_of(&self, object: &dyn Subject) -> Requirement {
		let mut tags: Requirement = object.direct_capabilities().iter().collect();
		tags.push_unique(object.type_tag());
		tags
	}
}

/// Attaches instance-level capability tags to a value.
///
/// The runtime type reported for dispatch is `T`, not the wrapper.
#[derive(Debug, Clone, PartialEq)]
pub struct Tagged<T> {
	value: T,
	tags: Vec<Capability>,
}

impl<T> Tagged<T> {
	pub fn new(value: T) -> Self {
		Self {
			value,
			tags: Vec::new(),
		}
	}

	/// Declares additional tags, more specific than those already present.
	///
	/// New tags come first; earlier tags that reappear are not repeated.
	pub fn provides<I>(mut self, tags: I) -> Self
	where
		I: IntoIterator,
		I::Item: Into<Capability>,
	{
		let previous = std::mem::take(&mut self.tags);
		for tag in tags.into_iter().map(Into::into).chain(previous) {
			if !self.tags.contains(&tag) {
				self.tags.push(tag);
			}
		}
		self
	}

	pub fn tags(&self) -> &[Capability] {
		&self.tags
	}

	pub fn into_inner(self) -> T {
		self.value
	}
}

impl<T> Deref for Tagged<T> {
	type Target = T;

	fn deref(&self) -> &T {
		&self.value
	}
}

impl<T: 'static> Subject for Tagged<T> {
	fn direct_capabilities(&self) -> &[Capability] {
		&self.tags
	}

	fn type_tag(&self) -> TypeTag {
		TypeTag::of::<T>()
	}
}

macro_rules! plain_subjects {
	($($ty:ty),* $(,)?) => {
		$(impl Subject for $ty {})*
	};
}

plain_subjects!(
	(),
	bool,
	char,
	i8,
	i16,
	i32,
	i64,
	i128,
	isize,
	u8,
	u16,
	u32,
	u64,
	u128,
	usize,
	f32,
	f64,
	String,
	&'static str,
);
