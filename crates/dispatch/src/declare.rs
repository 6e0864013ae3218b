//! Type-level capability declarations.
//!
//! # Purpose
//!
//! Lets a type say, once, which capabilities every value of it carries, and
//! which other declared type it extends. [`Declarations`] is then used as the
//! registry's [`CapabilitiesOf`] strategy.
//!
//! # Order
//!
//! For a value of type `T`, most specific first:
//!
//! 1. tags attached to the value itself ([`switchyard_capability::Tagged`]);
//! 2. tags declared for `T`;
//! 3. tags declared for `T`'s base, then its base, and so on;
//! 4. `T` itself as a type tag.
//!
//! Tags already present are not repeated. The wildcard fallback is appended
//! by the lookup, not here.

use std::any::TypeId;

use parking_lot::RwLock;
use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};
use switchyard_capability::{
	CapabilitiesOf, Capability, DispatchError, Requirement, Subject, TypeTag,
};
use tracing::debug;

#[derive(Debug)]
struct Declaration {
	tags: Vec<Capability>,
	base: Option<TypeId>,
}

/// Capabilities declared per type.
#[derive(Debug, Default)]
pub struct Declarations {
	types: RwLock<HashMap<TypeId, Declaration>>,
}

impl Declarations {
	pub fn new() -> Self {
		Self::default()
	}

	/// Starts the declaration for `T`; nothing is recorded until [`Declare::finish`].
	pub fn declare<T: ?Sized + 'static>(&self) -> Declare<'_> {
		Declare {
			declarations: self,
			ty: TypeTag::of::<T>(),
			tags: Vec::new(),
			base: None,
		}
	}

	pub fn is_declared<T: ?Sized + 'static>(&self) -> bool {
		self.types.read().contains_key(&TypeId::of::<T>())
	}

	/// Declared tags for a type, including inherited ones, without the type itself.
	fn declared_tags(&self, ty: TypeId, into: &mut Requirement) {
		let types = self.types.read();
		let mut visited = HashSet::default();
		let mut next = Some(ty);
		while let Some(id) = next {
			if !visited.insert(id) {
				break;
			}
			let Some(declaration) = types.get(&id) else {
				break;
			};
			for tag in &declaration.tags {
				into.push_unique(tag);
			}
			next = declaration.base;
		}
	}
}

impl CapabilitiesOf for Declarations {
	fn capabilities_of(&self, object: &dyn Subject) -> Requirement {
		let mut tags = Requirement::new();
		for tag in object.direct_capabilities() {
			tags.push_unique(tag);
		}
		let ty = object.type_tag();
		self.declared_tags(ty.id(), &mut tags);
		tags.push_unique(ty);
		tags
	}
}

/// Builder returned by [`Declarations::declare`].
#[must_use = "a declaration is only recorded by `finish`"]
pub struct Declare<'a> {
	declarations: &'a Declarations,
	ty: TypeTag,
	tags: Vec<Capability>,
	base: Option<TypeTag>,
}

impl Declare<'_> {
	/// Adds tags, most specific first.
	pub fn provides<I>(mut self, tags: I) -> Self
	where
		I: IntoIterator,
		I::Item: Into<Capability>,
	{
		self.tags.extend(tags.into_iter().map(Into::into));
		self
	}

	/// Inherits every tag declared for `B`, after this type's own tags.
	pub fn extends<B: ?Sized + 'static>(mut self) -> Self {
		self.base = Some(TypeTag::of::<B>());
		self
	}

	/// Records the declaration.
	///
	/// # Errors
	///
	/// [`DispatchError::DuplicateDeclaration`] if the type was already declared.
	pub fn finish(self) -> Result<(), DispatchError> {
		let mut types = self.declarations.types.write();
		if types.contains_key(&self.ty.id()) {
			return Err(DispatchError::DuplicateDeclaration {
				type_name: self.ty.name(),
			});
		}
		debug!(ty = self.ty.name(), tags = ?self.tags, base = ?self.base, "declare");
		types.insert(
			self.ty.id(),
			Declaration {
				tags: self.tags,
				base: self.base.map(|base| base.id()),
			},
		);
		Ok(())
	}
}
