use thiserror::Error;

use crate::capability::Provides;
use crate::name::Name;

/// Errors surfaced by registration, lookup and notification.
///
/// Nothing is retried internally; every variant reaches the caller of the
/// operation that triggered it.
#[derive(Error, Debug)]
pub enum DispatchError {
	/// No combination matched and no default was supplied, or the entry to
	/// unregister does not exist.
	#[error("nothing provides {provides} under name {name}")]
	NotFound { provides: Provides, name: Name },
	/// [`Name::All`] was passed to an operation that stores or removes by name.
	#[error("ALL is a read-only name and cannot be used to {operation}")]
	InvalidName { operation: &'static str },
	/// A type's capabilities were declared twice.
	#[error("capabilities of `{type_name}` are already declared")]
	DuplicateDeclaration { type_name: &'static str },
	/// Requirement and default shapes disagree.
	#[error("{what}: expected {expected}, got {actual}")]
	ArityMismatch {
		what: &'static str,
		expected: usize,
		actual: usize,
	},
	/// A subscriber callback failed; the remaining subscribers were skipped.
	#[error(transparent)]
	Subscriber(anyhow::Error),
	/// A resolved factory failed.
	#[error(transparent)]
	Factory(anyhow::Error),
}

impl DispatchError {
	#[inline]
	pub fn is_not_found(&self) -> bool {
		matches!(self, Self::NotFound { .. })
	}
}
