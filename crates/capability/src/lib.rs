//! Capability primitives for multi-key dispatch.
//!
//! This crate holds the pure, lock-free half of switchyard:
//! - [`Capability`]: an opaque tag naming a role a value can play
//! - [`Requirement`]: the ordered tags for one dispatch position
//! - [`Name`]: the secondary registration key, including the read-only [`Name::All`]
//! - [`Provides`]: the tag a registration satisfies, plus the reserved subscriber key
//! - [`Subject`] / [`CapabilitiesOf`]: how live values report their capabilities
//! - [`CombinationPlan`]: the most-specific-first lookup order
//! - [`DispatchError`]: the error type shared by every dispatch operation
//!
//! The registry itself (store, cache, resolver, notifications) lives in
//! `switchyard-dispatch`.

pub mod capability;
pub mod combination;
pub mod error;
pub mod name;
pub mod requirement;
pub mod subject;

pub use capability::{Capability, Provides, TypeTag};
pub use combination::{Combination, CombinationPlan, Combinations};
pub use error::DispatchError;
pub use name::Name;
pub use requirement::Requirement;
pub use subject::{CapabilitiesOf, DirectCapabilities, Subject, Tagged};
