//! Capability-keyed component registry.
//!
//! A [`Registry`] maps a tuple of required capabilities, a provided
//! capability and a name to a component, and resolves queries against it
//! most specific first: exact tags, then per-position defaults, then the
//! wildcard. Results are memoized until the next mutation.
//!
//! ```ignore
//! let registry: Registry<&str> = Registry::new();
//! registry.register("bladerunner", "deckardvalue", [Capability::Wildcard, "deckard".into()], "")?;
//!
//! let found = registry.lookup("bladerunner", [Requirement::wildcard(), "deckard".into()], "")?;
//! assert_eq!(found, Resolved::One("deckardvalue"));
//! ```
//!
//! # Modules
//!
//! - [`registry`]: register/unregister, lookup/resolve/adapt, subscribe/notify, mapping view
//! - [`declare`]: type-level capability declarations with inheritance
//! - [`config`]: [`RegistryConfig`], loadable from TOML
//!
//! Tags, requirements, names and the combination order come from
//! `switchyard-capability` and are re-exported here.

mod cache;
pub mod component;
pub mod config;
pub mod declare;
mod query;
pub mod registry;
mod store;

#[cfg(test)]
mod invariants;

// Bench-only dev-dependency.
#[cfg(test)]
use criterion as _;

pub use component::{Factory, Subscriber};
pub use config::{ConfigError, RegistryConfig};
pub use declare::{Declarations, Declare};
pub use query::{Query, Resolved};
pub use registry::Registry;
pub use switchyard_capability::{
	CapabilitiesOf, Capability, Combination, CombinationPlan, DirectCapabilities, DispatchError,
	Name, Provides, Requirement, Subject, Tagged, TypeTag,
};
