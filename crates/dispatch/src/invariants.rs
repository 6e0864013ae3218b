use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use switchyard_capability::{Capability, DispatchError, Name, Provides};

use crate::component::Subscriber;
use crate::query::Resolved;
use crate::registry::Registry;

fn tuple(tags: &[&str]) -> Vec<Capability> {
	tags.iter().map(|t| Capability::from(*t)).collect()
}

fn counting(counter: &Arc<AtomicUsize>) -> Subscriber {
	let counter = Arc::clone(counter);
	Subscriber::new(move |_| {
		counter.fetch_add(1, Ordering::SeqCst);
		Ok(())
	})
}

/// Invariant: every mutation clears the lookup cache before it returns.
///
/// A lookup cached before a mutation MUST NOT be served after it.
pub(crate) fn inv_mutation_clears_cache() {
	let registry: Registry<&str> = Registry::new();
	registry.register("p", "v1", ["a"], "").expect("register");

	assert_eq!(registry.lookup("p", ["a"], "").expect("lookup"), Resolved::One("v1"));
	assert!(registry.lookup("p", ["b"], "").is_err());
	assert_eq!(registry.cached_lookups(), 2);

	registry.register("p", "v2", ["b"], "").expect("register");
	assert_eq!(registry.cached_lookups(), 0);
	assert_eq!(registry.lookup("p", ["b"], "").expect("lookup"), Resolved::One("v2"));

	registry.unregister("p", &"v1", ["a"], "").expect("unregister");
	assert_eq!(registry.cached_lookups(), 0);
	assert!(registry.lookup("p", ["a"], "").is_err());

	let subscriber = Subscriber::new(|_| Ok(()));
	registry.lookup("p", ["b"], "").expect("lookup");
	registry.subscribe(subscriber.clone(), ["a"], "").expect("subscribe");
	assert_eq!(registry.cached_lookups(), 0);

	registry.lookup("p", ["b"], "").expect("lookup");
	registry.unsubscribe(&subscriber, ["a"], "").expect("unsubscribe");
	assert_eq!(registry.cached_lookups(), 0);
}

#[cfg_attr(test, test)]
pub(crate) fn test_mutation_clears_cache() {
	inv_mutation_clears_cache()
}

/// Invariant: `Name::All` is a read-side selector only.
///
/// Every write path MUST reject it with `InvalidName` and leave the store untouched.
pub(crate) fn inv_all_name_rejected_on_write() {
	let registry: Registry<&str> = Registry::new();
	let subscriber = Subscriber::new(|_| Ok(()));

	let errors = [
		registry.register("p", "v", ["a", "b", "c"], Name::All),
		registry.subscribe(subscriber.clone(), ["a", "b", "c"], Name::All),
		registry.unsubscribe(&subscriber, ["a", "b", "c"], Name::All),
	];
	for result in errors {
		assert!(matches!(result, Err(DispatchError::InvalidName { .. })));
	}
	assert_eq!(registry.with_store(|store| store.bucket_count()), 0);
}

#[cfg_attr(test, test)]
pub(crate) fn test_all_name_rejected_on_write() {
	inv_all_name_rejected_on_write()
}

/// Invariant: removing the last named entry for a tuple removes its bucket.
pub(crate) fn inv_last_entry_drops_bucket() {
	let registry: Registry<&str> = Registry::new();
	registry.register("p", "v", ["a", "b"], "x").expect("register");
	registry.unregister("p", &"v", ["a", "b"], "x").expect("unregister");

	assert!(registry.with_store(|store| store.bucket(&tuple(&["a", "b"])).is_none()));
	assert!(
		registry
			.lookup("p", ["a", "b"], Name::All)
			.is_err_and(|err| err.is_not_found())
	);
}

#[cfg_attr(test, test)]
pub(crate) fn test_last_entry_drops_bucket() {
	inv_last_entry_drops_bucket()
}

/// Invariant: an `ALL` list never outlives the named entries of its provides.
pub(crate) fn inv_all_list_needs_a_named_entry() {
	let registry: Registry<&str> = Registry::new();
	registry.register("p", "pv", ["a"], "x").expect("register");
	registry.register("q", "qv", ["a"], "y").expect("register");
	registry.unregister("p", &"pv", ["a"], "x").expect("unregister");

	let provides = Provides::Component(Capability::from("p"));
	registry.with_store(|store| {
		let bucket = store.bucket(&tuple(&["a"])).expect("bucket kept for q");
		assert!(bucket.all(&provides).is_none());
		assert_eq!(bucket.named_len(), 1);
	});
	assert!(registry.lookup("p", ["a"], Name::All).is_err());
	assert_eq!(
		registry.lookup("q", ["a"], Name::All).expect("q survives"),
		Resolved::All(vec!["qv"])
	);
}

#[cfg_attr(test, test)]
pub(crate) fn test_all_list_needs_a_named_entry() {
	inv_all_list_needs_a_named_entry()
}

/// Invariant: subscribers fire in the order they were subscribed.
pub(crate) fn inv_subscribers_keep_append_order() {
	let registry: Registry<()> = Registry::new();
	let log = Arc::new(parking_lot::Mutex::new(Vec::new()));
	for id in 0..4 {
		let log = Arc::clone(&log);
		let subscriber = Subscriber::new(move |_| {
			log.lock().push(id);
			Ok(())
		});
		registry.subscribe(subscriber, [Capability::of::<u8>()], "").expect("subscribe");
	}

	registry.notify(&[&7_u8], "").expect("notify");
	assert_eq!(*log.lock(), vec![0, 1, 2, 3]);
}

#[cfg_attr(test, test)]
pub(crate) fn test_subscribers_keep_append_order() {
	inv_subscribers_keep_append_order()
}

/// Invariant: unsubscribe removes at most one occurrence per call.
pub(crate) fn inv_unsubscribe_removes_one() {
	let registry: Registry<()> = Registry::new();
	let counter = Arc::new(AtomicUsize::new(0));
	let subscriber = counting(&counter);
	registry.subscribe(subscriber.clone(), ["a"], "").expect("subscribe");
	registry.subscribe(subscriber.clone(), ["a"], "").expect("subscribe");

	registry.unsubscribe(&subscriber, ["a"], "").expect("unsubscribe");
	let left = registry.subscribers(["a"], "").expect("list").one().expect("one list");
	assert_eq!(left, vec![subscriber.clone()]);

	registry.unsubscribe(&subscriber, ["a"], "").expect("unsubscribe");
	registry.unsubscribe(&subscriber, ["a"], "").expect("unsubscribe again");
	let left = registry.subscribers(["a"], "").expect("list").one().expect("one list");
	assert!(left.is_empty());
	assert_eq!(counter.load(Ordering::SeqCst), 0);
}

#[cfg_attr(test, test)]
pub(crate) fn test_unsubscribe_removes_one() {
	inv_unsubscribe_removes_one()
}
