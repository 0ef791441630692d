use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use super::*;
use crate::error::{CallbackSlot, ConditionError};

/// Wires a prefix provider answering `len(key)` and recording every key it is asked about.
fn length_provider(store: &mut ConditionsStore, prefix: &str) -> Rc<RefCell<Vec<String>>> {
	let calls = Rc::new(RefCell::new(Vec::new()));
	let log = calls.clone();
	store
		.provider_prefixed(prefix)
		.on_get(move |key| {
			log.borrow_mut().push(key.to_owned());
			key.len() as i64
		})
		.on_has(|_| true)
		.on_set(|_, _| false)
		.on_erase(|_| false);
	calls
}

/// Wires an exact provider backed by a shared counter.
fn counter_provider(store: &mut ConditionsStore, name: &str) -> Rc<Cell<i64>> {
	let counter = Rc::new(Cell::new(0));
	let (r, w, e) = (counter.clone(), counter.clone(), counter.clone());
	store
		.provider_named(name)
		.on_get(move |_| r.get())
		.on_has(|_| true)
		.on_set(move |_, v| {
			w.set(v);
			true
		})
		.on_erase(move |_| {
			e.set(0);
			true
		});
	counter
}

#[test]
fn test_unset_key_reads_zero() {
	let mut store = ConditionsStore::new();
	assert_eq!(store.get("anything"), 0);
	assert!(!store.has("anything"));
	assert_eq!(store.has_get("anything"), (false, 0));

	store.set("other", 3);
	assert_eq!(store.get("anything"), 0);
	assert!(store.lookup("anything").is_none());
	assert_eq!(store.len(), 1);
}

#[test]
fn test_set_then_get() {
	let mut store = ConditionsStore::new();
	assert!(store.set("credits", 1500));
	assert_eq!(store.get("credits"), 1500);
	assert!(store.has("credits"));
	assert_eq!(store.has_get("credits"), (true, 1500));

	assert!(store.set("credits", -2));
	assert_eq!(store.get("credits"), -2);
}

#[test]
fn test_stored_zero_is_present() {
	let mut store = ConditionsStore::new();
	store.set("zero", 0);
	assert!(store.has("zero"));
	assert_eq!(store.has_get("zero"), (true, 0));
}

#[test]
fn test_add_creates_and_accumulates() {
	let mut store = ConditionsStore::new();
	assert!(store.add("count", 2));
	assert!(store.add("count", 5));
	assert!(store.add("count", -1));
	assert_eq!(store.get("count"), 6);
}

#[test]
fn test_add_wraps_instead_of_panicking() {
	let mut store: ConditionsStore = [("big", i64::MAX)].into_iter().collect();
	assert!(store.add("big", 1));
	assert_eq!(store.get("big"), i64::MIN);
}

#[test]
fn test_erase_primary() {
	let mut store: ConditionsStore = [("a", 1), ("b", 2)].into_iter().collect();
	assert!(store.erase("a"));
	assert!(!store.has("a"));
	assert_eq!(store.get("a"), 0);
	assert_eq!(store.len(), 1);
}

#[test]
fn test_erase_absent_is_noop_success() {
	let mut store: ConditionsStore = [("a", 1)].into_iter().collect();
	assert!(store.erase("missing"));
	assert_eq!(store.len(), 1);
	assert_eq!(store.get("a"), 1);
}

#[test]
fn test_prefix_provider_gets_full_key() {
	let mut store = ConditionsStore::new();
	let calls = length_provider(&mut store, "events: ");

	assert_eq!(store.get("events: foo"), "events: foo".len() as i64);
	assert_eq!(*calls.borrow(), ["events: foo"]);

	assert_eq!(store.get("other"), 0);
	assert_eq!(store.get("events"), 0);
	assert_eq!(calls.borrow().len(), 1);

	// Reads never grow the index.
	assert_eq!(store.len(), 1);
}

#[test]
fn test_prefix_provider_answers_its_own_name() {
	let mut store = ConditionsStore::new();
	length_provider(&mut store, "events: ");
	assert_eq!(store.get("events: "), 8);
}

#[test]
fn test_exact_provider_shadows_prefix() {
	let mut store = ConditionsStore::new();
	length_provider(&mut store, "events: ");
	store
		.provider_named("events: won")
		.on_get(|_| 100)
		.on_has(|_| true)
		.on_set(|_, _| false)
		.on_erase(|_| false);

	assert_eq!(store.get("events: won"), 100);
	assert_eq!(store.get("events: lost"), "events: lost".len() as i64);
}

#[test]
fn test_exact_entry_between_prefix_and_key_blocks_prefix() {
	let mut store: ConditionsStore = [("events: a", 5)].into_iter().collect();
	length_provider(&mut store, "events: ");

	// "events: a" is now the nearest predecessor of "events: b" and is not a provider.
	assert_eq!(store.get("events: a"), 5);
	assert_eq!(store.get("events: b"), 0);
	assert_eq!(store.get("events: 0"), "events: 0".len() as i64);
}

#[test]
fn test_set_and_erase_delegate_to_provider() {
	let mut store = ConditionsStore::new();
	length_provider(&mut store, "derived: ");
	assert!(!store.set("derived: x", 4));
	assert!(!store.erase("derived: x"));
	assert!(!store.add("derived: x", 1));
	assert_eq!(store.primary_len(), 0);
}

#[test]
fn test_has_get_skips_value_when_provider_denies() {
	let mut store = ConditionsStore::new();
	let reads = Rc::new(Cell::new(0));
	let counted = reads.clone();
	store
		.provider_prefixed("maybe: ")
		.on_get(move |_| {
			counted.set(counted.get() + 1);
			42
		})
		.on_has(|key| key.ends_with("yes"));

	assert_eq!(store.has_get("maybe: no"), (false, 0));
	assert_eq!(reads.get(), 0);
	assert_eq!(store.has_get("maybe: yes"), (true, 42));
	assert_eq!(reads.get(), 1);
}

#[test]
fn test_compound_add_through_provider() {
	let mut once = ConditionsStore::new();
	let single = counter_provider(&mut once, "kills");
	assert!(once.add("kills", 6));

	let mut twice = ConditionsStore::new();
	let double = counter_provider(&mut twice, "kills");
	assert!(twice.add("kills", 3));
	assert!(twice.add("kills", 3));

	assert_eq!(single.get(), 6);
	assert_eq!(double.get(), single.get());
	assert_eq!(twice.get("kills"), 6);
}

#[test]
fn test_provider_erase_result_propagates() {
	let mut store = ConditionsStore::new();
	let counter = counter_provider(&mut store, "kills");
	store.set("kills", 9);
	assert!(store.erase("kills"));
	assert_eq!(counter.get(), 0);
	// The delegated entry itself stays in the index.
	assert!(store.lookup("kills").is_some_and(Entry::is_derived));
}

#[test]
fn test_registering_replaces_inline_value() {
	let mut store: ConditionsStore = [("kills", 12)].into_iter().collect();
	let counter = counter_provider(&mut store, "kills");
	assert_eq!(store.get("kills"), 0);
	store.set("kills", 3);
	assert_eq!(counter.get(), 3);
	assert_eq!(store.primary_len(), 0);
}

#[test]
fn test_reregistering_returns_same_provider() {
	let mut store = ConditionsStore::new();
	store.provider_prefixed("p: ").on_get(|_| 1);
	let again = store.provider_named("p: ");
	assert!(again.is_prefix());
	again.on_get(|_| 2);
	assert_eq!(store.providers().len(), 1);
	assert_eq!(store.get("p: x"), 2);
}

#[test]
fn test_entry_vivifies_inline_zero() {
	let mut store = ConditionsStore::new();
	{
		let entry = store.entry("fresh");
		assert!(!entry.is_derived());
		assert_eq!(entry.value(), 0);
	}
	assert!(store.has("fresh"));
	assert_eq!(store.len(), 1);
}

#[test]
fn test_entry_inline_mutations() {
	let mut store = ConditionsStore::new();
	let mut entry = store.entry("x");
	assert!(entry.assign(10));
	assert!(entry.increment());
	assert!(entry.add(5));
	assert!(entry.sub(2));
	assert!(entry.decrement());
	assert_eq!(entry.value(), 13);
	assert_eq!(store.get("x"), 13);
}

#[test]
fn test_entry_materializes_prefix_delegate() {
	let mut store = ConditionsStore::new();
	let calls = length_provider(&mut store, "events: ");
	{
		let entry = store.entry("events: abc");
		assert!(entry.is_derived());
		assert_eq!(entry.key(), "events: abc");
		assert_eq!(entry.value(), 11);
	}
	assert_eq!(store.len(), 2);
	assert_eq!(calls.borrow().last().map(String::as_str), Some("events: abc"));

	// The materialized entry still lets later keys reach the prefix provider.
	assert_eq!(store.get("events: abd"), 11);
	assert_eq!(store.primary_len(), 0);
}

#[test]
fn test_entry_mutations_route_through_provider() {
	let mut store = ConditionsStore::new();
	let counter = counter_provider(&mut store, "kills");
	let mut entry = store.entry("kills");
	assert!(entry.assign(4));
	assert!(entry.increment());
	assert!(entry.add(10));
	assert!(entry.sub(3));
	assert!(entry.decrement());
	assert_eq!(counter.get(), 11);
	assert_eq!(entry.value(), 11);
}

#[test]
fn test_entry_prefix_delegate_passes_full_key_to_set() {
	let mut store = ConditionsStore::new();
	let written = Rc::new(RefCell::new(BTreeMap::new()));
	let (r, w) = (written.clone(), written.clone());
	store
		.provider_prefixed("tally: ")
		.on_get(move |key| r.borrow().get(key).copied().unwrap_or(0))
		.on_set(move |key, v| {
			w.borrow_mut().insert(key.to_owned(), v);
			true
		});

	store.entry("tally: red").add(3);
	store.entry("tally: red").increment();
	store.entry("tally: blue").assign(7);

	assert_eq!(written.borrow().get("tally: red"), Some(&4));
	assert_eq!(store.get("tally: blue"), 7);
}

#[test]
fn test_missing_callback_is_typed_error() {
	let mut store = ConditionsStore::new();
	store.provider_named("half wired").on_get(|_| 5);

	assert_eq!(store.try_get("half wired"), Ok(5));
	assert_eq!(
		store.try_has("half wired"),
		Err(ConditionError::MissingCallback {
			provider: "half wired".into(),
			slot: CallbackSlot::Has,
		})
	);
	assert!(matches!(
		store.try_set("half wired", 1),
		Err(ConditionError::MissingCallback { slot: CallbackSlot::Set, .. })
	));
	assert!(matches!(
		store.try_erase("half wired"),
		Err(ConditionError::MissingCallback { slot: CallbackSlot::Erase, .. })
	));

	// The infallible forms fall back to neutral results.
	assert!(!store.has("half wired"));
	assert_eq!(store.has_get("half wired"), (false, 0));
	assert!(!store.set("half wired", 1));
	assert!(!store.erase("half wired"));
}

#[test]
fn test_primaries_skip_derived() {
	let mut store: ConditionsStore = [("a", 1), ("b", 2)].into_iter().collect();
	counter_provider(&mut store, "c");
	let items: Vec<_> = store.primaries().collect();
	assert_eq!(items, [("a", 1), ("b", 2)]);
}

#[test]
fn test_primaries_skip_leading_and_interleaved_derived() {
	let mut store: ConditionsStore = [("b", 2), ("d", 4)].into_iter().collect();
	counter_provider(&mut store, "a");
	counter_provider(&mut store, "c");
	counter_provider(&mut store, "e");
	let items: Vec<_> = store.primaries().collect();
	assert_eq!(items, [("b", 2), ("d", 4)]);
	assert_eq!(store.primary_len(), 2);
}

#[test]
fn test_primaries_from_lower_bound() {
	let store: ConditionsStore = [("apple", 1), ("banana", 2), ("cherry", 3)].into_iter().collect();
	let from_b: Vec<_> = store.primaries_from("b").collect();
	assert_eq!(from_b, [("banana", 2), ("cherry", 3)]);
	let exact: Vec<_> = store.primaries_from("cherry").map(|(k, _)| k).collect();
	assert_eq!(exact, ["cherry"]);
	assert!(store.primaries_from("z").is_end());
}

#[test]
fn test_primaries_from_before_first_and_between_keys() {
	let store: ConditionsStore = [("m", 1), ("p", 2)].into_iter().collect();
	assert_eq!(store.primaries_from("").collect::<Vec<_>>(), [("m", 1), ("p", 2)]);
	assert_eq!(store.primaries_from("n").collect::<Vec<_>>(), [("p", 2)]);
	assert!(store.primaries_from("p\u{0}") == store.primaries_end());
}

#[test]
fn test_lookup_misses_outside_prefix_range() {
	let mut store: ConditionsStore = [("m", 1)].into_iter().collect();
	store.provider_prefixed("ships: ").on_get(|_| 7);

	// Nothing sorts at or before "a".
	assert!(store.lookup("a").is_none());
	assert_eq!(store.get("a"), 0);
	// Nearest predecessor is the prefix entry, which does not cover "shipz".
	assert!(store.lookup("shipz").is_none());
	assert!(store.lookup("ships").is_none());
	assert_eq!(store.get("ships: Falcon"), 7);
	assert!(store.lookup("mm").is_none());
	assert_eq!(store.lookup("m"), Some(&Entry::Inline(1)));
}

#[test]
fn test_primary_iter_equality_by_position() {
	let mut store: ConditionsStore = [("a", 1), ("c", 3)].into_iter().collect();
	counter_provider(&mut store, "b");

	let mut begin = store.primaries();
	let seek = store.primaries_from("a");
	assert!(begin == seek);

	begin.next();
	// Seeking onto the derived "b" skips forward to the same position as advancing past "a".
	assert!(begin == store.primaries_from("b"));
	assert_eq!(begin.peek(), Some(("c", 3)));

	begin.next();
	assert!(begin == store.primaries_end());
	assert!(begin.is_end());
	assert_eq!(begin.next(), None);
}

#[test]
fn test_clear_drops_entries_and_providers() {
	let mut store: ConditionsStore = [("a", 1)].into_iter().collect();
	length_provider(&mut store, "p: ");
	store.clear();
	assert!(store.is_empty());
	assert!(store.providers().is_empty());
	assert_eq!(store.get("p: x"), 0);
	assert!(store.set("p: x", 2));
	assert_eq!(store.primary_len(), 1);
}

#[test]
fn test_construct_from_map_and_pairs() {
	let map = BTreeMap::from([("x".to_string(), 1), ("y".to_string(), 2)]);
	let store = ConditionsStore::from(map);
	assert_eq!(store.get("y"), 2);

	let mut store: ConditionsStore = vec![("k", 1), ("k", 5)].into_iter().collect();
	assert_eq!(store.get("k"), 5);
	store.extend([("k".to_string(), 8)]);
	assert_eq!(store.get("k"), 8);
}

proptest! {
	#[test]
	fn prop_unset_keys_read_zero(key in "\\PC{0,16}", others in proptest::collection::vec("[a-z]{1,6}", 0..8)) {
		let mut store = ConditionsStore::new();
		for other in others.iter().filter(|o| **o != key) {
			store.set(other, 1);
		}
		if !others.contains(&key) {
			prop_assert_eq!(store.get(&key), 0);
			prop_assert!(!store.has(&key));
		}
	}

	#[test]
	fn prop_set_then_get(key in "\\PC{0,16}", value in any::<i64>()) {
		let mut store = ConditionsStore::new();
		prop_assert!(store.set(&key, value));
		prop_assert_eq!(store.get(&key), value);
		prop_assert!(store.has(&key));
	}

	#[test]
	fn prop_primaries_sorted_and_complete(pairs in proptest::collection::btree_map("[a-z]{0,6}", any::<i64>(), 0..32)) {
		let store = ConditionsStore::from(pairs.clone());
		let items: Vec<(String, i64)> = store.primaries().map(|(k, v)| (k.to_owned(), v)).collect();
		let expected: Vec<(String, i64)> = pairs.into_iter().collect();
		prop_assert_eq!(items, expected);
	}
}
