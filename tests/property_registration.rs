/// Property-based tests for registration
///
/// These tests use proptest to generate random key sequences and verify
/// invariants that hold for any order of keyed registrations.
use ferrous_ioc::{implements, Constructor, Factory, Injectable, Lifetime, Locator, Resolver, TypeDescriptor};
use proptest::prelude::*;
use std::collections::HashSet;

trait Plugin: Send + Sync {
    fn id(&self) -> &'static str;
}

#[derive(Default)]
struct Alpha;
impl Plugin for Alpha {
    fn id(&self) -> &'static str {
        "alpha"
    }
}
impl Injectable for Alpha {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::from_default()]
    }
}
implements!(Alpha => dyn Plugin);

#[derive(Default)]
struct Beta;
impl Plugin for Beta {
    fn id(&self) -> &'static str {
        "beta"
    }
}
impl Injectable for Beta {
    fn constructors() -> Vec<Constructor<Self>> {
        vec![Constructor::from_default()]
    }
}
implements!(Beta => dyn Plugin);

fn register(factory: &Factory, key: &str, alpha: bool) {
    if alpha {
        factory.add_keyed::<dyn Plugin, Alpha>(key).unwrap();
    } else {
        factory.add_keyed::<dyn Plugin, Beta>(key).unwrap();
    }
}

// Property: get_all yields one instance per distinct key, and each key keeps its first implementation
proptest! {
    #[test]
    fn distinct_keys_determine_registrations(regs in prop::collection::vec(("[a-d]", any::<bool>()), 1..20)) {
        let factory = Factory::new();
        for (key, alpha) in &regs {
            register(&factory, key, *alpha);
        }

        let mut seen = HashSet::new();
        let expected: Vec<(&str, &'static str)> = regs
            .iter()
            .filter(|(key, _)| seen.insert(key.clone()))
            .map(|(key, alpha)| (key.as_str(), if *alpha { "alpha" } else { "beta" }))
            .collect();

        let all = factory.get_all::<dyn Plugin>().unwrap().unwrap();
        prop_assert_eq!(all.len(), expected.len());
        for ((key, id), plugin) in expected.iter().zip(all.iter()) {
            prop_assert_eq!(plugin.id(), *id);
            let keyed = factory.get_keyed::<dyn Plugin>(key).unwrap().unwrap();
            prop_assert_eq!(keyed.id(), *id);
        }

        // Key-less resolution always lands on the first key
        let first = factory.get::<dyn Plugin>().unwrap().unwrap();
        prop_assert_eq!(first.id(), expected[0].1);
    }
}

// Property: singleton configuration only ever touches the latest newly-added key
proptest! {
    #[test]
    fn as_singleton_touches_latest_added_key(keys in prop::collection::vec("[a-f]", 1..12)) {
        let factory = Factory::new();
        let mut latest_new = None;
        for key in &keys {
            let item = factory.add_keyed::<dyn Plugin, Alpha>(key).unwrap();
            if item.len() > latest_new.as_ref().map_or(0, |(_, len)| *len) {
                latest_new = Some((key.clone(), item.len()));
            }
        }
        let item = factory.find_item(&TypeDescriptor::of::<dyn Plugin>()).unwrap();
        item.as_singleton();

        let (latest, _) = latest_new.unwrap();
        for key in item.keys() {
            let expected = if key == latest { Lifetime::Singleton } else { Lifetime::Transient };
            prop_assert_eq!(item.detail(&key).unwrap().lifetime(), expected);
        }
    }
}
