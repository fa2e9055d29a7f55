//! Binding store.
//!
//! An [`Item`] is the binding for one contract: an insertion-ordered list of
//! keyed [`ItemDetail`]s, each pairing an implementation with its own
//! lifetime manager. [`ItemList`] groups the items touched by a bulk
//! registration so one lifetime strategy can be applied to all of them.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::descriptors::{ImplementationDescriptor, TypeDescriptor};
use crate::lifetime::{Lifetime, LifetimeManager, SingletonLifetimeManager, TransientLifetimeManager};
use crate::registration::Implementation;

pub mod module_system;
pub use module_system::*;

/// One implementation registered under a contract.
///
/// Starts out transient; the owning [`Item`] swaps the manager when the
/// registration is configured.
pub struct ItemDetail {
    implementation: Implementation,
    manager: RwLock<Arc<dyn LifetimeManager>>,
}

impl ItemDetail {
    pub(crate) fn new(implementation: Implementation) -> Self {
        Self {
            implementation,
            manager: RwLock::new(Arc::new(TransientLifetimeManager)),
        }
    }

    pub fn implementation(&self) -> &Implementation {
        &self.implementation
    }

    pub fn type_name(&self) -> &'static str {
        self.implementation.type_name()
    }

    pub fn lifetime(&self) -> Lifetime {
        self.manager.read().lifetime()
    }

    /// The attached manager. Cloned out so callers never hold the lock while
    /// resolving.
    pub fn lifetime_manager(&self) -> Arc<dyn LifetimeManager> {
        self.manager.read().clone()
    }

    pub(crate) fn set_lifetime_manager(&self, manager: Arc<dyn LifetimeManager>) {
        *self.manager.write() = manager;
    }
}

impl fmt::Debug for ItemDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemDetail")
            .field("type", &self.type_name())
            .field("lifetime", &self.lifetime())
            .finish()
    }
}

#[derive(Default)]
struct ItemState {
    details: Vec<(String, Arc<ItemDetail>)>,
    current: Option<Arc<ItemDetail>>,
}

/// The binding for one contract.
///
/// Lifetime configuration ([`as_singleton`](Self::as_singleton),
/// [`set_lifetime_to`](Self::set_lifetime_to)) always applies to the detail
/// most recently *added* to this item, not to every detail and not to a
/// detail whose key was merely registered again.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{implements, Constructor, Factory, Injectable, Lifetime};
///
/// trait Shape: Send + Sync {}
///
/// #[derive(Default)]
/// struct Circle;
/// impl Shape for Circle {}
/// impl Injectable for Circle {
///     fn constructors() -> Vec<Constructor<Self>> { vec![Constructor::from_default()] }
/// }
/// implements!(Circle => dyn Shape);
///
/// #[derive(Default)]
/// struct Square;
/// impl Shape for Square {}
/// impl Injectable for Square {
///     fn constructors() -> Vec<Constructor<Self>> { vec![Constructor::from_default()] }
/// }
/// implements!(Square => dyn Shape);
///
/// let factory = Factory::new();
/// factory.add_keyed::<dyn Shape, Circle>("circle").unwrap();
/// let item = factory.add_keyed::<dyn Shape, Square>("square").unwrap();
/// item.as_singleton();
///
/// assert_eq!(item.keys(), vec!["circle".to_string(), "square".to_string()]);
/// assert_eq!(item.detail("circle").unwrap().lifetime(), Lifetime::Transient);
/// assert_eq!(item.detail("square").unwrap().lifetime(), Lifetime::Singleton);
/// ```
pub struct Item {
    contract: TypeDescriptor,
    state: RwLock<ItemState>,
}

impl Item {
    pub(crate) fn new(contract: TypeDescriptor) -> Self {
        Self {
            contract,
            state: RwLock::new(ItemState::default()),
        }
    }

    pub fn contract(&self) -> TypeDescriptor {
        self.contract
    }

    /// Registration keys in insertion order.
    pub fn keys(&self) -> Vec<String> {
        self.state.read().details.iter().map(|(key, _)| key.clone()).collect()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.state.read().details.iter().any(|(k, _)| k == key)
    }

    pub fn detail(&self, key: &str) -> Option<Arc<ItemDetail>> {
        self.state
            .read()
            .details
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, detail)| detail.clone())
    }

    /// Detail under the first-inserted key, the default for key-less
    /// resolution.
    pub fn first_detail(&self) -> Option<Arc<ItemDetail>> {
        self.state.read().details.first().map(|(_, detail)| detail.clone())
    }

    /// All details in insertion order.
    pub fn details(&self) -> Vec<(String, Arc<ItemDetail>)> {
        self.state.read().details.clone()
    }

    pub fn len(&self) -> usize {
        self.state.read().details.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().details.is_empty()
    }

    /// Detail that lifetime configuration currently targets.
    pub fn current_detail(&self) -> Option<Arc<ItemDetail>> {
        self.state.read().current.clone()
    }

    pub fn current_lifetime(&self) -> Option<Lifetime> {
        self.current_detail().map(|detail| detail.lifetime())
    }

    /// Makes the current detail a singleton.
    pub fn as_singleton(&self) {
        self.set_lifetime_manager(Arc::new(SingletonLifetimeManager::new()));
    }

    /// Attaches a custom lifetime manager to the current detail.
    pub fn set_lifetime_to<M: LifetimeManager + 'static>(&self, manager: M) {
        self.set_lifetime_manager(Arc::new(manager));
    }

    /// Attaches a shared lifetime manager to the current detail.
    ///
    /// Does nothing while the item has no detail.
    pub fn set_lifetime_manager(&self, manager: Arc<dyn LifetimeManager>) {
        if let Some(detail) = self.current_detail() {
            tracing::debug!(
                contract = self.contract.name(),
                implementation = detail.type_name(),
                lifetime = %manager.lifetime(),
                "lifetime configured"
            );
            detail.set_lifetime_manager(manager);
        }
    }

    /// Adds `implementation` under `key` unless the key is taken.
    ///
    /// Returns the detail registered under `key` and whether it was inserted
    /// by this call. Only an insertion moves the current detail.
    pub(crate) fn add_type(&self, key: String, implementation: Implementation) -> (Arc<ItemDetail>, bool) {
        let mut state = self.state.write();
        if let Some((_, existing)) = state.details.iter().find(|(k, _)| *k == key) {
            return (existing.clone(), false);
        }
        let detail = Arc::new(ItemDetail::new(implementation));
        state.details.push((key, detail.clone()));
        state.current = Some(detail.clone());
        (detail, true)
    }

    pub(crate) fn describe(&self) -> Vec<ImplementationDescriptor> {
        self.state
            .read()
            .details
            .iter()
            .map(|(key, detail)| ImplementationDescriptor {
                key: key.clone(),
                type_name: detail.type_name(),
                lifetime: detail.lifetime(),
            })
            .collect()
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Item")
            .field("contract", &self.contract)
            .field("details", &self.state.read().details)
            .finish()
    }
}

/// Registrations produced by one bulk registration.
///
/// Each entry pairs the binding with the detail registered for one
/// candidate, so bulk configuration reaches every registered implementation
/// even when several share a contract.
#[derive(Debug, Default, Clone)]
pub struct ItemList {
    entries: Vec<(Arc<Item>, Arc<ItemDetail>)>,
}

impl ItemList {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, item: Arc<Item>, detail: Arc<ItemDetail>) {
        self.entries.push((item, detail));
    }

    /// Bindings in registration order, one per registered candidate.
    pub fn items(&self) -> Vec<Arc<Item>> {
        self.entries.iter().map(|(item, _)| item.clone()).collect()
    }

    /// Details in registration order, one per registered candidate.
    pub fn details(&self) -> Vec<Arc<ItemDetail>> {
        self.entries.iter().map(|(_, detail)| detail.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Makes every listed registration a singleton, each with its own cache.
    pub fn as_singleton(&self) {
        self.set_lifetime_with(SingletonLifetimeManager::new);
    }

    /// Attaches a fresh `M` to every listed registration.
    pub fn set_lifetime_to<M>(&self)
    where
        M: LifetimeManager + Default + 'static,
    {
        self.set_lifetime_with(M::default);
    }

    /// Attaches a manager built by `make` to every listed registration.
    pub fn set_lifetime_with<M, F>(&self, make: F)
    where
        M: LifetimeManager + 'static,
        F: Fn() -> M,
    {
        for (_, detail) in &self.entries {
            detail.set_lifetime_manager(Arc::new(make()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiResult;
    use crate::provider::ResolverContext;
    use crate::registration::{AnyArc, Constructor, Injectable};
    use crate::{create_instance, implements};

    trait TestClass: Send + Sync {}

    #[derive(Default)]
    struct First;
    impl TestClass for First {}
    impl Injectable for First {
        fn constructors() -> Vec<Constructor<Self>> {
            vec![Constructor::from_default()]
        }
    }
    implements!(First => dyn TestClass);

    #[derive(Default)]
    struct Second;
    impl TestClass for Second {}
    impl Injectable for Second {
        fn constructors() -> Vec<Constructor<Self>> {
            vec![Constructor::from_default()]
        }
    }
    implements!(Second => dyn TestClass);

    #[derive(Default)]
    struct TestLifetimeManager;
    impl LifetimeManager for TestLifetimeManager {
        fn get(&self, implementation: &Implementation, context: &ResolverContext<'_>) -> DiResult<AnyArc> {
            create_instance(implementation, context)
        }
    }

    fn item_with(key: &str, implementation: Implementation) -> Arc<Item> {
        let item = Arc::new(Item::new(TypeDescriptor::of::<dyn TestClass>()));
        item.add_type(key.to_string(), implementation);
        item
    }

    fn list() -> ItemList {
        let mut list = ItemList::new();
        for item in [
            item_with("", Implementation::new::<dyn TestClass, First>()),
            item_with("", Implementation::new::<dyn TestClass, Second>()),
        ] {
            let detail = item.current_detail().unwrap();
            list.push(item, detail);
        }
        list
    }

    #[test]
    fn default_configures_all_items_as_transient() {
        for item in list().items() {
            assert_eq!(item.current_lifetime(), Some(Lifetime::Transient));
        }
    }

    #[test]
    fn as_singleton_configures_all_items() {
        let list = list();
        list.as_singleton();
        for item in list.items() {
            assert_eq!(item.current_lifetime(), Some(Lifetime::Singleton));
        }
    }

    #[test]
    fn set_lifetime_to_configures_all_items() {
        let list = list();
        list.set_lifetime_to::<TestLifetimeManager>();
        for detail in list.details() {
            assert!(matches!(
                detail.lifetime(),
                Lifetime::Custom(name) if name.ends_with("TestLifetimeManager")
            ));
        }
    }

    #[test]
    fn readding_a_key_keeps_detail_and_current_pointer() {
        let item = Item::new(TypeDescriptor::of::<dyn TestClass>());
        let (first, inserted) = item.add_type("a".into(), Implementation::new::<dyn TestClass, First>());
        assert!(inserted);
        item.add_type("b".into(), Implementation::new::<dyn TestClass, Second>());

        let (again, inserted) = item.add_type("a".into(), Implementation::new::<dyn TestClass, Second>());
        assert!(!inserted);
        assert!(Arc::ptr_eq(&first, &again));
        assert!(again.type_name().ends_with("First"));
        assert!(item.current_detail().unwrap().type_name().ends_with("Second"));
    }

    #[test]
    fn configuration_without_details_is_ignored() {
        let item = Item::new(TypeDescriptor::of::<dyn TestClass>());
        item.as_singleton();
        assert!(item.is_empty());
        assert_eq!(item.current_lifetime(), None);
    }
}
