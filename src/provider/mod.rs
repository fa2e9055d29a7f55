//! The factory: registration, resolution and introspection.
//!
//! [`Factory`] is the container. Registrations go in through
//! [`add`](Factory::add), [`add_keyed`](Factory::add_keyed),
//! [`add_candidate`](Factory::add_candidate) and [`add_all`](Factory::add_all);
//! instances come out through the [`Resolver`](crate::Resolver) methods, which
//! delegate to each registration's lifetime manager.

use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::collection::{Item, ItemDetail, ItemList, Registrar};
use crate::config::FactoryOptions;
use crate::descriptors::{BindingDescriptor, TypeDescriptor};
use crate::error::{DiError, DiResult};
use crate::internal::with_resolution_stack;
use crate::lifetime::SingletonLifetimeManager;
use crate::logging::{render, ConfigLogger, TracingConfigLogger};
use crate::registration::{AnyArc, Candidate, CandidateSet, Implementation, Implements};
use crate::traits::{Locator, ResolverCore};

pub mod context;
pub use context::ResolverContext;

/// The inversion-of-control container.
///
/// A factory is a cheap handle: clones share one registry. Registration and
/// resolution both take `&self`; registration is expected to finish before
/// concurrent resolution starts, though neither will corrupt the registry if
/// they overlap.
///
/// Every factory is born with one binding: `dyn ResolverCore` resolves to the
/// factory itself, through a singleton seeded at construction. Components can
/// therefore take the resolver as an ordinary constructor parameter.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{implements, Constructor, Factory, Injectable, Resolver};
/// use std::sync::Arc;
///
/// trait Engine: Send + Sync {
///     fn start(&self) -> &'static str;
/// }
/// trait Vehicle: Send + Sync {
///     fn drive(&self) -> &'static str;
/// }
///
/// #[derive(Default)]
/// struct V8;
/// impl Engine for V8 {
///     fn start(&self) -> &'static str { "vroom" }
/// }
/// impl Injectable for V8 {
///     fn constructors() -> Vec<Constructor<Self>> { vec![Constructor::from_default()] }
/// }
/// implements!(V8 => dyn Engine);
///
/// struct Car { engine: Arc<dyn Engine> }
/// impl Vehicle for Car {
///     fn drive(&self) -> &'static str { self.engine.start() }
/// }
/// impl Injectable for Car {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::new(|args| Ok(Car { engine: args.take::<dyn Engine>()? }))
///             .param::<dyn Engine>()]
///     }
/// }
/// implements!(Car => dyn Vehicle);
///
/// let factory = Factory::new();
/// factory.add::<dyn Engine, V8>().unwrap().as_singleton();
/// factory.add::<dyn Vehicle, Car>().unwrap();
///
/// let car = factory.get::<dyn Vehicle>().unwrap().unwrap();
/// assert_eq!(car.drive(), "vroom");
/// ```
#[derive(Clone)]
pub struct Factory {
    inner: Arc<FactoryInner>,
}

pub(crate) struct FactoryInner {
    items: RwLock<Vec<Arc<Item>>>,
    options: FactoryOptions,
}

impl Factory {
    pub fn new() -> Self {
        Self::with_options(FactoryOptions::default())
    }

    /// Creates a factory and seeds the self-registration.
    pub fn with_options(options: FactoryOptions) -> Self {
        let inner = Arc::new_cyclic(|this: &Weak<FactoryInner>| FactoryInner {
            items: RwLock::new(vec![self_registration(this.clone())]),
            options,
        });
        Self { inner }
    }

    pub fn options(&self) -> &FactoryOptions {
        &self.inner.options
    }

    /// Registers `T` for contract `C` under `T`'s fully-qualified type name.
    ///
    /// Returns the binding so the registration can be configured in the same
    /// expression, e.g. `factory.add::<dyn C, T>()?.as_singleton()`.
    pub fn add<C, T>(&self) -> DiResult<Arc<Item>>
    where
        C: ?Sized + Send + Sync + 'static,
        T: Implements<C>,
    {
        self.inner
            .register(TypeDescriptor::of::<C>(), Implementation::new::<C, T>(), None)
            .map(|(item, _)| item)
    }

    /// Registers `T` for contract `C` under `key`.
    ///
    /// A key already present under `C` leaves the existing registration,
    /// lifetime included, untouched.
    pub fn add_keyed<C, T>(&self, key: &str) -> DiResult<Arc<Item>>
    where
        C: ?Sized + Send + Sync + 'static,
        T: Implements<C>,
    {
        self.inner
            .register(TypeDescriptor::of::<C>(), Implementation::new::<C, T>(), Some(key))
            .map(|(item, _)| item)
    }

    /// Registers a candidate for `contract`, validating both at runtime.
    ///
    /// Fails with [`DiError::InvalidArgument`] when the contract is not
    /// abstract, the candidate is not concrete, or the candidate does not
    /// implement the contract. `key` defaults to the candidate's type name.
    pub fn add_candidate(&self, contract: &TypeDescriptor, candidate: &Candidate, key: Option<&str>) -> DiResult<Arc<Item>> {
        check_contract(contract)?;
        if candidate.is_abstract() {
            return Err(DiError::InvalidArgument {
                argument: "implementation",
                type_name: candidate.descriptor().name(),
                reason: "type is not concrete",
            });
        }
        let implementation = candidate.implementation_for(contract).ok_or(DiError::InvalidArgument {
            argument: "implementation",
            type_name: candidate.descriptor().name(),
            reason: "type does not implement the contract",
        })?;
        self.inner
            .register(*contract, implementation.clone(), key)
            .map(|(item, _)| item)
    }

    /// Registers every concrete candidate implementing `C`.
    pub fn add_all<C: ?Sized + 'static>(&self, candidates: &CandidateSet) -> DiResult<ItemList> {
        self.add_all_for(&TypeDescriptor::of::<C>(), candidates)
    }

    /// Registers every concrete candidate implementing `contract`, each
    /// under its type name.
    ///
    /// Abstract candidates and candidates that do not implement the contract
    /// are skipped. The returned list holds one entry per registered
    /// candidate.
    pub fn add_all_for(&self, contract: &TypeDescriptor, candidates: &CandidateSet) -> DiResult<ItemList> {
        check_contract(contract)?;

        let mut list = ItemList::new();
        for candidate in candidates {
            if candidate.is_abstract() {
                continue;
            }
            let Some(implementation) = candidate.implementation_for(contract) else {
                continue;
            };
            let (item, detail) = self.inner.register(*contract, implementation.clone(), None)?;
            list.push(item, detail);
        }

        tracing::debug!(
            contract = contract.name(),
            candidates = candidates.len(),
            registered = list.len(),
            "bulk registration complete"
        );
        Ok(list)
    }

    /// Bindings in registry order, the self-registration first.
    pub fn items(&self) -> Vec<Arc<Item>> {
        self.inner.items.read().clone()
    }

    /// Enumerates every binding with its implementations, keys and lifetimes.
    pub fn describe(&self) -> Vec<BindingDescriptor> {
        self.items()
            .iter()
            .map(|item| BindingDescriptor {
                contract: item.contract().name(),
                implementations: item.describe(),
            })
            .collect()
    }

    /// Renders the registry and hands the text to `logger`, or to
    /// [`TracingConfigLogger`] when `None`.
    pub fn log(&self, logger: Option<&dyn ConfigLogger>) {
        let message = render(&self.describe());
        match logger {
            Some(logger) => logger.log(&message),
            None => TracingConfigLogger.log(&message),
        }
    }

    /// Registration-only view, as handed to profiles.
    pub fn registrar(&self) -> Registrar<'_> {
        Registrar::new(self)
    }
}

impl Default for Factory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Factory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Factory")
            .field("items", &self.inner.items.read().len())
            .field("options", &self.inner.options)
            .finish()
    }
}

impl Locator for Factory {
    fn find_item(&self, contract: &TypeDescriptor) -> Option<Arc<Item>> {
        self.inner.find_item(contract)
    }
}

impl ResolverCore for Factory {
    fn resolve_any(&self, contract: &TypeDescriptor, key: Option<&str>) -> DiResult<Option<AnyArc>> {
        self.inner.resolve_any(contract, key)
    }

    fn resolve_all(&self, contract: &TypeDescriptor) -> DiResult<Option<Vec<AnyArc>>> {
        self.inner.resolve_all(contract)
    }
}

impl FactoryInner {
    /// Identity used to keep resolution stacks of different factories apart.
    fn id(&self) -> usize {
        self as *const FactoryInner as usize
    }

    fn register(
        &self,
        contract: TypeDescriptor,
        implementation: Implementation,
        key: Option<&str>,
    ) -> DiResult<(Arc<Item>, Arc<ItemDetail>)> {
        check_contract(&contract)?;
        check_implementation(&implementation)?;

        let key = key.map_or_else(|| implementation.type_name().to_owned(), str::to_owned);
        let item = {
            let mut items = self.items.write();
            match items.iter().find(|item| item.contract() == contract) {
                Some(item) => item.clone(),
                None => {
                    let item = Arc::new(Item::new(contract));
                    items.push(item.clone());
                    item
                }
            }
        };

        let type_name = implementation.type_name();
        let (detail, inserted) = item.add_type(key.clone(), implementation);
        if inserted {
            tracing::debug!(contract = contract.name(), implementation = type_name, key = %key, "registered");
        } else {
            tracing::trace!(contract = contract.name(), key = %key, "key already registered, keeping existing");
        }
        Ok((item, detail))
    }

    fn activate(&self, contract: &TypeDescriptor, detail: &ItemDetail) -> DiResult<AnyArc> {
        let registration = detail as *const ItemDetail as usize;
        with_resolution_stack(self.id(), registration, contract, self.options.max_depth, || {
            let context = ResolverContext::new(self, self, &self.options);
            detail.lifetime_manager().get(detail.implementation(), &context)
        })
    }
}

impl Locator for FactoryInner {
    fn find_item(&self, contract: &TypeDescriptor) -> Option<Arc<Item>> {
        self.items
            .read()
            .iter()
            .find(|item| item.contract() == *contract)
            .cloned()
    }
}

impl ResolverCore for FactoryInner {
    fn resolve_any(&self, contract: &TypeDescriptor, key: Option<&str>) -> DiResult<Option<AnyArc>> {
        check_contract(contract)?;

        let Some(item) = self.find_item(contract) else {
            tracing::trace!(contract = contract.name(), "no binding");
            return Ok(None);
        };

        let detail = match key.filter(|key| !key.trim().is_empty()) {
            Some(key) => item.detail(key),
            None => item.first_detail(),
        };
        let Some(detail) = detail else {
            tracing::trace!(contract = contract.name(), key = ?key, "no registration under key");
            return Ok(None);
        };

        self.activate(contract, &detail).map(Some)
    }

    fn resolve_all(&self, contract: &TypeDescriptor) -> DiResult<Option<Vec<AnyArc>>> {
        check_contract(contract)?;

        let Some(item) = self.find_item(contract) else {
            return Ok(None);
        };

        item.details()
            .iter()
            .map(|(_, detail)| self.activate(contract, detail))
            .collect::<DiResult<Vec<_>>>()
            .map(Some)
    }
}

/// Weak handle the factory registers as its own resolver.
///
/// A strong handle would keep the registry alive through its own binding.
struct FactoryRef {
    inner: Weak<FactoryInner>,
}

impl FactoryRef {
    fn upgrade(&self) -> DiResult<Arc<FactoryInner>> {
        self.inner.upgrade().ok_or(DiError::FactoryDropped)
    }
}

impl ResolverCore for FactoryRef {
    fn resolve_any(&self, contract: &TypeDescriptor, key: Option<&str>) -> DiResult<Option<AnyArc>> {
        self.upgrade()?.resolve_any(contract, key)
    }

    fn resolve_all(&self, contract: &TypeDescriptor) -> DiResult<Option<Vec<AnyArc>>> {
        self.upgrade()?.resolve_all(contract)
    }
}

/// Binds `dyn ResolverCore` to the factory through a pre-seeded singleton.
fn self_registration(this: Weak<FactoryInner>) -> Arc<Item> {
    let contract = TypeDescriptor::of::<dyn ResolverCore>();
    let resolver: Arc<dyn ResolverCore> = Arc::new(FactoryRef { inner: this });

    let item = Arc::new(Item::new(contract));
    item.add_type(
        std::any::type_name::<Factory>().to_owned(),
        Implementation::preseeded(contract, TypeDescriptor::of::<Factory>()),
    );
    item.set_lifetime_manager(Arc::new(SingletonLifetimeManager::with_instance(
        Arc::new(resolver) as AnyArc
    )));
    item
}

fn check_contract(contract: &TypeDescriptor) -> DiResult<()> {
    if contract.is_abstract() {
        Ok(())
    } else {
        Err(DiError::InvalidArgument {
            argument: "contract",
            type_name: contract.name(),
            reason: "type is not an abstract contract",
        })
    }
}

fn check_implementation(implementation: &Implementation) -> DiResult<()> {
    if implementation.descriptor().is_abstract() {
        Err(DiError::InvalidArgument {
            argument: "implementation",
            type_name: implementation.type_name(),
            reason: "type is not concrete",
        })
    } else {
        Ok(())
    }
}
