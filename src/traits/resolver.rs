//! Resolver and locator traits.

use std::sync::Arc;

use crate::collection::Item;
use crate::descriptors::TypeDescriptor;
use crate::error::DiResult;
use crate::registration::{cast_instance, AnyArc};

/// Finds the binding registered for a contract.
///
/// Used by constructor injection to decide whether a parameter can be
/// satisfied before resolving it.
pub trait Locator: Send + Sync {
    /// Returns the item whose contract is exactly `contract`.
    fn find_item(&self, contract: &TypeDescriptor) -> Option<Arc<Item>>;
}

/// Core resolver trait for object-safe resolution.
///
/// Instances come back erased as described on [`AnyArc`]; most callers want
/// the typed methods of [`Resolver`] instead. The factory registers itself
/// under `dyn ResolverCore`, so components can take the resolver as a
/// constructor parameter like any other contract.
pub trait ResolverCore: Send + Sync {
    /// Resolves one instance of `contract`.
    ///
    /// A missing, empty or whitespace-only `key` selects the first key
    /// registered for the contract.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(_))` - the instance produced by the registration's lifetime manager
    /// * `Ok(None)` - no binding for the contract, or no registration under `key`
    /// * `Err(DiError)` - invalid contract or activation failure
    fn resolve_any(&self, contract: &TypeDescriptor, key: Option<&str>) -> DiResult<Option<AnyArc>>;

    /// Resolves one instance per registration of `contract`, in
    /// registration order; `Ok(None)` when the contract has no binding.
    fn resolve_all(&self, contract: &TypeDescriptor) -> DiResult<Option<Vec<AnyArc>>>;
}

/// Typed resolution on top of [`ResolverCore`].
///
/// Implemented for every resolver, including `dyn ResolverCore`.
///
/// # Examples
///
/// ```
/// use ferrous_ioc::{implements, Constructor, Factory, Injectable, Resolver};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// #[derive(Default)]
/// struct English;
/// impl Greeter for English {
///     fn greet(&self) -> String { "hello".into() }
/// }
/// impl Injectable for English {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::from_default()]
///     }
/// }
/// implements!(English => dyn Greeter);
///
/// let factory = Factory::new();
/// factory.add_keyed::<dyn Greeter, English>("en").unwrap();
///
/// let greeter: Arc<dyn Greeter> = factory.get::<dyn Greeter>().unwrap().unwrap();
/// assert_eq!(greeter.greet(), "hello");
/// assert!(factory.get_keyed::<dyn Greeter>("fr").unwrap().is_none());
/// assert_eq!(factory.get_all::<dyn Greeter>().unwrap().unwrap().len(), 1);
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves contract `C` using its first registered key.
    fn get<C>(&self) -> DiResult<Option<Arc<C>>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.resolve_any(&TypeDescriptor::of::<C>(), None)?
            .map(|instance| cast_instance::<C>(&instance))
            .transpose()
    }

    /// Resolves contract `C` registered under `key`.
    fn get_keyed<C>(&self, key: &str) -> DiResult<Option<Arc<C>>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.resolve_any(&TypeDescriptor::of::<C>(), Some(key))?
            .map(|instance| cast_instance::<C>(&instance))
            .transpose()
    }

    /// Resolves every registration of contract `C`.
    ///
    /// `Ok(None)` means the contract was never registered, which is distinct
    /// from an empty list.
    fn get_all<C>(&self) -> DiResult<Option<Vec<Arc<C>>>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        self.resolve_all(&TypeDescriptor::of::<C>())?
            .map(|instances| instances.iter().map(cast_instance::<C>).collect::<DiResult<Vec<_>>>())
            .transpose()
    }
}

impl<R: ResolverCore + ?Sized> Resolver for R {}
