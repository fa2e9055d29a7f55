//! Lifetime strategies and constructor injection.
//!
//! A [`LifetimeManager`] decides whether a resolution reuses an instance or
//! builds a new one. Building always goes through [`create_instance`], the
//! constructor-injection routine every strategy shares.

use std::fmt;

#[cfg(feature = "config")]
use serde::Serialize;

use crate::descriptors::TypeDescriptor;
use crate::error::{DiError, DiResult};
use crate::provider::ResolverContext;
use crate::registration::{AnyArc, Implementation};
use crate::traits::{Locator, ResolverCore};

mod singleton;
mod transient;

pub use singleton::{SingletonLifetimeManager, SingletonState};
pub use transient::TransientLifetimeManager;

/// Identity of a lifetime strategy, as reported for introspection.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Lifetime, LifetimeManager, SingletonLifetimeManager, TransientLifetimeManager};
///
/// assert_eq!(TransientLifetimeManager.lifetime(), Lifetime::Transient);
/// assert_eq!(SingletonLifetimeManager::new().lifetime(), Lifetime::Singleton);
/// assert_eq!(Lifetime::Singleton.to_string(), "Singleton");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(Serialize))]
pub enum Lifetime {
    /// New instance per resolution, never cached
    Transient,
    /// Single instance per registration, cached forever
    Singleton,
    /// User-supplied strategy, identified by its type name
    Custom(&'static str),
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifetime::Transient => f.write_str("Transient"),
            Lifetime::Singleton => f.write_str("Singleton"),
            Lifetime::Custom(name) => f.write_str(name),
        }
    }
}

/// Produces or reuses instances of one registered implementation.
///
/// Each registration owns its own manager, so a stateful manager (such as a
/// singleton) caches per registration. Custom strategies build new instances
/// with [`create_instance`].
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{
///     create_instance, AnyArc, DiResult, Implementation, Lifetime, LifetimeManager,
///     ResolverContext,
/// };
/// use std::sync::atomic::{AtomicUsize, Ordering};
///
/// /// Transient strategy that counts activations.
/// #[derive(Default)]
/// struct Counting {
///     created: AtomicUsize,
/// }
///
/// impl LifetimeManager for Counting {
///     fn get(&self, implementation: &Implementation, context: &ResolverContext<'_>) -> DiResult<AnyArc> {
///         self.created.fetch_add(1, Ordering::SeqCst);
///         create_instance(implementation, context)
///     }
/// }
///
/// assert!(matches!(Counting::default().lifetime(), Lifetime::Custom(name) if name.ends_with("Counting")));
/// ```
pub trait LifetimeManager: Send + Sync {
    /// Returns an instance of `implementation`, erased as described on
    /// [`AnyArc`].
    fn get(&self, implementation: &Implementation, context: &ResolverContext<'_>) -> DiResult<AnyArc>;

    /// Strategy identity; custom strategies report their type name.
    fn lifetime(&self) -> Lifetime {
        Lifetime::Custom(std::any::type_name::<Self>())
    }
}

/// Constructs a new instance of `implementation`, injecting its constructor
/// parameters.
///
/// Only the first declared constructor is inspected. Its parameters are
/// resolved in order; each must be an abstract contract that has a binding.
/// As soon as one parameter cannot be injected the collected arguments are
/// discarded and the implementation is activated with zero arguments, which
/// fails with [`DiError::ConstructorArity`] unless the type also declares a
/// parameterless constructor. With
/// [`FactoryOptions::strict_injection`](crate::FactoryOptions::strict_injection)
/// the routine fails with [`DiError::Unresolvable`] instead.
pub fn create_instance(implementation: &Implementation, context: &ResolverContext<'_>) -> DiResult<AnyArc> {
    let constructor = implementation
        .first_constructor()
        .ok_or(DiError::NoConstructor(implementation.type_name()))?;

    let mut arguments = Vec::with_capacity(constructor.arity());
    for parameter in constructor.parameters() {
        match inject_parameter(parameter, context)? {
            Some(instance) => arguments.push(instance),
            None => {
                if context.options().strict_injection {
                    return Err(DiError::Unresolvable {
                        implementation: implementation.type_name(),
                        parameter: parameter.name(),
                    });
                }
                tracing::trace!(
                    implementation = implementation.type_name(),
                    parameter = parameter.name(),
                    "parameter not injectable, activating without arguments"
                );
                arguments.clear();
                break;
            }
        }
    }

    implementation.activate(arguments)
}

fn inject_parameter(parameter: &TypeDescriptor, context: &ResolverContext<'_>) -> DiResult<Option<AnyArc>> {
    if !parameter.is_abstract() {
        return Ok(None);
    }
    if context.find_item(parameter).is_none() {
        return Ok(None);
    }
    context.resolve_any(parameter, None)
}
