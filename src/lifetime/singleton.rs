use std::fmt;

use once_cell::sync::OnceCell;
use parking_lot::Mutex;

use crate::error::DiResult;
use crate::provider::ResolverContext;
use crate::registration::{AnyArc, Implementation};

use super::{create_instance, Lifetime, LifetimeManager};

/// Observable state of a [`SingletonLifetimeManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingletonState {
    /// Nothing built yet (or the last attempt failed)
    Empty,
    /// A thread is running the constructor
    Constructing,
    /// Instance memoized
    Ready,
}

/// Builds the instance once and hands out the same one afterwards.
///
/// Reads after the first construction take no lock. The first construction
/// runs under a mutex owned by this manager alone, so concurrent first
/// resolutions build exactly one instance. A failed construction leaves the
/// manager empty and the next resolution tries again.
///
/// Circular dependencies are detected per thread only. Two threads that
/// first-resolve singletons depending on each other can each hold one
/// construction mutex while waiting on the other's, and deadlock instead of
/// reporting [`DiError::Circular`](crate::DiError::Circular).
pub struct SingletonLifetimeManager {
    instance: OnceCell<AnyArc>,
    construct: Mutex<()>,
}

impl SingletonLifetimeManager {
    pub fn new() -> Self {
        Self {
            instance: OnceCell::new(),
            construct: Mutex::new(()),
        }
    }

    /// Starts directly in [`SingletonState::Ready`] with `instance`.
    ///
    /// `instance` must be stored the way resolution expects, i.e. an
    /// `Arc<Arc<C>>` for contract `C`.
    pub fn with_instance(instance: AnyArc) -> Self {
        Self {
            instance: OnceCell::with_value(instance),
            construct: Mutex::new(()),
        }
    }

    pub fn state(&self) -> SingletonState {
        if self.instance.get().is_some() {
            SingletonState::Ready
        } else if self.construct.is_locked() {
            SingletonState::Constructing
        } else {
            SingletonState::Empty
        }
    }
}

impl Default for SingletonLifetimeManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SingletonLifetimeManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingletonLifetimeManager")
            .field("state", &self.state())
            .finish()
    }
}

impl LifetimeManager for SingletonLifetimeManager {
    fn get(&self, implementation: &Implementation, context: &ResolverContext<'_>) -> DiResult<AnyArc> {
        if let Some(instance) = self.instance.get() {
            return Ok(instance.clone());
        }

        let _guard = self.construct.lock();
        if let Some(instance) = self.instance.get() {
            return Ok(instance.clone());
        }

        let created = create_instance(implementation, context)?;
        tracing::trace!(implementation = implementation.type_name(), "singleton constructed");
        Ok(self.instance.get_or_init(|| created).clone())
    }

    fn lifetime(&self) -> Lifetime {
        Lifetime::Singleton
    }
}
