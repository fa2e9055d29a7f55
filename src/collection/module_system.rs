//! Profile system for modular registration.
//!
//! Registrations are grouped into [`FactoryProfile`]s and applied to a
//! factory through [`FactoryBuilder`], optionally behind a condition.

use std::sync::Arc;

use crate::config::FactoryOptions;
use crate::descriptors::TypeDescriptor;
use crate::error::DiResult;
use crate::provider::Factory;
use crate::registration::{Candidate, CandidateSet, Implements};
use crate::{Item, ItemList};

/// A reusable bundle of registrations.
///
/// # Example
///
/// ```rust
/// use ferrous_ioc::{
///     implements, Constructor, DiResult, FactoryBuilder, FactoryProfile, Injectable, Registrar,
///     Resolver,
/// };
///
/// trait Clock: Send + Sync {}
///
/// #[derive(Default)]
/// struct SystemClock;
/// impl Clock for SystemClock {}
/// impl Injectable for SystemClock {
///     fn constructors() -> Vec<Constructor<Self>> { vec![Constructor::from_default()] }
/// }
/// implements!(SystemClock => dyn Clock);
///
/// #[derive(Default)]
/// struct TimeProfile;
///
/// impl FactoryProfile for TimeProfile {
///     fn construct(&self, registrar: &Registrar<'_>) -> DiResult<()> {
///         registrar.add::<dyn Clock, SystemClock>()?.as_singleton();
///         Ok(())
///     }
/// }
///
/// # fn main() -> DiResult<()> {
/// let factory = FactoryBuilder::build().with_profile::<TimeProfile>()?.create();
/// assert!(factory.get::<dyn Clock>()?.is_some());
/// # Ok(())
/// # }
/// ```
pub trait FactoryProfile {
    /// Registers this profile's bindings.
    fn construct(&self, registrar: &Registrar<'_>) -> DiResult<()>;
}

/// Registration-only view of a [`Factory`].
///
/// Profiles receive a registrar rather than the factory so they cannot
/// resolve while the container is still being assembled.
pub struct Registrar<'a> {
    factory: &'a Factory,
}

impl<'a> Registrar<'a> {
    pub(crate) fn new(factory: &'a Factory) -> Self {
        Self { factory }
    }

    pub fn add<C, T>(&self) -> DiResult<Arc<Item>>
    where
        C: ?Sized + Send + Sync + 'static,
        T: Implements<C>,
    {
        self.factory.add::<C, T>()
    }

    pub fn add_keyed<C, T>(&self, key: &str) -> DiResult<Arc<Item>>
    where
        C: ?Sized + Send + Sync + 'static,
        T: Implements<C>,
    {
        self.factory.add_keyed::<C, T>(key)
    }

    pub fn add_candidate(&self, contract: &TypeDescriptor, candidate: &Candidate, key: Option<&str>) -> DiResult<Arc<Item>> {
        self.factory.add_candidate(contract, candidate, key)
    }

    pub fn add_all<C: ?Sized + 'static>(&self, candidates: &CandidateSet) -> DiResult<ItemList> {
        self.factory.add_all::<C>(candidates)
    }

    pub fn add_all_for(&self, contract: &TypeDescriptor, candidates: &CandidateSet) -> DiResult<ItemList> {
        self.factory.add_all_for(contract, candidates)
    }
}

/// Assembles a [`Factory`] from profiles.
///
/// # Example
///
/// ```rust
/// use ferrous_ioc::{DiResult, FactoryBuilder, FactoryProfile, Registrar};
///
/// #[derive(Default)]
/// struct Diagnostics;
/// impl FactoryProfile for Diagnostics {
///     fn construct(&self, _: &Registrar<'_>) -> DiResult<()> { Ok(()) }
/// }
///
/// # fn main() -> DiResult<()> {
/// let verbose = std::env::var("VERBOSE").is_ok();
/// let factory = FactoryBuilder::build()
///     .with_profile_if::<Diagnostics, _>(|| verbose)?
///     .create();
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FactoryBuilder {
    factory: Factory,
}

impl FactoryBuilder {
    /// Starts from a new, empty factory.
    pub fn build() -> Self {
        Self::from_factory(Factory::new())
    }

    /// Starts from a new factory with `options`.
    pub fn with_options(options: FactoryOptions) -> Self {
        Self::from_factory(Factory::with_options(options))
    }

    /// Starts from an existing factory; profiles add to its registry.
    pub fn from_factory(factory: Factory) -> Self {
        Self { factory }
    }

    /// Applies a default-constructed `P`.
    pub fn with_profile<P: FactoryProfile + Default>(self) -> DiResult<Self> {
        self.apply(&P::default())
    }

    /// Applies a default-constructed `P` only when `condition` returns true.
    ///
    /// The condition is evaluated once, when this method is called.
    pub fn with_profile_if<P, F>(self, condition: F) -> DiResult<Self>
    where
        P: FactoryProfile + Default,
        F: FnOnce() -> bool,
    {
        if condition() {
            self.with_profile::<P>()
        } else {
            tracing::trace!(profile = std::any::type_name::<P>(), "profile condition not met, skipping");
            Ok(self)
        }
    }

    /// Applies an already-constructed profile.
    pub fn apply<P: FactoryProfile + ?Sized>(self, profile: &P) -> DiResult<Self> {
        tracing::debug!(profile = std::any::type_name::<P>(), "applying profile");
        profile.construct(&self.factory.registrar())?;
        Ok(self)
    }

    /// Finishes assembly.
    pub fn create(self) -> Factory {
        self.factory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::{Constructor, Injectable};
    use crate::{implements, Resolver};

    trait Store: Send + Sync {}

    #[derive(Default)]
    struct Memory;
    impl Store for Memory {}
    impl Injectable for Memory {
        fn constructors() -> Vec<Constructor<Self>> {
            vec![Constructor::from_default()]
        }
    }
    implements!(Memory => dyn Store);

    #[derive(Default)]
    struct StoreProfile;
    impl FactoryProfile for StoreProfile {
        fn construct(&self, registrar: &Registrar<'_>) -> DiResult<()> {
            registrar.add::<dyn Store, Memory>()?;
            Ok(())
        }
    }

    #[test]
    fn skipped_profile_registers_nothing() {
        let factory = FactoryBuilder::build()
            .with_profile_if::<StoreProfile, _>(|| false)
            .unwrap()
            .create();
        assert!(factory.get::<dyn Store>().unwrap().is_none());
    }

    #[test]
    fn builder_extends_existing_factory() {
        let original = Factory::new();
        let built = FactoryBuilder::from_factory(original.clone())
            .with_profile::<StoreProfile>()
            .unwrap()
            .create();
        assert!(original.get::<dyn Store>().unwrap().is_some());
        assert!(built.get::<dyn Store>().unwrap().is_some());
    }
}
