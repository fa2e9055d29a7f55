//! Resolver context for lifetime managers.
//!
//! This module contains the ResolverContext type which gives lifetime
//! managers and constructor injection access back into the registry.

use std::sync::Arc;

use crate::collection::Item;
use crate::config::FactoryOptions;
use crate::descriptors::TypeDescriptor;
use crate::error::DiResult;
use crate::registration::AnyArc;
use crate::traits::{Locator, ResolverCore};

/// Context passed to [`LifetimeManager::get`](crate::LifetimeManager::get).
///
/// Wraps the factory's locator and resolver capabilities together with its
/// options, so lifetime managers stay independent of the concrete factory.
pub struct ResolverContext<'a> {
    locator: &'a dyn Locator,
    resolver: &'a dyn ResolverCore,
    options: &'a FactoryOptions,
}

impl<'a> ResolverContext<'a> {
    pub(crate) fn new(locator: &'a dyn Locator, resolver: &'a dyn ResolverCore, options: &'a FactoryOptions) -> Self {
        Self {
            locator,
            resolver,
            options,
        }
    }

    pub fn options(&self) -> &FactoryOptions {
        self.options
    }
}

impl<'a> Locator for ResolverContext<'a> {
    fn find_item(&self, contract: &TypeDescriptor) -> Option<Arc<Item>> {
        self.locator.find_item(contract)
    }
}

impl<'a> ResolverCore for ResolverContext<'a> {
    fn resolve_any(&self, contract: &TypeDescriptor, key: Option<&str>) -> DiResult<Option<AnyArc>> {
        self.resolver.resolve_any(contract, key)
    }

    fn resolve_all(&self, contract: &TypeDescriptor) -> DiResult<Option<Vec<AnyArc>>> {
        self.resolver.resolve_all(contract)
    }
}
