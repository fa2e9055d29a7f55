use crate::error::DiResult;
use crate::provider::ResolverContext;
use crate::registration::{AnyArc, Implementation};

use super::{create_instance, Lifetime, LifetimeManager};

/// Builds a fresh instance on every resolution. Holds no state.
#[derive(Debug, Default, Clone, Copy)]
pub struct TransientLifetimeManager;

impl LifetimeManager for TransientLifetimeManager {
    fn get(&self, implementation: &Implementation, context: &ResolverContext<'_>) -> DiResult<AnyArc> {
        create_instance(implementation, context)
    }

    fn lifetime(&self) -> Lifetime {
        Lifetime::Transient
    }
}
