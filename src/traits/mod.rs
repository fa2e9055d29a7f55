//! Core traits for the container.

mod resolver;

pub use resolver::{Locator, Resolver, ResolverCore};
