//! # ferrous-ioc
//!
//! A small inversion-of-control container with constructor injection.
//!
//! ## Features
//!
//! - **Contracts are trait objects**: bind `dyn Trait` to concrete types, resolve `Arc<dyn Trait>`
//! - **Keyed registrations**: several implementations per contract, selected by key
//! - **Constructor injection**: declared constructor parameters are resolved from the factory
//! - **Pluggable lifetimes**: transient by default, singleton on request, or your own [`LifetimeManager`]
//! - **Profiles**: group registrations and apply them conditionally through [`FactoryBuilder`]
//! - **Circular dependency detection**: resolution cycles fail with the full path
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_ioc::{implements, Constructor, Factory, Injectable, Resolver};
//! use std::sync::Arc;
//!
//! trait Database: Send + Sync {
//!     fn url(&self) -> &str;
//! }
//!
//! trait UserService: Send + Sync {
//!     fn database(&self) -> &Arc<dyn Database>;
//! }
//!
//! #[derive(Default)]
//! struct Postgres;
//! impl Database for Postgres {
//!     fn url(&self) -> &str { "postgres://localhost" }
//! }
//! impl Injectable for Postgres {
//!     fn constructors() -> Vec<Constructor<Self>> { vec![Constructor::from_default()] }
//! }
//! implements!(Postgres => dyn Database);
//!
//! struct Users {
//!     db: Arc<dyn Database>,
//! }
//! impl UserService for Users {
//!     fn database(&self) -> &Arc<dyn Database> { &self.db }
//! }
//! impl Injectable for Users {
//!     fn constructors() -> Vec<Constructor<Self>> {
//!         vec![Constructor::new(|args| Ok(Users { db: args.take::<dyn Database>()? }))
//!             .param::<dyn Database>()]
//!     }
//! }
//! implements!(Users => dyn UserService);
//!
//! let factory = Factory::new();
//! factory.add::<dyn Database, Postgres>().unwrap().as_singleton();
//! factory.add::<dyn UserService, Users>().unwrap();
//!
//! let users = factory.get::<dyn UserService>().unwrap().unwrap();
//! assert_eq!(users.database().url(), "postgres://localhost");
//!
//! // Singletons are shared
//! let db = factory.get::<dyn Database>().unwrap().unwrap();
//! assert!(Arc::ptr_eq(users.database(), &db));
//! ```
//!
//! ## Lifetimes
//!
//! - **Transient**: a new instance on every resolution (the default)
//! - **Singleton**: created on first resolution and shared afterwards, per registration
//! - **Custom**: any [`LifetimeManager`], attached with [`Item::set_lifetime_to`]
//!
//! ## Keyed Registrations
//!
//! ```rust
//! use ferrous_ioc::{implements, Constructor, Factory, Injectable, Resolver};
//!
//! trait Shape: Send + Sync {
//!     fn sides(&self) -> u32;
//! }
//!
//! #[derive(Default)]
//! struct Triangle;
//! impl Shape for Triangle {
//!     fn sides(&self) -> u32 { 3 }
//! }
//! impl Injectable for Triangle {
//!     fn constructors() -> Vec<Constructor<Self>> { vec![Constructor::from_default()] }
//! }
//! implements!(Triangle => dyn Shape);
//!
//! #[derive(Default)]
//! struct Square;
//! impl Shape for Square {
//!     fn sides(&self) -> u32 { 4 }
//! }
//! impl Injectable for Square {
//!     fn constructors() -> Vec<Constructor<Self>> { vec![Constructor::from_default()] }
//! }
//! implements!(Square => dyn Shape);
//!
//! let factory = Factory::new();
//! factory.add_keyed::<dyn Shape, Triangle>("triangle").unwrap();
//! factory.add_keyed::<dyn Shape, Square>("square").unwrap();
//!
//! // No key selects the first registration
//! assert_eq!(factory.get::<dyn Shape>().unwrap().unwrap().sides(), 3);
//! assert_eq!(factory.get_keyed::<dyn Shape>("square").unwrap().unwrap().sides(), 4);
//! assert_eq!(factory.get_all::<dyn Shape>().unwrap().unwrap().len(), 2);
//! ```

// Module declarations
pub mod collection;
pub mod config;
pub mod descriptors;
pub mod error;
pub mod lifetime;
pub mod logging;
pub mod provider;
pub mod registration;
pub mod traits;

// Internal modules
mod internal;

// Re-export core types
pub use collection::{FactoryBuilder, FactoryProfile, Item, ItemDetail, ItemList, Registrar};
pub use config::FactoryOptions;
pub use descriptors::{BindingDescriptor, ImplementationDescriptor, TypeDescriptor, TypeKind};
pub use error::{DiError, DiResult};
pub use lifetime::{
    create_instance, Lifetime, LifetimeManager, SingletonLifetimeManager, SingletonState, TransientLifetimeManager,
};
pub use logging::{ConfigLogger, TracingConfigLogger};
pub use provider::{Factory, ResolverContext};
pub use registration::{
    AnyArc, Arguments, Candidate, CandidateBuilder, CandidateSet, Constructor, ErasedConstructor, Implementation,
    Implements, Injectable,
};
pub use traits::{Locator, Resolver, ResolverCore};
