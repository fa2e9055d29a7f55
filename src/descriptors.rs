//! Type descriptors and registry introspection.
//!
//! [`TypeDescriptor`] replaces runtime reflection: it is computed once at
//! registration time and carries everything the container needs to know
//! about a type, namely its identity, its name and whether it is abstract.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::mem::size_of;

#[cfg(feature = "config")]
use serde::Serialize;

use crate::lifetime::Lifetime;

/// Kind of a registered type.
///
/// Trait objects (and other unsized types) are abstract and may serve as
/// contracts; sized types are concrete and may serve as implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(Serialize))]
pub enum TypeKind {
    /// Unsized type such as `dyn Trait`
    Abstract,
    /// Sized type that can be instantiated
    Concrete,
}

/// Registration-time description of a type.
///
/// Equality and hashing use the `TypeId` only.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{TypeDescriptor, TypeKind};
///
/// trait Shape: Send + Sync {}
/// struct Circle;
///
/// let contract = TypeDescriptor::of::<dyn Shape>();
/// let circle = TypeDescriptor::of::<Circle>();
///
/// assert_eq!(contract.kind(), TypeKind::Abstract);
/// assert_eq!(circle.kind(), TypeKind::Concrete);
/// assert!(circle.name().ends_with("Circle"));
/// assert_ne!(contract, circle);
/// ```
#[derive(Clone, Copy)]
pub struct TypeDescriptor {
    id: TypeId,
    name: &'static str,
    kind: TypeKind,
}

impl TypeDescriptor {
    /// Describes `T`.
    ///
    /// A type is abstract when references to it are fat pointers, which is
    /// the case for trait objects.
    pub fn of<T: ?Sized + 'static>() -> Self {
        let kind = if size_of::<&T>() == size_of::<&()>() {
            TypeKind::Concrete
        } else {
            TypeKind::Abstract
        };
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            kind,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    /// Fully-qualified type name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    pub fn is_abstract(&self) -> bool {
        self.kind == TypeKind::Abstract
    }
}

impl PartialEq for TypeDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeDescriptor {}

impl Hash for TypeDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .finish()
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Snapshot of one binding for introspection and logging.
///
/// Produced by [`Factory::describe`](crate::Factory::describe).
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
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::from_default()]
///     }
/// }
/// implements!(Circle => dyn Shape);
///
/// let factory = Factory::new();
/// factory.add_keyed::<dyn Shape, Circle>("circle").unwrap().as_singleton();
///
/// let bindings = factory.describe();
/// let shapes = bindings.iter().find(|b| b.contract.contains("Shape")).unwrap();
/// assert_eq!(shapes.implementations.len(), 1);
/// assert_eq!(shapes.implementations[0].key, "circle");
/// assert_eq!(shapes.implementations[0].lifetime, Lifetime::Singleton);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize))]
pub struct BindingDescriptor {
    /// Contract type name
    pub contract: &'static str,
    /// Registered implementations in insertion order
    pub implementations: Vec<ImplementationDescriptor>,
}

/// Snapshot of one implementation registered under a binding.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize))]
pub struct ImplementationDescriptor {
    /// Registration key
    pub key: String,
    /// Implementation type name
    pub type_name: &'static str,
    /// Lifetime strategy currently attached
    pub lifetime: Lifetime,
}
