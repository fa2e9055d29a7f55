//! Implementation registration types.
//!
//! An implementation declares its constructors explicitly through
//! [`Injectable`]: each [`Constructor`] lists the contract types it needs, in
//! order, and a body that builds the value from the resolved [`Arguments`].
//! [`Implements`] supplies the upcast into a contract's trait object. Together
//! they produce a type-erased [`Implementation`] the container can activate.

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::descriptors::TypeDescriptor;
use crate::error::{DiError, DiResult};

/// Type-erased instance storage.
///
/// An instance resolved for contract `C` is stored as an `Arc<Arc<C>>`
/// behind `dyn Any`, so trait objects survive the round trip through `Any`.
pub type AnyArc = Arc<dyn Any + Send + Sync>;

type ConstructorBody<T> = Arc<dyn Fn(&mut Arguments) -> DiResult<T> + Send + Sync>;

/// Recovers the `Arc<C>` stored inside an [`AnyArc`].
pub(crate) fn cast_instance<C>(instance: &AnyArc) -> DiResult<Arc<C>>
where
    C: ?Sized + Send + Sync + 'static,
{
    instance
        .downcast_ref::<Arc<C>>()
        .cloned()
        .ok_or(DiError::TypeMismatch(std::any::type_name::<C>()))
}

/// Resolved constructor arguments, consumed in declaration order.
pub struct Arguments {
    values: std::vec::IntoIter<AnyArc>,
}

impl Arguments {
    pub(crate) fn new(values: Vec<AnyArc>) -> Self {
        Self { values: values.into_iter() }
    }

    /// Takes the next argument as an instance of contract `C`.
    ///
    /// Fails with [`DiError::MissingArgument`] when the arguments are
    /// exhausted and [`DiError::TypeMismatch`] when the next argument was
    /// resolved for a different contract.
    pub fn take<C>(&mut self) -> DiResult<Arc<C>>
    where
        C: ?Sized + Send + Sync + 'static,
    {
        let value = self
            .values
            .next()
            .ok_or(DiError::MissingArgument(std::any::type_name::<C>()))?;
        cast_instance::<C>(&value)
    }

    /// Number of arguments not yet taken.
    pub fn remaining(&self) -> usize {
        self.values.len()
    }
}

/// One declared constructor of implementation `T`.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{Constructor, TypeDescriptor};
/// use std::sync::Arc;
///
/// trait Engine: Send + Sync {}
///
/// struct Car {
///     engine: Arc<dyn Engine>,
/// }
///
/// let ctor = Constructor::new(|args| Ok(Car { engine: args.take::<dyn Engine>()? }))
///     .param::<dyn Engine>();
///
/// assert_eq!(ctor.parameters(), &[TypeDescriptor::of::<dyn Engine>()]);
/// ```
pub struct Constructor<T> {
    parameters: Vec<TypeDescriptor>,
    body: ConstructorBody<T>,
}

impl<T: 'static> Constructor<T> {
    /// Creates a constructor with no parameters; add them with
    /// [`param`](Self::param) in the order the body takes them.
    pub fn new<F>(body: F) -> Self
    where
        F: Fn(&mut Arguments) -> DiResult<T> + Send + Sync + 'static,
    {
        Self {
            parameters: Vec::new(),
            body: Arc::new(body),
        }
    }

    /// Appends a parameter of type `P`.
    pub fn param<P: ?Sized + 'static>(self) -> Self {
        self.parameter(TypeDescriptor::of::<P>())
    }

    /// Appends a parameter from an existing descriptor.
    pub fn parameter(mut self, parameter: TypeDescriptor) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn parameters(&self) -> &[TypeDescriptor] {
        &self.parameters
    }
}

impl<T: Default + 'static> Constructor<T> {
    /// Zero-parameter constructor delegating to `T::default()`.
    pub fn from_default() -> Self {
        Self::new(|_| Ok(T::default()))
    }
}

impl<T> fmt::Debug for Constructor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructor")
            .field("parameters", &self.parameters)
            .finish()
    }
}

/// A concrete type the container can construct.
///
/// `constructors` returns the declared constructors in order. Injection only
/// ever considers the first one; the others are used solely when activation
/// falls back to an argument count the first one does not take.
pub trait Injectable: Send + Sync + Sized + 'static {
    fn constructors() -> Vec<Constructor<Self>>;
}

/// Declares that `Self` can be exposed as contract `C`.
///
/// Usually implemented through [`implements!`](crate::implements).
pub trait Implements<C: ?Sized + 'static>: Injectable {
    fn upcast(self: Arc<Self>) -> Arc<C>;
}

/// Implements [`Implements`] for one concrete type and any number of contracts.
///
/// ```rust
/// use ferrous_ioc::{implements, Constructor, Injectable};
///
/// trait Shape: Send + Sync {}
/// trait Drawable: Send + Sync {}
///
/// #[derive(Default)]
/// struct Circle;
/// impl Shape for Circle {}
/// impl Drawable for Circle {}
/// impl Injectable for Circle {
///     fn constructors() -> Vec<Constructor<Self>> {
///         vec![Constructor::from_default()]
///     }
/// }
///
/// implements!(Circle => dyn Shape, dyn Drawable);
/// ```
#[macro_export]
macro_rules! implements {
    ($ty:ty => $($contract:ty),+ $(,)?) => {
        $(
            impl $crate::Implements<$contract> for $ty {
                fn upcast(self: ::std::sync::Arc<Self>) -> ::std::sync::Arc<$contract> {
                    self
                }
            }
        )+
    };
}

type ErasedBody = Arc<dyn Fn(&mut Arguments) -> DiResult<AnyArc> + Send + Sync>;

/// A constructor with its output already upcast and erased.
#[derive(Clone)]
pub struct ErasedConstructor {
    parameters: Vec<TypeDescriptor>,
    body: ErasedBody,
}

impl ErasedConstructor {
    pub fn parameters(&self) -> &[TypeDescriptor] {
        &self.parameters
    }

    pub fn arity(&self) -> usize {
        self.parameters.len()
    }
}

/// A concrete type bound to one contract, ready for activation.
#[derive(Clone)]
pub struct Implementation {
    contract: TypeDescriptor,
    descriptor: TypeDescriptor,
    constructors: Arc<[ErasedConstructor]>,
}

impl Implementation {
    /// Erases `T`'s constructors, upcasting every instance to `C`.
    pub fn new<C, T>() -> Self
    where
        C: ?Sized + Send + Sync + 'static,
        T: Implements<C>,
    {
        let constructors: Vec<ErasedConstructor> = T::constructors()
            .into_iter()
            .map(|Constructor { parameters, body }| ErasedConstructor {
                parameters,
                body: Arc::new(move |arguments: &mut Arguments| -> DiResult<AnyArc> {
                    let value = body(arguments)?;
                    let instance: Arc<C> = <T as Implements<C>>::upcast(Arc::new(value));
                    Ok(Arc::new(instance) as AnyArc)
                }),
            })
            .collect();

        Self {
            contract: TypeDescriptor::of::<C>(),
            descriptor: TypeDescriptor::of::<T>(),
            constructors: constructors.into(),
        }
    }

    /// Implementation that can never be activated; used for instances handed
    /// to a pre-seeded lifetime manager.
    pub(crate) fn preseeded(contract: TypeDescriptor, descriptor: TypeDescriptor) -> Self {
        Self {
            contract,
            descriptor,
            constructors: Arc::from(Vec::new()),
        }
    }

    /// Contract this implementation is exposed as.
    pub fn contract(&self) -> TypeDescriptor {
        self.contract
    }

    /// Concrete type.
    pub fn descriptor(&self) -> TypeDescriptor {
        self.descriptor
    }

    pub fn type_name(&self) -> &'static str {
        self.descriptor.name()
    }

    pub fn constructors(&self) -> &[ErasedConstructor] {
        &self.constructors
    }

    /// The constructor injection works against.
    pub fn first_constructor(&self) -> Option<&ErasedConstructor> {
        self.constructors.first()
    }

    /// Invokes the first declared constructor taking exactly
    /// `arguments.len()` arguments.
    pub fn activate(&self, arguments: Vec<AnyArc>) -> DiResult<AnyArc> {
        let count = arguments.len();
        let constructor = self
            .constructors
            .iter()
            .find(|c| c.arity() == count)
            .ok_or(DiError::ConstructorArity {
                type_name: self.type_name(),
                arguments: count,
            })?;
        let mut arguments = Arguments::new(arguments);
        (constructor.body)(&mut arguments)
    }
}

impl fmt::Debug for Implementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Implementation")
            .field("contract", &self.contract)
            .field("type", &self.descriptor)
            .field("constructors", &self.constructors.len())
            .finish()
    }
}

/// A type offered for bulk registration.
///
/// Candidates are either concrete types, carrying one [`Implementation`]
/// per contract they implement, or abstract types, which bulk registration
/// always skips.
#[derive(Clone, Debug)]
pub struct Candidate {
    descriptor: TypeDescriptor,
    implementations: Vec<Implementation>,
}

impl Candidate {
    /// Starts a concrete candidate; declare its contracts with
    /// [`CandidateBuilder::implementing`].
    pub fn concrete<T: Injectable>() -> CandidateBuilder<T> {
        CandidateBuilder {
            candidate: Candidate {
                descriptor: TypeDescriptor::of::<T>(),
                implementations: Vec::new(),
            },
            marker: PhantomData,
        }
    }

    /// An abstract candidate, such as a trait object type.
    pub fn abstract_type<A: ?Sized + 'static>() -> Self {
        Self {
            descriptor: TypeDescriptor::of::<A>(),
            implementations: Vec::new(),
        }
    }

    pub fn descriptor(&self) -> TypeDescriptor {
        self.descriptor
    }

    pub fn is_abstract(&self) -> bool {
        self.descriptor.is_abstract()
    }

    /// Whether the candidate can be exposed as `contract`.
    pub fn implements(&self, contract: &TypeDescriptor) -> bool {
        self.implementation_for(contract).is_some()
    }

    pub fn implementation_for(&self, contract: &TypeDescriptor) -> Option<&Implementation> {
        self.implementations.iter().find(|i| i.contract() == *contract)
    }
}

/// Builder for a concrete [`Candidate`].
pub struct CandidateBuilder<T> {
    candidate: Candidate,
    marker: PhantomData<fn() -> T>,
}

impl<T: Injectable> CandidateBuilder<T> {
    /// Records that the candidate implements contract `C`.
    pub fn implementing<C>(mut self) -> Self
    where
        C: ?Sized + Send + Sync + 'static,
        T: Implements<C>,
    {
        let contract = TypeDescriptor::of::<C>();
        if !self.candidate.implements(&contract) {
            self.candidate.implementations.push(Implementation::new::<C, T>());
        }
        self
    }

    pub fn build(self) -> Candidate {
        self.candidate
    }
}

impl<T> From<CandidateBuilder<T>> for Candidate {
    fn from(builder: CandidateBuilder<T>) -> Self {
        builder.candidate
    }
}

/// An ordered set of candidates, the unit [`Factory::add_all`](crate::Factory::add_all) scans.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{implements, Candidate, CandidateSet, Constructor, Factory, Injectable, Resolver};
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
/// let candidates = CandidateSet::new()
///     .with(Candidate::concrete::<Circle>().implementing::<dyn Shape>())
///     .with(Candidate::abstract_type::<dyn Shape>());
///
/// let factory = Factory::new();
/// let items = factory.add_all::<dyn Shape>(&candidates).unwrap();
/// assert_eq!(items.len(), 1);
/// assert!(factory.get::<dyn Shape>().unwrap().is_some());
/// ```
#[derive(Clone, Debug, Default)]
pub struct CandidateSet {
    candidates: Vec<Candidate>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, candidate: impl Into<Candidate>) -> Self {
        self.push(candidate);
        self
    }

    pub fn push(&mut self, candidate: impl Into<Candidate>) {
        self.candidates.push(candidate.into());
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candidate> {
        self.candidates.iter()
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl FromIterator<Candidate> for CandidateSet {
    fn from_iter<I: IntoIterator<Item = Candidate>>(iter: I) -> Self {
        Self {
            candidates: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CandidateSet {
    type Item = &'a Candidate;
    type IntoIter = std::slice::Iter<'a, Candidate>;

    fn into_iter(self) -> Self::IntoIter {
        self.candidates.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Engine: Send + Sync {
        fn cylinders(&self) -> u32;
    }

    struct V8;
    impl Engine for V8 {
        fn cylinders(&self) -> u32 {
            8
        }
    }
    impl Injectable for V8 {
        fn constructors() -> Vec<Constructor<Self>> {
            vec![Constructor::new(|_| Ok(V8))]
        }
    }
    crate::implements!(V8 => dyn Engine);

    struct Garage {
        engines: u32,
    }
    impl Injectable for Garage {
        fn constructors() -> Vec<Constructor<Self>> {
            vec![
                Constructor::new(|args| {
                    let engine = args.take::<dyn Engine>()?;
                    Ok(Garage { engines: engine.cylinders() })
                })
                .param::<dyn Engine>(),
                Constructor::new(|_| Ok(Garage { engines: 0 })),
            ]
        }
    }
    crate::implements!(Garage => dyn Any + Send + Sync);

    #[test]
    fn activation_picks_constructor_by_arity() {
        let garage = Implementation::new::<dyn Any + Send + Sync, Garage>();
        let engine = Implementation::new::<dyn Engine, V8>().activate(Vec::new()).unwrap();

        let full = garage.activate(vec![engine]).unwrap();
        let full = cast_instance::<dyn Any + Send + Sync>(&full).unwrap();
        assert_eq!(full.downcast_ref::<Garage>().unwrap().engines, 8);

        let empty = garage.activate(Vec::new()).unwrap();
        let empty = cast_instance::<dyn Any + Send + Sync>(&empty).unwrap();
        assert_eq!(empty.downcast_ref::<Garage>().unwrap().engines, 0);
    }

    #[test]
    fn activation_without_matching_arity_fails() {
        let engine = Implementation::new::<dyn Engine, V8>();
        let extra = engine.activate(Vec::new()).unwrap();
        match engine.activate(vec![extra]) {
            Err(DiError::ConstructorArity { arguments, .. }) => assert_eq!(arguments, 1),
            other => panic!("expected arity error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn take_reports_missing_and_mismatched_arguments() {
        let mut empty = Arguments::new(Vec::new());
        assert!(matches!(empty.take::<dyn Engine>(), Err(DiError::MissingArgument(_))));

        let wrong: AnyArc = Arc::new(42u32);
        let mut arguments = Arguments::new(vec![wrong]);
        assert_eq!(arguments.remaining(), 1);
        assert!(matches!(arguments.take::<dyn Engine>(), Err(DiError::TypeMismatch(_))));
    }

    #[test]
    fn candidate_records_each_contract_once() {
        let candidate: Candidate = Candidate::concrete::<V8>()
            .implementing::<dyn Engine>()
            .implementing::<dyn Engine>()
            .into();
        assert!(!candidate.is_abstract());
        assert!(candidate.implements(&TypeDescriptor::of::<dyn Engine>()));
        assert_eq!(candidate.implementations.len(), 1);
    }
}
