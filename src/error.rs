//! Error types for the inversion-of-control container.

use std::fmt;

/// Container errors.
///
/// Covers invalid registrations and resolutions, constructor activation
/// failures and resolution-stack violations. A contract or key that is simply
/// not registered is never an error: resolution reports it as `Ok(None)`.
///
/// # Examples
///
/// ```rust
/// use ferrous_ioc::{DiError, Factory, Resolver};
///
/// struct Plain;
///
/// // Only trait objects can act as contracts.
/// let factory = Factory::new();
/// match factory.get::<Plain>() {
///     Err(DiError::InvalidArgument { argument, .. }) => assert_eq!(argument, "contract"),
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use ferrous_ioc::DiError;
///
/// let arity = DiError::ConstructorArity { type_name: "app::Car", arguments: 0 };
/// let circular = DiError::Circular(vec!["dyn app::Car", "dyn app::Engine", "dyn app::Car"]);
///
/// println!("Error: {}", arity);
/// println!("Error: {}", circular);
/// ```
#[derive(Debug, Clone)]
pub enum DiError {
    /// Wrong kind of type passed to a registration or resolution call
    InvalidArgument {
        /// Which argument was rejected (`"contract"` or `"implementation"`)
        argument: &'static str,
        /// Name of the offending type
        type_name: &'static str,
        /// Why it was rejected
        reason: &'static str,
    },
    /// Implementation declares no constructor at all
    NoConstructor(&'static str),
    /// No declared constructor takes the number of arguments supplied
    ConstructorArity {
        /// Implementation being activated
        type_name: &'static str,
        /// Number of arguments the activation was attempted with
        arguments: usize,
    },
    /// Constructor parameter could not be injected (strict injection only)
    Unresolvable {
        /// Implementation being constructed
        implementation: &'static str,
        /// Parameter type that could not be satisfied
        parameter: &'static str,
    },
    /// Constructor body asked for more arguments than were supplied
    MissingArgument(&'static str),
    /// Type downcast failed
    TypeMismatch(&'static str),
    /// Constructor body reported a failure
    Construction {
        /// Implementation whose constructor failed
        type_name: &'static str,
        /// Failure message
        message: String,
    },
    /// Circular dependency detected (includes path)
    Circular(Vec<&'static str>),
    /// Maximum resolution depth exceeded
    DepthExceeded(usize),
    /// The self-registered resolver outlived its factory
    FactoryDropped,
}

impl DiError {
    /// Builds a [`DiError::Construction`] for implementation `T`.
    ///
    /// Intended for constructor bodies that need to fail.
    pub fn construction<T: ?Sized>(message: impl Into<String>) -> Self {
        DiError::Construction {
            type_name: std::any::type_name::<T>(),
            message: message.into(),
        }
    }
}

impl fmt::Display for DiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiError::InvalidArgument { argument, type_name, reason } => {
                write!(f, "Invalid {} '{}': {}", argument, type_name, reason)
            }
            DiError::NoConstructor(name) => write!(f, "No constructor declared for: {}", name),
            DiError::ConstructorArity { type_name, arguments } => {
                write!(f, "No constructor of {} takes {} argument(s)", type_name, arguments)
            }
            DiError::Unresolvable { implementation, parameter } => {
                write!(f, "Cannot inject {} into {}", parameter, implementation)
            }
            DiError::MissingArgument(name) => write!(f, "Missing constructor argument: {}", name),
            DiError::TypeMismatch(name) => write!(f, "Type mismatch for: {}", name),
            DiError::Construction { type_name, message } => {
                write!(f, "Construction of {} failed: {}", type_name, message)
            }
            DiError::Circular(path) => {
                write!(f, "Circular dependency: {}", path.join(" -> "))
            }
            DiError::DepthExceeded(depth) => write!(f, "Max depth {} exceeded", depth),
            DiError::FactoryDropped => write!(f, "Factory has been dropped"),
        }
    }
}

impl std::error::Error for DiError {}

/// Result type for container operations.
pub type DiResult<T> = Result<T, DiError>;
