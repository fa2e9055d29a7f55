//! Circular dependency detection infrastructure.

use std::cell::RefCell;

use crate::descriptors::TypeDescriptor;
use crate::error::{DiError, DiResult};

// Thread-local stack of registrations currently being activated
thread_local! {
    static RESOLUTION_STACK: RefCell<Vec<Frame>> = const { RefCell::new(Vec::new()) };
}

struct Frame {
    factory: usize,
    registration: usize,
    name: &'static str,
}

/// Guard for one entry on the thread-local resolution stack.
pub(crate) struct StackGuard {
    factory: usize,
    registration: usize,
}

impl StackGuard {
    /// Pushes `registration` of `factory`, failing if it is already being
    /// activated or the stack is `max_depth` deep.
    ///
    /// `registration` identifies one keyed implementation, so a registration
    /// that depends on its own contract resolved through another key is not
    /// a cycle. `contract` only names the frame in the reported path.
    pub(crate) fn push(
        factory: usize,
        registration: usize,
        contract: &TypeDescriptor,
        max_depth: usize,
    ) -> DiResult<Self> {
        RESOLUTION_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();

            // Circular detection BEFORE pushing the new frame
            if let Some(start) = stack
                .iter()
                .position(|f| f.factory == factory && f.registration == registration)
            {
                let mut path: Vec<&'static str> = stack[start..]
                    .iter()
                    .filter(|f| f.factory == factory)
                    .map(|f| f.name)
                    .collect();
                path.push(contract.name());
                return Err(DiError::Circular(path));
            }

            let depth = stack.iter().filter(|f| f.factory == factory).count();
            if depth >= max_depth {
                return Err(DiError::DepthExceeded(depth));
            }

            stack.push(Frame {
                factory,
                registration,
                name: contract.name(),
            });
            Ok(Self { factory, registration })
        })
    }
}

impl Drop for StackGuard {
    fn drop(&mut self) {
        RESOLUTION_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(last) = stack.pop() {
                debug_assert!(last.factory == self.factory && last.registration == self.registration);
            }
        });
    }
}

/// Runs `f` with `registration` on the resolution stack.
pub(crate) fn with_resolution_stack<T, F>(
    factory: usize,
    registration: usize,
    contract: &TypeDescriptor,
    max_depth: usize,
    f: F,
) -> DiResult<T>
where
    F: FnOnce() -> DiResult<T>,
{
    let _guard = StackGuard::push(factory, registration, contract, max_depth)?;
    f()
}
