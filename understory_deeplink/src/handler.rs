// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handler resolver: turn a matched route into a raw [`Navigation`].
//!
//! ## Semantics
//!
//! - [`RouteKind::Direct`] routes build a fresh [`Target`] addressed at the
//!   route's target. Nothing is invoked.
//! - [`RouteKind::Operation`] routes try the calling conventions in a fixed
//!   order:
//!   1. the context-only overload, `(caller)`;
//!   2. only if (1) is not registered, the `(caller, attributes)` overload.
//! - The chosen overload's declared return shape decides the result. A stack
//!   with zero targets is a failure, never an empty success.
//! - Every failure carries the operation name and comes back as a
//!   [`DispatchError`]; nothing panics.
//!
//! The returned navigation is raw: defaults and marker attributes are applied
//! later by the [outcome builder](crate::outcome).
//!
//! ## Example
//!
//! ```
//! use understory_deeplink::attributes::AttributeSet;
//! use understory_deeplink::error::InvocationError;
//! use understory_deeplink::handler;
//! use understory_deeplink::route::{Operation, OperationFn, RouteDescriptor};
//! use understory_deeplink::types::{Navigation, Target};
//!
//! fn open(_: &(), attrs: &AttributeSet) -> Result<Target, InvocationError> {
//!     let id = attrs.get("id").ok_or(InvocationError::failed("missing id"))?;
//!     Ok(Target::new("Item").with_extra("item", id))
//! }
//!
//! let route = RouteDescriptor::operation(
//!     "app://item/{id}",
//!     "Links",
//!     Operation::new("open").with(OperationFn::TargetWithAttributes(open)),
//! );
//! let attrs: AttributeSet = [("id", "9")].into_iter().collect();
//! let nav = handler::invoke(&route, &(), &attrs).unwrap();
//! assert!(matches!(nav, Navigation::Single(ref t) if t.extras.get("item") == Some("9")));
//!
//! let err = handler::invoke(&route, &(), &AttributeSet::new()).unwrap_err();
//! assert_eq!(err.to_string(), "Could not deep link to method: open (missing id)");
//! ```

use alloc::string::String;

use log::debug;

use crate::attributes::AttributeSet;
use crate::error::{DispatchError, InvocationError};
use crate::route::{self, Convention, OperationFn, RouteDescriptor, RouteKind};
use crate::types::{Navigation, Target};

/// Resolve and invoke the handler for `route`.
///
/// ## Usage
///
/// - Inputs:
///   - `route`: the descriptor returned by the matching route table.
///   - `caller`: passed through to operation overloads untouched.
///   - `attributes`: the merged attributes; only the
///     `(caller, attributes)` convention sees them.
/// - Return:
///   - `Ok(Navigation::Single(..))` for direct routes and target-returning overloads.
///   - `Ok(Navigation::Stack(..))` with at least one target for stack-returning overloads.
///   - `Err(..)` with one of [`DispatchError::OperationNotFound`],
///     [`DispatchError::InvocationAccessDenied`], [`DispatchError::InvocationFailed`],
///     or [`DispatchError::EmptyStackProduced`].
pub fn invoke<C>(
    route: &RouteDescriptor<C>,
    caller: &C,
    attributes: &AttributeSet,
) -> Result<Navigation, DispatchError> {
    let operation = match &route.kind {
        RouteKind::Direct => {
            debug!("direct target {} for {}", route.target(), route.template());
            return Ok(Navigation::Single(Target::new(route.target.clone())));
        }
        RouteKind::Operation(op) => op,
    };

    let name = || String::from(operation.name());
    let Some(overload) = operation
        .overload(Convention::Context)
        .or_else(|| operation.overload(Convention::ContextAndAttributes))
    else {
        return Err(DispatchError::OperationNotFound { operation: name() });
    };
    debug!(
        "invoking {} via {:?} convention",
        route::describe(route),
        overload.convention()
    );

    let produced = match *overload {
        OperationFn::Target(f) => f(caller).map(Navigation::Single),
        OperationFn::Stack(f) => f(caller).map(Navigation::Stack),
        OperationFn::TargetWithAttributes(f) => f(caller, attributes).map(Navigation::Single),
        OperationFn::StackWithAttributes(f) => f(caller, attributes).map(Navigation::Stack),
    };

    match produced {
        Ok(Navigation::Stack(stack)) if stack.is_empty() => {
            Err(DispatchError::EmptyStackProduced { operation: name() })
        }
        Ok(navigation) => Ok(navigation),
        Err(InvocationError::AccessDenied) => {
            Err(DispatchError::InvocationAccessDenied { operation: name() })
        }
        Err(InvocationError::Failed(reason)) => Err(DispatchError::InvocationFailed {
            operation: name(),
            reason,
        }),
    }
}
