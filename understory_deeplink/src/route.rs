// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Route descriptors and the route table seam.
//!
//! ## Overview
//!
//! A [`RouteDescriptor`] pairs a template with the target it resolves to. The
//! target is either addressed directly ([`RouteKind::Direct`]) or produced by
//! a named [`Operation`] ([`RouteKind::Operation`]).
//!
//! Template syntax and matching are owned by implementations of
//! [`RouteTable`]; this crate only consumes matches.
//!
//! ## Operations
//!
//! An operation is a name plus the overloads registered under it. Each
//! overload is one of a closed set of typed shapes ([`OperationFn`]): it takes
//! the caller alone, or the caller and the merged attributes, and it returns
//! either a single [`Target`] or a [`TaskStack`]. Shapes are fixed when the
//! route is built, so invocation never has to discover a signature.

use alloc::borrow::Cow;
use alloc::string::String;

use smallvec::SmallVec;

use crate::attributes::AttributeSet;
use crate::error::InvocationError;
use crate::types::{Target, TaskStack};

/// Calling convention of an [`OperationFn`], in the order they are tried.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Convention {
    /// `(caller)`.
    Context,
    /// `(caller, attributes)`.
    ContextAndAttributes,
}

/// One typed overload of an [`Operation`].
pub enum OperationFn<C> {
    /// `(caller) -> Target`.
    Target(fn(&C) -> Result<Target, InvocationError>),
    /// `(caller) -> TaskStack`.
    Stack(fn(&C) -> Result<TaskStack, InvocationError>),
    /// `(caller, attributes) -> Target`.
    TargetWithAttributes(fn(&C, &AttributeSet) -> Result<Target, InvocationError>),
    /// `(caller, attributes) -> TaskStack`.
    StackWithAttributes(fn(&C, &AttributeSet) -> Result<TaskStack, InvocationError>),
}

impl<C> OperationFn<C> {
    /// Calling convention of this overload.
    pub fn convention(&self) -> Convention {
        match self {
            Self::Target(_) | Self::Stack(_) => Convention::Context,
            Self::TargetWithAttributes(_) | Self::StackWithAttributes(_) => {
                Convention::ContextAndAttributes
            }
        }
    }

    /// Whether this overload returns a [`TaskStack`].
    pub fn returns_stack(&self) -> bool {
        matches!(self, Self::Stack(_) | Self::StackWithAttributes(_))
    }
}

impl<C> Clone for OperationFn<C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for OperationFn<C> {}

impl<C> core::fmt::Debug for OperationFn<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OperationFn")
            .field("convention", &self.convention())
            .field("returns_stack", &self.returns_stack())
            .finish()
    }
}

/// A named operation and its registered overloads.
pub struct Operation<C> {
    name: Cow<'static, str>,
    overloads: SmallVec<[OperationFn<C>; 2]>,
}

impl<C> Operation<C> {
    /// An operation with no overloads yet.
    ///
    /// Invoking an operation without overloads fails with
    /// [`DispatchError::OperationNotFound`](crate::error::DispatchError::OperationNotFound).
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self {
            name: name.into(),
            overloads: SmallVec::new(),
        }
    }

    /// Register an overload.
    ///
    /// Registration order does not matter: the context-only convention is
    /// always preferred. Registering a second overload with the same
    /// convention replaces the first.
    pub fn with(mut self, overload: OperationFn<C>) -> Self {
        let convention = overload.convention();
        self.overloads.retain(|o| o.convention() != convention);
        self.overloads.push(overload);
        self
    }

    /// Operation name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registered overloads, in registration order.
    pub fn overloads(&self) -> &[OperationFn<C>] {
        &self.overloads
    }

    /// The overload for `convention`, if registered.
    pub fn overload(&self, convention: Convention) -> Option<&OperationFn<C>> {
        self.overloads.iter().find(|o| o.convention() == convention)
    }
}

impl<C> Clone for Operation<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            overloads: self.overloads.clone(),
        }
    }
}

impl<C> core::fmt::Debug for Operation<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Operation")
            .field("name", &self.name)
            .field("overloads", &self.overloads.as_slice())
            .finish()
    }
}

/// How a route produces its target.
pub enum RouteKind<C> {
    /// Address the route's target directly; nothing is invoked.
    Direct,
    /// Invoke a named operation to produce the target.
    Operation(Operation<C>),
}

impl<C> Clone for RouteKind<C> {
    fn clone(&self) -> Self {
        match self {
            Self::Direct => Self::Direct,
            Self::Operation(op) => Self::Operation(op.clone()),
        }
    }
}

impl<C> core::fmt::Debug for RouteKind<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Direct => f.write_str("Direct"),
            Self::Operation(op) => f.debug_tuple("Operation").field(op).finish(),
        }
    }
}

/// A registered route: template plus target.
///
/// Immutable once built. Owned by a [`RouteTable`] and borrowed by the
/// [`Outcome`](crate::outcome::Outcome) of a dispatch that matched it.
pub struct RouteDescriptor<C> {
    pub(crate) template: Cow<'static, str>,
    pub(crate) target: Cow<'static, str>,
    pub(crate) kind: RouteKind<C>,
}

impl<C> RouteDescriptor<C> {
    /// A route whose target is addressed directly.
    pub fn direct(
        template: impl Into<Cow<'static, str>>,
        target: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            template: template.into(),
            target: target.into(),
            kind: RouteKind::Direct,
        }
    }

    /// A route whose target is produced by `operation`, declared on `target`.
    pub fn operation(
        template: impl Into<Cow<'static, str>>,
        target: impl Into<Cow<'static, str>>,
        operation: Operation<C>,
    ) -> Self {
        Self {
            template: template.into(),
            target: target.into(),
            kind: RouteKind::Operation(operation),
        }
    }

    /// Template used for matching and diagnostics.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Identifier of the target type.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// How the route produces its target.
    pub fn kind(&self) -> &RouteKind<C> {
        &self.kind
    }

    /// Operation name, for [`RouteKind::Operation`] routes.
    pub fn operation_name(&self) -> Option<&str> {
        match &self.kind {
            RouteKind::Direct => None,
            RouteKind::Operation(op) => Some(op.name()),
        }
    }
}

impl<C> Clone for RouteDescriptor<C> {
    fn clone(&self) -> Self {
        Self {
            template: self.template.clone(),
            target: self.target.clone(),
            kind: self.kind.clone(),
        }
    }
}

impl<C> core::fmt::Debug for RouteDescriptor<C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RouteDescriptor")
            .field("template", &self.template)
            .field("target", &self.target)
            .field("kind", &self.kind)
            .finish()
    }
}

/// A set of routes plus the matching and extraction logic for them.
///
/// Supplied to the [`DeepLinkDelegate`](crate::delegate::DeepLinkDelegate)
/// as an ordered list; the first table that matches wins.
pub trait RouteTable<C> {
    /// The route matching `uri`, if any.
    fn parse(&self, uri: &str) -> Option<&RouteDescriptor<C>>;

    /// Path parameters of `uri` captured by `route`.
    ///
    /// Only called with a route this table returned from [`parse`](Self::parse).
    fn path_parameters(&self, route: &RouteDescriptor<C>, uri: &str) -> AttributeSet;
}

/// Qualified `Target::operation` name for log lines.
pub(crate) fn describe<C>(route: &RouteDescriptor<C>) -> String {
    match route.operation_name() {
        Some(op) => alloc::format!("{}::{op}", route.target()),
        None => route.target().into(),
    }
}
