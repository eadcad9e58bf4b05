// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dispatch facade.
//!
//! ## Overview
//!
//! Resolves a request URI against the registered route tables, merges
//! parameters, invokes the handler, and builds the [`Outcome`].
//!
//! ## Route Selection
//!
//! - Tables are queried in the order they were supplied.
//! - The first table that matches wins; later tables are not queried.
//! - No match in any table is a failed outcome with no route, not a panic.
//!
//! ## Side Effects
//!
//! - [`DeepLinkDelegate::build_outcome`] and [`DeepLinkDelegate::supports`] are pure.
//! - [`DeepLinkDelegate::dispatch`] additionally hands the result to the
//!   [`Presenter`] and notifies the [`NotificationSink`] exactly once.

use alloc::boxed::Box;
use alloc::vec::Vec;

use log::{debug, info, warn};

use crate::attributes;
use crate::error::DispatchError;
use crate::handler;
use crate::outcome::Outcome;
use crate::route::{RouteDescriptor, RouteTable};
use crate::types::{
    CallerContext, NoPresenter, NoSink, Notification, NotificationSink, Presenter, Request,
};

/// Deterministic deep link dispatcher.
///
/// ## Usage
///
/// - Construct with [`DeepLinkDelegate::new`] when only outcomes are wanted,
///   or with [`DeepLinkDelegate::with_collaborators`] to attach a
///   [`NotificationSink`] and a [`Presenter`].
/// - Call [`DeepLinkDelegate::supports`] to probe a URI without side effects.
/// - Call [`DeepLinkDelegate::build_outcome`] for a pure resolution, or
///   [`DeepLinkDelegate::dispatch`] to also present and notify.
///
/// Route tables are fixed for the lifetime of the delegate.
pub struct DeepLinkDelegate<C, S: NotificationSink = NoSink, P: Presenter<C> = NoPresenter> {
    pub(crate) tables: Vec<Box<dyn RouteTable<C>>>,
    pub(crate) sink: S,
    pub(crate) presenter: P,
}

impl<C, S: NotificationSink, P: Presenter<C>> core::fmt::Debug for DeepLinkDelegate<C, S, P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DeepLinkDelegate")
            .field("tables", &self.tables.len())
            .finish_non_exhaustive()
    }
}

impl<C, S: NotificationSink + Default, P: Presenter<C> + Default> DeepLinkDelegate<C, S, P> {
    /// Create a delegate over `tables` with default collaborators.
    pub fn new(tables: Vec<Box<dyn RouteTable<C>>>) -> Self {
        Self {
            tables,
            sink: S::default(),
            presenter: P::default(),
        }
    }
}

impl<C, S: NotificationSink, P: Presenter<C>> DeepLinkDelegate<C, S, P> {
    /// Create a delegate with explicit collaborators.
    pub fn with_collaborators(tables: Vec<Box<dyn RouteTable<C>>>, sink: S, presenter: P) -> Self {
        Self {
            tables,
            sink,
            presenter,
        }
    }

    /// Registered route tables, in query order.
    pub fn route_tables(&self) -> &[Box<dyn RouteTable<C>>] {
        &self.tables
    }

    /// The notification sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// The presenter.
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// First route matching `uri`, in table order.
    pub fn resolve(&self, uri: &str) -> Option<&RouteDescriptor<C>> {
        self.find_route(uri).map(|(_, route)| route)
    }

    /// Whether any registered table matches `uri`.
    ///
    /// No parameters are merged and nothing is invoked.
    pub fn supports(&self, uri: &str) -> bool {
        self.find_route(uri).is_some()
    }

    fn find_route(&self, uri: &str) -> Option<(&dyn RouteTable<C>, &RouteDescriptor<C>)> {
        self.tables
            .iter()
            .find_map(|table| table.parse(uri).map(|route| (&**table, route)))
    }
}

impl<C: CallerContext, S: NotificationSink, P: Presenter<C>> DeepLinkDelegate<C, S, P> {
    /// Resolve `request` into an [`Outcome`] without presenting or notifying.
    ///
    /// Never panics for dispatch failures; they are reported through
    /// [`Outcome::error`].
    pub fn build_outcome(&self, caller: &C, request: &Request) -> Outcome<'_, C> {
        let Some(uri) = request.uri.as_deref() else {
            return Outcome::failure("", None, DispatchError::MissingRequestData, Vec::new());
        };

        let Some((table, route)) = self.find_route(uri) else {
            debug!("no route table matched {uri}");
            return Outcome::failure(
                uri,
                None,
                DispatchError::NoRouteMatch { uri: uri.into() },
                Vec::new(),
            );
        };
        debug!("{uri} matched {}", route.template());

        let merged = attributes::merge(table.path_parameters(route, uri), uri, &request.extras);
        match handler::invoke(route, caller, &merged.attributes) {
            Ok(navigation) => Outcome::success(caller, request, uri, route, merged, navigation),
            Err(error) => Outcome::failure(uri, Some(route), error, merged.duplicates),
        }
    }

    /// Resolve `request`, present the result, and notify the sink.
    ///
    /// A stack is replayed with [`Presenter::start_stack`]; a single target is
    /// shown with [`Presenter::start`]. Failed outcomes present nothing. The
    /// sink is notified exactly once either way.
    pub fn dispatch(&self, caller: &C, request: &Request) -> Outcome<'_, C> {
        let outcome = self.build_outcome(caller, request);
        if let Some(stack) = outcome.stack() {
            self.presenter.start_stack(caller, stack);
        } else if let Some(target) = outcome.target() {
            self.presenter.start(caller, target);
        }

        let template = outcome.route().map_or("", RouteDescriptor::template);
        if outcome.is_successful() {
            info!("deep link {} dispatched via {template}", outcome.uri());
        } else {
            warn!("deep link {:?} failed: {}", outcome.uri(), outcome.message());
        }
        self.sink.notify(&Notification {
            successful: outcome.is_successful(),
            uri: outcome.uri(),
            template,
            error_message: outcome.error().map(|_| outcome.message()),
        });
        outcome
    }

    /// [`dispatch`](Self::dispatch) the request the caller was started with.
    ///
    /// # Panics
    ///
    /// Panics if `caller` has no request attached; that is a usage error,
    /// not a dispatch failure.
    pub fn dispatch_from(&self, caller: &C) -> Outcome<'_, C> {
        let Some(request) = caller.request() else {
            panic!("caller has no inbound request to dispatch");
        };
        self.dispatch(caller, request)
    }
}
