// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Understory Deeplink: a deterministic, `no_std` dispatcher for deep links.
//!
//! ## Overview
//!
//! This crate resolves a URI-bearing [`Request`](crate::types::Request) to a registered route,
//! merges path and query parameters into one [`AttributeSet`](crate::attributes::AttributeSet),
//! and invokes the route's handler. The result is an [`Outcome`](crate::outcome::Outcome) holding either a
//! navigation target, a back-stack of targets, or a [`DispatchError`](crate::error::DispatchError).
//! It does not parse route templates and it does not present anything itself.
//!
//! ## Inputs
//!
//! Provide one or more [`RouteTable`](crate::route::RouteTable) implementations. A table owns its
//! template syntax: given a URI it returns a matching [`RouteDescriptor`](crate::route::RouteDescriptor)
//! and extracts path parameters for it.
//!
//! ## Ordering
//!
//! Tables are queried in the order supplied to the [`DeepLinkDelegate`](crate::delegate::DeepLinkDelegate).
//! The first match wins and later tables are not consulted.
//!
//! ## Parameters
//!
//! Inbound request extras form the base layer, then path parameters, then query parameters, then
//! the reserved [`keys::URI`](crate::types::keys::URI) entry holding the raw URI.
//! A query parameter that shadows a path parameter wins, is logged at `warn` level, and is reported in
//! [`Outcome::duplicates`](crate::outcome::Outcome::duplicates).
//!
//! ## Handlers
//!
//! Direct routes address their target without running any code. Operation routes carry a closed
//! set of typed overloads ([`OperationFn`](crate::route::OperationFn)); the context-only overload
//! is preferred and the `(caller, attributes)` overload is the fallback. A stack-returning overload
//! that yields no targets is a failure.
//!
//! ## Workflow
//!
//! ```
//! use understory_deeplink::attributes::AttributeSet;
//! use understory_deeplink::delegate::DeepLinkDelegate;
//! use understory_deeplink::query;
//! use understory_deeplink::route::{RouteDescriptor, RouteTable};
//! use understory_deeplink::types::{Request, keys};
//!
//! /// Matches `app://profile/<id>` only.
//! struct Profiles(RouteDescriptor<()>);
//!
//! impl RouteTable<()> for Profiles {
//!     fn parse(&self, uri: &str) -> Option<&RouteDescriptor<()>> {
//!         query::strip(uri).strip_prefix("app://profile/").map(|_| &self.0)
//!     }
//!     fn path_parameters(&self, _: &RouteDescriptor<()>, uri: &str) -> AttributeSet {
//!         let id = query::strip(uri).trim_start_matches("app://profile/");
//!         [("id", id)].into_iter().collect()
//!     }
//! }
//!
//! let table = Profiles(RouteDescriptor::direct("app://profile/{id}", "ProfileScreen"));
//! let tables: Vec<Box<dyn RouteTable<()>>> = vec![Box::new(table)];
//! let delegate: DeepLinkDelegate<()> = DeepLinkDelegate::new(tables);
//!
//! let uri = "app://profile/42?tab=posts";
//! assert!(delegate.supports(uri));
//!
//! let outcome = delegate.build_outcome(&(), &Request::new(uri));
//! assert!(outcome.is_successful());
//! let target = outcome.target().unwrap();
//! assert_eq!(target.id, "ProfileScreen");
//! assert_eq!(target.extras.get("id"), Some("42"));
//! assert_eq!(target.extras.get("tab"), Some("posts"));
//! assert_eq!(target.extras.get(keys::URI), Some(uri));
//! ```
//!
//! ## Collaborators
//!
//! [`DeepLinkDelegate::dispatch`](crate::delegate::DeepLinkDelegate::dispatch) additionally hands
//! the result to a [`Presenter`](crate::types::Presenter) and notifies a
//! [`NotificationSink`](crate::types::NotificationSink) once per call, on success and on failure.
//!
//! ## Features
//!
//! - `std`: enables `std` support in `log` and `thiserror`.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod attributes;
pub mod delegate;
pub mod error;
pub mod handler;
pub mod outcome;
pub mod query;
pub mod route;
pub mod types;

#[cfg(test)]
mod test_support;
