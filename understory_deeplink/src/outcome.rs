// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Outcome of a dispatch attempt and the builder that finalizes targets.
//!
//! ## Finalizing
//!
//! Before a successful outcome is returned, the active target (the single
//! target, or the last element of a stack) is normalized:
//!
//! - an unset action inherits the request's action,
//! - an unset data reference inherits the request URI,
//! - the merged attributes are copied into its extras,
//! - [`keys::IS_DEEP_LINK`] and [`keys::REFERRER_URI`] are injected,
//! - [`TargetFlags::FORWARD_RESULT`] is set when the caller expects a result.
//!
//! Earlier stack entries are left exactly as the operation built them.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::attributes::{AttributeSet, Merged};
use crate::error::DispatchError;
use crate::route::RouteDescriptor;
use crate::types::{CallerContext, Navigation, Request, Target, TargetFlags, TaskStack, keys};

/// Immutable result of one dispatch attempt.
///
/// Borrows the matched [`RouteDescriptor`] from the route table that owns it.
///
/// Invariants:
/// - successful ⇒ [`route`](Self::route) is set and [`target`](Self::target) is set;
/// - failed ⇒ [`target`](Self::target) and [`stack`](Self::stack) are both `None`.
pub struct Outcome<'r, C> {
    uri: String,
    message: String,
    error: Option<DispatchError>,
    navigation: Option<Navigation>,
    route: Option<&'r RouteDescriptor<C>>,
    duplicates: Vec<String>,
}

impl<'r, C> Outcome<'r, C> {
    pub(crate) fn success(
        caller: &C,
        request: &Request,
        uri: &str,
        route: &'r RouteDescriptor<C>,
        merged: Merged,
        mut navigation: Navigation,
    ) -> Self
    where
        C: CallerContext,
    {
        if let Some(target) = navigation.active_mut() {
            finalize(
                target,
                request,
                uri,
                &merged.attributes,
                caller.expects_result(),
            );
        }
        Self {
            uri: uri.into(),
            message: String::new(),
            error: None,
            navigation: Some(navigation),
            route: Some(route),
            duplicates: merged.duplicates,
        }
    }

    pub(crate) fn failure(
        uri: impl Into<String>,
        route: Option<&'r RouteDescriptor<C>>,
        error: DispatchError,
        duplicates: Vec<String>,
    ) -> Self {
        Self {
            uri: uri.into(),
            message: error.to_string(),
            error: Some(error),
            navigation: None,
            route,
            duplicates,
        }
    }

    /// Whether the dispatch produced a target.
    pub fn is_successful(&self) -> bool {
        self.error.is_none()
    }

    /// Request URI; empty when the request carried none.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Diagnostic message; empty on success.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Why the dispatch failed.
    pub fn error(&self) -> Option<&DispatchError> {
        self.error.as_ref()
    }

    /// The active target: the single target, or the top of the stack.
    pub fn target(&self) -> Option<&Target> {
        self.navigation.as_ref().and_then(Navigation::active)
    }

    /// The back-stack, when the route produced one.
    pub fn stack(&self) -> Option<&TaskStack> {
        match &self.navigation {
            Some(Navigation::Stack(s)) => Some(s),
            _ => None,
        }
    }

    /// The resolved navigation.
    pub fn navigation(&self) -> Option<&Navigation> {
        self.navigation.as_ref()
    }

    /// Take the resolved navigation.
    pub fn into_navigation(self) -> Option<Navigation> {
        self.navigation
    }

    /// Matched route.
    ///
    /// `None` when the request had no URI or nothing matched; set when a
    /// route matched but invoking it failed.
    pub fn route(&self) -> Option<&'r RouteDescriptor<C>> {
        self.route
    }

    /// Parameter names supplied both by the path and by the query.
    pub fn duplicates(&self) -> &[String] {
        &self.duplicates
    }
}

impl<C> core::fmt::Debug for Outcome<'_, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Outcome")
            .field("uri", &self.uri)
            .field("message", &self.message)
            .field("error", &self.error)
            .field("navigation", &self.navigation)
            .field("route", &self.route)
            .field("duplicates", &self.duplicates)
            .finish()
    }
}

fn finalize(
    target: &mut Target,
    request: &Request,
    uri: &str,
    attributes: &AttributeSet,
    forward_result: bool,
) {
    if target.action.is_none() {
        target.action.clone_from(&request.action);
    }
    if target.data.is_none() {
        target.data = Some(uri.into());
    }
    target.extras.extend_from(attributes);
    target.extras.insert(keys::IS_DEEP_LINK, "true");
    target.extras.insert(keys::REFERRER_URI, uri);
    if forward_result {
        target.flags.insert(TargetFlags::FORWARD_RESULT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    struct Caller {
        expects_result: bool,
    }

    impl CallerContext for Caller {
        fn expects_result(&self) -> bool {
            self.expects_result
        }
    }

    const URI: &str = "app://item/3?x=1";

    fn merged() -> Merged {
        Merged {
            attributes: [("id", "3"), ("x", "1"), (keys::URI, URI)]
                .into_iter()
                .collect(),
            duplicates: vec![],
        }
    }

    fn route() -> RouteDescriptor<Caller> {
        RouteDescriptor::direct("app://item/{id}", "Item")
    }

    #[test]
    fn unset_action_and_data_are_inherited() {
        let route = route();
        let request = Request::new(URI).with_action("VIEW");
        let caller = Caller {
            expects_result: false,
        };
        let out = Outcome::success(
            &caller,
            &request,
            URI,
            &route,
            merged(),
            Navigation::Single(Target::new("Item")),
        );
        assert!(out.is_successful());
        assert_eq!(out.message(), "");
        let t = out.target().unwrap();
        assert_eq!(t.action.as_deref(), Some("VIEW"));
        assert_eq!(t.data.as_deref(), Some(URI));
        assert_eq!(t.extras.get("id"), Some("3"));
        assert_eq!(t.extras.get(keys::IS_DEEP_LINK), Some("true"));
        assert_eq!(t.extras.get(keys::REFERRER_URI), Some(URI));
        assert!(!t.flags.contains(TargetFlags::FORWARD_RESULT));
        assert!(out.stack().is_none());
    }

    #[test]
    fn explicit_action_and_data_are_kept() {
        let route = route();
        let request = Request::new(URI).with_action("VIEW");
        let caller = Caller {
            expects_result: false,
        };
        let target = Target::new("Item")
            .with_action("EDIT")
            .with_data("content://item/3");
        let out = Outcome::success(
            &caller,
            &request,
            URI,
            &route,
            merged(),
            Navigation::Single(target),
        );
        let t = out.target().unwrap();
        assert_eq!(t.action.as_deref(), Some("EDIT"));
        assert_eq!(t.data.as_deref(), Some("content://item/3"));
    }

    #[test]
    fn caller_expecting_result_forwards_it() {
        let route = route();
        let caller = Caller {
            expects_result: true,
        };
        let out = Outcome::success(
            &caller,
            &Request::new(URI),
            URI,
            &route,
            merged(),
            Navigation::Single(Target::new("Item")),
        );
        assert!(
            out.target()
                .unwrap()
                .flags
                .contains(TargetFlags::FORWARD_RESULT)
        );
    }

    #[test]
    fn only_top_of_stack_is_finalized() {
        let route = route();
        let caller = Caller {
            expects_result: false,
        };
        let stack = TaskStack::new()
            .with(Target::new("Home"))
            .with(Target::new("Item"));
        let out = Outcome::success(
            &caller,
            &Request::new(URI),
            URI,
            &route,
            merged(),
            Navigation::Stack(stack),
        );
        let stack = out.stack().unwrap();
        assert!(stack.targets()[0].extras.is_empty());
        assert_eq!(stack.targets()[0].data, None);
        assert_eq!(out.target().unwrap().id, "Item");
        assert_eq!(
            out.target().unwrap().extras.get(keys::IS_DEEP_LINK),
            Some("true")
        );
    }

    #[test]
    fn failure_has_no_navigation() {
        let route = route();
        let out = Outcome::failure(
            URI,
            Some(&route),
            DispatchError::OperationNotFound {
                operation: "open".into(),
            },
            vec!["x".into()],
        );
        assert!(!out.is_successful());
        assert!(out.target().is_none());
        assert!(out.stack().is_none());
        assert_eq!(out.message(), "Deep link to non-existent method: open");
        assert_eq!(out.route().unwrap().template(), "app://item/{id}");
        assert_eq!(out.duplicates(), ["x"]);
    }
}
