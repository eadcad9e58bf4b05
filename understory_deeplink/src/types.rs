// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for dispatch: requests, navigation targets, stacks, and the
//! host-side collaborators.
//!
//! ## Overview
//!
//! These types describe what goes into a dispatch and what comes out of it.
//! They are referenced by the [`delegate`](crate::delegate) and by the
//! [`outcome`](crate::outcome) it produces. The traits at the bottom of this
//! module are the seams to the host: where results are presented and who
//! hears about them.

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::vec::Vec;

use crate::attributes::AttributeSet;

/// Well-known attribute keys written by the dispatcher.
pub mod keys {
    /// Reserved key holding the raw request URI string.
    ///
    /// Always written last during the merge, so it overwrites any user
    /// parameter of the same name.
    pub const URI: &str = "deep_link_uri";
    /// Marker set to `"true"` on every target produced by a dispatch.
    pub const IS_DEEP_LINK: &str = "is_deep_link_flag";
    /// Marker holding the URI that referred the user to the target.
    pub const REFERRER_URI: &str = "referrer_uri";
}

bitflags::bitflags! {
    /// Flags carried on a [`Target`] for the presentation layer.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct TargetFlags: u8 {
        /// The caller expects a result; the target should forward it back.
        const FORWARD_RESULT = 0b0000_0001;
    }
}

/// An inbound request: the URI to resolve plus whatever the host attached.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Request {
    /// Request URI; `None` when the host delivered no data.
    pub uri: Option<String>,
    /// Host action associated with the request, inherited by targets that leave theirs unset.
    pub action: Option<String>,
    /// Attributes already attached to the request; the base layer of the merge.
    pub extras: AttributeSet,
}

impl Request {
    /// A request for `uri` with no action and no extras.
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: Some(uri.into()),
            ..Self::default()
        }
    }

    /// Set the host action.
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Attach an extra attribute.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras.insert(key, value);
        self
    }
}

/// A single navigation target.
///
/// Produced directly for [`RouteKind::Direct`](crate::route::RouteKind::Direct)
/// routes, or returned by an operation. The outcome builder fills in the
/// defaults and markers before the target reaches the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Target {
    /// Identifier of the screen or type this target addresses.
    pub id: Cow<'static, str>,
    /// Action to perform; inherited from the request when unset.
    pub action: Option<String>,
    /// Data reference; inherited from the request URI when unset.
    pub data: Option<String>,
    /// Attributes delivered to the target.
    pub extras: AttributeSet,
    /// Presentation flags.
    pub flags: TargetFlags,
}

impl Target {
    /// A bare target addressed at `id`.
    pub fn new(id: impl Into<Cow<'static, str>>) -> Self {
        Self {
            id: id.into(),
            action: None,
            data: None,
            extras: AttributeSet::new(),
            flags: TargetFlags::empty(),
        }
    }

    /// Set the action.
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    /// Set the data reference.
    pub fn with_data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Attach an extra attribute.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras.insert(key, value);
        self
    }
}

/// An ordered back-stack of targets, oldest first.
///
/// The last element is the active screen; it is the one the outcome builder
/// finalizes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskStack {
    targets: Vec<Target>,
}

impl TaskStack {
    /// An empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push `target` on top of the stack.
    pub fn with(mut self, target: Target) -> Self {
        self.targets.push(target);
        self
    }

    /// Push `target` on top of the stack.
    pub fn push(&mut self, target: Target) {
        self.targets.push(target);
    }

    /// Number of targets.
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    /// Whether the stack has no targets.
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// The active (last) target.
    pub fn active(&self) -> Option<&Target> {
        self.targets.last()
    }

    pub(crate) fn active_mut(&mut self) -> Option<&mut Target> {
        self.targets.last_mut()
    }

    /// Targets oldest first.
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }
}

impl FromIterator<Target> for TaskStack {
    fn from_iter<I: IntoIterator<Item = Target>>(iter: I) -> Self {
        Self {
            targets: iter.into_iter().collect(),
        }
    }
}

/// What a resolved route produced: one target or a whole back-stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
    /// A single target.
    Single(Target),
    /// A back-stack whose last element is active.
    Stack(TaskStack),
}

impl Navigation {
    /// The target the user lands on.
    pub fn active(&self) -> Option<&Target> {
        match self {
            Self::Single(t) => Some(t),
            Self::Stack(s) => s.active(),
        }
    }

    pub(crate) fn active_mut(&mut self) -> Option<&mut Target> {
        match self {
            Self::Single(t) => Some(t),
            Self::Stack(s) => s.active_mut(),
        }
    }
}

/// The caller on whose behalf a dispatch runs (for example the screen that
/// received the link).
///
/// Operations receive a reference to it, and the outcome builder consults it
/// for result forwarding.
pub trait CallerContext {
    /// Whether the caller was itself started expecting a result.
    ///
    /// When `true`, the produced target is flagged with
    /// [`TargetFlags::FORWARD_RESULT`].
    fn expects_result(&self) -> bool {
        false
    }

    /// The request the caller was started with, if any.
    ///
    /// Used by [`DeepLinkDelegate::dispatch_from`](crate::delegate::DeepLinkDelegate::dispatch_from).
    fn request(&self) -> Option<&Request> {
        None
    }
}

impl CallerContext for () {}

/// What a [`NotificationSink`] hears after each dispatch.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Notification<'a> {
    /// Whether the dispatch succeeded.
    pub successful: bool,
    /// Request URI, empty when the request had none.
    pub uri: &'a str,
    /// Template of the matched route, empty when nothing matched.
    pub template: &'a str,
    /// Present iff `successful` is `false`.
    pub error_message: Option<&'a str>,
}

/// Receives one [`Notification`] per [`dispatch`](crate::delegate::DeepLinkDelegate::dispatch).
pub trait NotificationSink {
    /// Called exactly once per dispatch, on success and on failure.
    fn notify(&self, notification: &Notification<'_>);
}

impl<F: Fn(&Notification<'_>)> NotificationSink for F {
    fn notify(&self, notification: &Notification<'_>) {
        self(notification);
    }
}

/// A sink that drops every notification.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoSink;

impl NotificationSink for NoSink {
    #[inline]
    fn notify(&self, _notification: &Notification<'_>) {}
}

/// Performs the navigation a successful dispatch resolved to.
pub trait Presenter<C> {
    /// Show a single target.
    fn start(&self, caller: &C, target: &Target);
    /// Replay a back-stack, oldest first.
    fn start_stack(&self, caller: &C, stack: &TaskStack);
}

/// A presenter that does nothing; used when only the outcome is wanted.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoPresenter;

impl<C> Presenter<C> for NoPresenter {
    #[inline]
    fn start(&self, _caller: &C, _target: &Target) {}
    #[inline]
    fn start_stack(&self, _caller: &C, _stack: &TaskStack) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stack_active_is_last() {
        let stack = TaskStack::new()
            .with(Target::new("home"))
            .with(Target::new("profile"));
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.active().map(|t| t.id.as_ref()), Some("profile"));
        assert_eq!(stack.targets()[0].id, "home");
    }

    #[test]
    fn navigation_active_for_both_shapes() {
        let single = Navigation::Single(Target::new("a"));
        assert_eq!(single.active().map(|t| t.id.as_ref()), Some("a"));

        let empty = Navigation::Stack(TaskStack::new());
        assert!(empty.active().is_none());

        let stack: TaskStack = [Target::new("x"), Target::new("y")].into_iter().collect();
        let mut nav = Navigation::Stack(stack);
        nav.active_mut().unwrap().action = Some("VIEW".into());
        assert_eq!(nav.active().unwrap().action.as_deref(), Some("VIEW"));
    }

    #[test]
    fn request_builder() {
        let req = Request::new("app://home")
            .with_action("VIEW")
            .with_extra("source", "push");
        assert_eq!(req.uri.as_deref(), Some("app://home"));
        assert_eq!(req.action.as_deref(), Some("VIEW"));
        assert_eq!(req.extras.get("source"), Some("push"));
        assert!(Request::default().uri.is_none());
    }

    #[test]
    fn closure_is_a_sink() {
        let seen = core::cell::Cell::new(0);
        let sink = |n: &Notification<'_>| {
            assert!(n.successful);
            seen.set(seen.get() + 1);
        };
        sink.notify(&Notification {
            successful: true,
            uri: "app://x",
            template: "app://x",
            error_message: None,
        });
        assert_eq!(seen.get(), 1);
    }
}
