// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fixtures for unit tests: a segment-template route table and
//! recording collaborators.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::attributes::AttributeSet;
use crate::query;
use crate::route::{RouteDescriptor, RouteTable};
use crate::types::{
    CallerContext, Notification, NotificationSink, Presenter, Request, Target, TaskStack,
};

/// Matches `/`-separated templates where `{name}` captures one segment.
pub(crate) struct SegmentTable<C> {
    routes: Vec<RouteDescriptor<C>>,
}

impl<C> SegmentTable<C> {
    pub(crate) fn new(routes: Vec<RouteDescriptor<C>>) -> Self {
        Self { routes }
    }

    fn captures(template: &str, uri: &str) -> Option<AttributeSet> {
        let mut pattern = template.split('/');
        let mut actual = query::strip(uri).split('/');
        let mut out = AttributeSet::new();
        loop {
            match (pattern.next(), actual.next()) {
                (None, None) => return Some(out),
                (Some(p), Some(a)) => {
                    if let Some(name) = p.strip_prefix('{').and_then(|p| p.strip_suffix('}')) {
                        if a.is_empty() {
                            return None;
                        }
                        out.insert(name, query::decode(a));
                    } else if p != a {
                        return None;
                    }
                }
                _ => return None,
            }
        }
    }
}

impl<C> RouteTable<C> for SegmentTable<C> {
    fn parse(&self, uri: &str) -> Option<&RouteDescriptor<C>> {
        self.routes
            .iter()
            .find(|r| Self::captures(r.template(), uri).is_some())
    }

    fn path_parameters(&self, route: &RouteDescriptor<C>, uri: &str) -> AttributeSet {
        Self::captures(route.template(), uri).unwrap_or_default()
    }
}

/// A caller that may carry its own request.
#[derive(Default)]
pub(crate) struct Screen {
    pub(crate) expects_result: bool,
    pub(crate) request: Option<Request>,
}

impl CallerContext for Screen {
    fn expects_result(&self) -> bool {
        self.expects_result
    }

    fn request(&self) -> Option<&Request> {
        self.request.as_ref()
    }
}

/// Owned copy of a [`Notification`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Heard {
    pub(crate) successful: bool,
    pub(crate) uri: String,
    pub(crate) template: String,
    pub(crate) error_message: Option<String>,
}

#[derive(Default)]
pub(crate) struct RecordingSink {
    pub(crate) heard: RefCell<Vec<Heard>>,
}

impl NotificationSink for RecordingSink {
    fn notify(&self, n: &Notification<'_>) {
        self.heard.borrow_mut().push(Heard {
            successful: n.successful,
            uri: n.uri.to_string(),
            template: n.template.to_string(),
            error_message: n.error_message.map(ToString::to_string),
        });
    }
}

/// What a [`RecordingPresenter`] was asked to show.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Shown {
    Target(String),
    Stack(Vec<String>),
}

#[derive(Default)]
pub(crate) struct RecordingPresenter {
    pub(crate) shown: RefCell<Vec<Shown>>,
}

impl<C> Presenter<C> for RecordingPresenter {
    fn start(&self, _caller: &C, target: &Target) {
        self.shown
            .borrow_mut()
            .push(Shown::Target(target.id.to_string()));
    }

    fn start_stack(&self, _caller: &C, stack: &TaskStack) {
        self.shown.borrow_mut().push(Shown::Stack(
            stack.targets().iter().map(|t| t.id.to_string()).collect(),
        ));
    }
}
